#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rgb_animator::{
    device::{BoxFuture, Device, DeviceHandle, Opened},
    LedError, Result, RgbLed,
};
use tokio::sync::Semaphore;

/// In-memory channel recording every native value written to it.
#[derive(Clone)]
pub struct FakeDevice {
    pub name: String,
    pub max: u32,
    pub writes: Arc<Mutex<Vec<u32>>>,
    /// Writes wait for a permit when set.
    pub gate: Option<Arc<Semaphore>>,
    /// Every write takes this long.
    pub latency: Option<Duration>,
    pub fail_writes: bool,
}

impl FakeDevice {
    pub fn new(name: &str, max: u32) -> FakeDevice {
        FakeDevice {
            name: name.to_owned(),
            max,
            writes: Default::default(),
            gate: None,
            latency: None,
            fail_writes: false,
        }
    }

    pub fn gated(mut self, gate: &Arc<Semaphore>) -> FakeDevice {
        self.gate = Some(gate.clone());
        self
    }

    pub fn slow(mut self, latency: Duration) -> FakeDevice {
        self.latency = Some(latency);
        self
    }

    pub fn failing(mut self) -> FakeDevice {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<u32> {
        self.writes.lock().unwrap().clone()
    }
}

struct FakeHandle(FakeDevice);

impl Device for FakeDevice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> BoxFuture<'_, Result<Opened>> {
        Box::pin(async move {
            Ok(Opened {
                handle: Box::new(FakeHandle(self.clone())),
                max: self.max,
            })
        })
    }
}

impl DeviceHandle for FakeHandle {
    fn write(&mut self, value: u32) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if let Some(gate) = &self.0.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            if let Some(latency) = self.0.latency {
                tokio::time::sleep(latency).await;
            }
            if self.0.fail_writes {
                return Err(LedError::DeviceIo {
                    path: self.0.name.clone().into(),
                    source: std::io::Error::other("device unplugged"),
                });
            }
            self.0.writes.lock().unwrap().push(value);
            Ok(())
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

pub fn fake_rgb(name: &str, max: u32) -> [FakeDevice; 3] {
    ["r", "g", "b"].map(|channel| FakeDevice::new(&format!("{name}_{channel}"), max))
}

pub fn rgb_led(devices: &[FakeDevice; 3]) -> RgbLed {
    RgbLed::from_devices(devices.clone())
}
