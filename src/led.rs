//! A single intensity-controlled output.

use tokio::sync::Mutex;

use crate::{
    device::{Device, DeviceHandle, Opened},
    error::{LedError, Result},
};

enum State {
    Unopened,
    Open(OpenLed),
    /// Opening failed. Kept so later calls report it instead of retrying.
    Failed(String),
    Closed,
}

struct OpenLed {
    handle: Box<dyn DeviceHandle>,
    max: u32,
    /// Last native value that was successfully written.
    last_value: Option<u32>,
}

/// One channel of a light. Opens its device lazily and skips writes that
/// would not change the device-native value.
///
/// All operations serialize on an internal lock, so an open in progress is
/// awaited by any concurrent write or close. A failed open is not retried:
/// the first call gets the device error, every later one
/// [`LedError::OpenFailed`].
pub struct Led {
    device: Box<dyn Device>,
    state: Mutex<State>,
}

impl Led {
    pub fn new(device: impl Device + 'static) -> Led {
        Led {
            device: Box::new(device),
            state: Mutex::new(State::Unopened),
        }
    }

    /// Like [`Led::new`], but opens the device right away so a missing or
    /// unreadable device fails construction.
    pub async fn open_new(device: impl Device + 'static) -> Result<Led> {
        let led = Led::new(device);
        led.open().await?;
        Ok(led)
    }

    pub fn name(&self) -> String {
        self.device.name()
    }

    /// Idempotent: once the device is open this does nothing.
    pub async fn open(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.ensure_open(&mut state).await.map(|_| ())
    }

    async fn ensure_open<'a>(&self, state: &'a mut State) -> Result<&'a mut OpenLed> {
        if let State::Unopened = state {
            match self.device.open().await {
                Ok(Opened { handle, max }) => {
                    log::debug!("opened {} (max {max})", self.name());
                    *state = State::Open(OpenLed {
                        handle,
                        max,
                        last_value: None,
                    });
                }
                Err(err) => {
                    log::warn!("failed to open {}: {err}", self.name());
                    *state = State::Failed(err.to_string());
                    return Err(err);
                }
            }
        }

        match state {
            State::Open(led) => Ok(led),
            State::Failed(reason) => Err(LedError::OpenFailed {
                name: self.name(),
                reason: reason.clone(),
            }),
            State::Unopened | State::Closed => Err(LedError::Closed(self.name())),
        }
    }

    /// Sets the normalized intensity, writing `round(intensity * max)` unless
    /// that value is already on the device.
    pub async fn set_intensity(&self, intensity: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(LedError::OutOfRange(intensity));
        }

        let mut state = self.state.lock().await;
        let led = self.ensure_open(&mut state).await?;

        let value = (intensity * f64::from(led.max)).round() as u32;
        if led.last_value == Some(value) {
            return Ok(());
        }

        led.handle.write(value).await?;
        log::trace!("{} <- {value}", self.device.name());
        led.last_value = Some(value);

        Ok(())
    }

    /// Device-native value currently on the device, if anything was written.
    pub async fn last_value(&self) -> Option<u32> {
        match &*self.state.lock().await {
            State::Open(led) => led.last_value,
            _ => None,
        }
    }

    /// Device-native maximum, known once the device is open.
    pub async fn max(&self) -> Option<u32> {
        match &*self.state.lock().await {
            State::Open(led) => Some(led.max),
            _ => None,
        }
    }

    /// The last written value converted back to `[0, 1]`.
    pub async fn intensity(&self) -> Option<f64> {
        match &*self.state.lock().await {
            State::Open(OpenLed {
                max,
                last_value: Some(value),
                ..
            }) => Some(f64::from(*value) / f64::from(*max)),
            _ => None,
        }
    }

    /// Waits for a pending open, then releases the handle. Closing an already
    /// closed led is a no-op.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, State::Closed) {
            State::Open(led) => led.handle.close().await,
            State::Unopened | State::Failed(_) | State::Closed => Ok(()),
        }
    }
}
