//! Device-file conventions for a single intensity-controlled output.
//!
//! Two layouts are supported:
//!
//! - [`BrightnessFile`]: a direct path to a writable control file, scale fixed
//!   at 0–255.
//! - [`ClassLed`]: a directory exposing `max_brightness` (read once on open)
//!   and `brightness` (the write target).
//!
//! Values are written as decimal text at offset 0. The file is never
//! truncated, sysfs attributes don't need it.

use std::{
    future::Future,
    io::SeekFrom,
    path::{Path, PathBuf},
    pin::Pin,
};

use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncSeekExt, AsyncWriteExt},
};

use crate::error::{LedError, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Native maximum of a [`BrightnessFile`].
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

/// Something that can be opened into a writable channel handle.
pub trait Device: Send + Sync {
    /// Human readable identifier, used in logs and errors.
    fn name(&self) -> String;

    /// Acquires the handle and reports the device-native maximum.
    fn open(&self) -> BoxFuture<'_, Result<Opened>>;
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn open(&self) -> BoxFuture<'_, Result<Opened>> {
        (**self).open()
    }
}

pub trait DeviceHandle: Send {
    fn write(&mut self, value: u32) -> BoxFuture<'_, Result<()>>;
    fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

pub struct Opened {
    pub handle: Box<dyn DeviceHandle>,
    pub max: u32,
}

#[derive(Clone, Debug)]
pub struct BrightnessFile {
    path: PathBuf,
}

impl BrightnessFile {
    pub fn new(path: impl Into<PathBuf>) -> BrightnessFile {
        BrightnessFile { path: path.into() }
    }
}

impl Device for BrightnessFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> BoxFuture<'_, Result<Opened>> {
        Box::pin(async move {
            let handle = FileHandle::open(&self.path).await?;
            Ok(Opened {
                handle: Box::new(handle),
                max: DEFAULT_MAX_BRIGHTNESS,
            })
        })
    }
}

#[derive(Clone, Debug)]
pub struct ClassLed {
    dir: PathBuf,
}

impl ClassLed {
    /// `leds_dir` is usually `/sys/class/leds`.
    pub fn new(leds_dir: impl AsRef<Path>, name: &str) -> ClassLed {
        ClassLed {
            dir: leds_dir.as_ref().join(name),
        }
    }

    async fn read_max_brightness(&self) -> Result<u32> {
        let path = self.dir.join("max_brightness");
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| LedError::io(&path, err))?;

        match text.trim().parse::<u32>() {
            Ok(max) if max > 0 => Ok(max),
            _ => Err(LedError::InvalidMaxBrightness { path, value: text }),
        }
    }
}

impl Device for ClassLed {
    fn name(&self) -> String {
        self.dir.display().to_string()
    }

    fn open(&self) -> BoxFuture<'_, Result<Opened>> {
        Box::pin(async move {
            let handle = FileHandle::open(&self.dir.join("brightness")).await?;
            let max = self.read_max_brightness().await?;
            Ok(Opened {
                handle: Box::new(handle),
                max,
            })
        })
    }
}

struct FileHandle {
    path: PathBuf,
    file: File,
}

impl FileHandle {
    async fn open(path: &Path) -> Result<FileHandle> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .await
            .map_err(|err| LedError::io(path, err))?;

        Ok(FileHandle {
            path: path.to_owned(),
            file,
        })
    }

    async fn write_value(&mut self, value: u32) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).await?;
        self.file.write_all(value.to_string().as_bytes()).await?;
        // tokio buffers file writes on the blocking pool, flush waits for them
        self.file.flush().await
    }
}

impl DeviceHandle for FileHandle {
    fn write(&mut self, value: u32) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.write_value(value)
                .await
                .map_err(|err| LedError::io(&self.path, err))
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            let FileHandle { path, mut file } = *self;
            file.flush().await.map_err(|err| LedError::io(&path, err))
        })
    }
}
