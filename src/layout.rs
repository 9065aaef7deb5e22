//! Which device files make up each RGB led.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::device::{BrightnessFile, ClassLed, Device};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RgbLedIds {
    pub red: String,
    pub green: String,
    pub blue: String,
}

impl RgbLedIds {
    /// `led{index}_r`, `led{index}_g`, `led{index}_b`.
    pub fn numbered(index: usize) -> RgbLedIds {
        RgbLedIds {
            red: format!("led{index}_r"),
            green: format!("led{index}_g"),
            blue: format!("led{index}_b"),
        }
    }

    pub fn devices(&self, leds_dir: &Path) -> [Box<dyn Device>; 3] {
        [&self.red, &self.green, &self.blue].map(|id| resolve(id, leds_dir))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Layout {
    /// Overrides the directory given on the command line.
    #[serde(default)]
    pub leds_dir: Option<PathBuf>,
    pub leds: Vec<RgbLedIds>,
}

impl Layout {
    /// `count` leds named by [`RgbLedIds::numbered`], starting at 1.
    pub fn numbered(count: usize) -> Layout {
        Layout {
            leds_dir: None,
            leds: (1..=count).map(RgbLedIds::numbered).collect(),
        }
    }

    pub async fn load(path: &Path) -> Result<Layout> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read layout {}", path.display()))?;

        let layout = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse layout {}", path.display()))?;

        Ok(layout)
    }
}

/// An identifier containing a `/` is a path to a control file with a fixed
/// 0-255 scale; anything else names a led directory under `leds_dir`.
pub fn resolve(id: &str, leds_dir: &Path) -> Box<dyn Device> {
    if id.contains('/') {
        Box::new(BrightnessFile::new(id))
    } else {
        Box::new(ClassLed::new(leds_dir, id))
    }
}
