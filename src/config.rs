use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::effects::{self, Animation};

#[derive(Debug, Parser)]
#[command(name = "rgb-animator")]
#[command(about = "Animate RGB leds exposed as device files", long_about = None)]
pub struct Args {
    /// Multiplier applied to the time fed into the animation
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Seconds to run before switching the leds off
    #[arg(long, default_value_t = 10.0)]
    pub duration: f64,

    /// Update rate in Hz, fractions allowed
    #[arg(long, default_value_t = 25.0)]
    pub frequency: f64,

    #[arg(long, value_enum, default_value_t = AnimationKind::Rainbow)]
    pub animation: AnimationKind,

    /// Number of leds named led1_r/_g/_b .. ledN_r/_g/_b
    #[arg(long, default_value_t = 16)]
    pub count: usize,

    /// Directory holding named leds
    #[arg(long, default_value = "/sys/class/leds")]
    pub leds_dir: PathBuf,

    /// JSON layout listing the leds, overrides --count
    #[arg(long)]
    pub layout: Option<PathBuf>,
}

impl Args {
    /// `--duration` as a `Duration`; negative or non-finite values fail.
    pub fn run_duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.duration)
            .with_context(|| format!("Invalid duration {}", self.duration))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AnimationKind {
    Rainbow,
    Breathe,
    Blink,
    Sparkle,
}

impl AnimationKind {
    pub fn animation(self) -> Animation {
        match self {
            AnimationKind::Rainbow => effects::animation(effects::rainbow),
            AnimationKind::Breathe => effects::animation(effects::breathe_green),
            AnimationKind::Blink => effects::animation(effects::blink_white),
            AnimationKind::Sparkle => effects::animation(effects::sparkle),
        }
    }
}
