//! Drives RGB leds exposed as writable device files from time-based
//! animation functions.
//!
//! An [`Animator`] ticks at a configurable rate, evaluates each binding's
//! animation and fans the colors out to the bound [`RgbLed`]s, whose [`Led`]
//! channels only write when the device-native value actually changes.

pub mod animated;
pub mod animator;
pub mod config;
pub mod delay;
pub mod device;
pub mod effects;
pub mod error;
pub mod layout;
pub mod led;
pub mod rgb_led;

pub use animated::AnimatedRgbLed;
pub use animator::{Animator, Binding};
pub use effects::{Animation, Color};
pub use error::{LedError, Result};
pub use led::Led;
pub use rgb_led::RgbLed;
