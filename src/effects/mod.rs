use std::sync::Arc;

use crate::error::{LedError, Result};

pub mod blink;
pub mod breathe;
pub mod rainbow;
pub mod sparkle;

pub use blink::blink_white;
pub use breathe::breathe_green;
pub use rainbow::rainbow;
pub use sparkle::sparkle;

/// Maps seconds since an arbitrary, fixed epoch to a color.
pub type Animation = Arc<dyn Fn(f64) -> Color + Send + Sync>;

/// Normalized red, green and blue intensities, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color(pub [f64; 3]);

impl Color {
    pub const OFF: Color = Color([0.0, 0.0, 0.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0]);

    pub const fn new(r: f64, g: f64, b: f64) -> Color {
        Color([r, g, b])
    }

    pub fn r(&self) -> f64 {
        self.0[0]
    }

    pub fn g(&self) -> f64 {
        self.0[1]
    }

    pub fn b(&self) -> f64 {
        self.0[2]
    }

    /// Fails on the first component outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match self.0.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            Some(c) => Err(LedError::OutOfRange(*c)),
            None => Ok(()),
        }
    }
}

impl From<[f64; 3]> for Color {
    fn from(rgb: [f64; 3]) -> Color {
        Color(rgb)
    }
}

pub fn animation(f: impl Fn(f64) -> Color + Send + Sync + 'static) -> Animation {
    Arc::new(f)
}

pub fn constant(color: Color) -> Animation {
    animation(move |_| color)
}

/// Feeds `speed * t - shift` into `inner`.
pub fn scaled(inner: Animation, speed: f64, shift: f64) -> Animation {
    animation(move |t| inner(speed * t - shift))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_out_of_range_components() {
        assert!(Color::new(0.0, 0.5, 1.0).validate().is_ok());
        assert!(matches!(
            Color::new(0.0, 1.5, 0.0).validate(),
            Err(LedError::OutOfRange(v)) if v == 1.5
        ));
        assert!(Color::new(f64::NAN, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn scaled_shifts_time() {
        let seen = scaled(animation(|t| Color::new(t, 0.0, 0.0)), 2.0, 0.5);
        assert_eq!(seen(1.0), Color::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn constant_ignores_time() {
        let c = Color::new(0.1, 0.2, 0.3);
        let f = constant(c);
        assert_eq!(f(0.0), c);
        assert_eq!(f(1234.5), c);
    }
}
