use std::f64::consts::PI;

use super::Color;

/// Cycles through the hue wheel once every `2π` seconds. Each channel is a
/// sine offset by a third of a turn.
pub fn rainbow(t: f64) -> Color {
    let channel = |phase: f64| (1.0 + f64::sin(t + phase)) / 2.0;
    Color::new(channel(0.0), channel(2.0 * PI / 3.0), channel(4.0 * PI / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        for i in -100..100 {
            let color = rainbow(f64::from(i) * 0.37);
            assert!(color.validate().is_ok(), "{color:?}");
        }
    }

    #[test]
    fn periodic() {
        let a = rainbow(1.0);
        let b = rainbow(1.0 + 2.0 * PI);
        for (x, y) in a.0.iter().zip(b.0.iter()) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}
