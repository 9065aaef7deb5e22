use super::Color;

/// White for one second, off for the next.
pub fn blink_white(t: f64) -> Color {
    let intensity = f64::floor(t).rem_euclid(2.0);
    Color::new(intensity, intensity, intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_every_second() {
        assert_eq!(blink_white(0.5), Color::OFF);
        assert_eq!(blink_white(1.5), Color::WHITE);
        assert_eq!(blink_white(2.0), Color::OFF);
        // negative times show up once a phase shift is applied
        assert_eq!(blink_white(-0.5), Color::WHITE);
    }
}
