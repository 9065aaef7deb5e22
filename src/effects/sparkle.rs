use rand::{rngs::StdRng, Rng, SeedableRng};

use super::Color;

const SLOTS_PER_SECOND: f64 = 8.0;
const SPARK_PROBABILITY: f64 = 0.2;

/// Random white flashes. The outcome only depends on which 1/8 s slot `t`
/// falls into, so the same `t` always yields the same color.
pub fn sparkle(t: f64) -> Color {
    let slot = f64::floor(t * SLOTS_PER_SECOND) as i64;
    let mut rng = StdRng::seed_from_u64(slot as u64);

    if rng.gen_bool(SPARK_PROBABILITY) {
        let level = rng.gen_range(0.5..=1.0);
        Color::new(level, level, level)
    } else {
        Color::OFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_within_a_slot() {
        for i in 0..64 {
            let t = f64::from(i) / SLOTS_PER_SECOND;
            assert_eq!(sparkle(t), sparkle(t + 0.05));
            assert!(sparkle(t).validate().is_ok());
        }
    }

    #[test]
    fn sparks_sometimes() {
        let lit = (0..800)
            .filter(|i| sparkle(f64::from(*i) / SLOTS_PER_SECOND) != Color::OFF)
            .count();
        assert!(lit > 0 && lit < 800);
    }
}
