use super::Color;

pub fn breathe_green(t: f64) -> Color {
    let intensity = (1.0 + f64::sin(t)) / 2.0;
    Color::new(0.0, intensity, 0.0)
}
