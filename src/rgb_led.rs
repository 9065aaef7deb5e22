use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{
    device::Device,
    effects::Color,
    error::{LedError, Result},
    led::Led,
};

/// Three [`Led`] channels in red, green, blue order.
///
/// [`RgbLed::set_color`] writes all channels concurrently. If one channel
/// fails the others are still written and nothing is rolled back, so a
/// partially applied color can be observed on the hardware after an error.
pub struct RgbLed {
    leds: [Led; 3],
}

impl RgbLed {
    pub fn new(leds: [Led; 3]) -> RgbLed {
        RgbLed { leds }
    }

    pub fn from_devices<D: Device + 'static>(devices: [D; 3]) -> RgbLed {
        RgbLed::new(devices.map(Led::new))
    }

    /// Opens all three channels, failing if any of them cannot be opened.
    pub async fn open<D: Device + 'static>(devices: [D; 3]) -> Result<RgbLed> {
        let led = RgbLed::from_devices(devices);
        let [r, g, b] = &led.leds;
        let (r, g, b) = tokio::join!(r.open(), g.open(), b.open());
        r.and(g).and(b)?;
        Ok(led)
    }

    pub fn channels(&self) -> &[Led; 3] {
        &self.leds
    }

    pub fn name(&self) -> String {
        self.leds[0].name()
    }

    /// Validates the whole color first, so an out-of-range component means
    /// no channel is touched. I/O errors are reported after all three
    /// writes have finished.
    pub async fn set_color(&self, color: Color) -> Result<()> {
        color.validate()?;

        let [r, g, b] = &self.leds;
        let (r, g, b) = tokio::join!(
            r.set_intensity(color.r()),
            g.set_intensity(color.g()),
            b.set_intensity(color.b()),
        );
        r.and(g).and(b)
    }

    pub async fn close(&self) -> Result<()> {
        let [r, g, b] = &self.leds;
        let (r, g, b) = tokio::join!(r.close(), g.close(), b.close());
        r.and(g).and(b)
    }
}

/// Sets every led to [`Color::OFF`] and closes it, all leds at once. Every
/// led gets its turn even if another fails; the first error is returned.
pub async fn switch_off_all(leds: &[Arc<RgbLed>]) -> Result<()> {
    let mut tasks = JoinSet::new();
    for led in leds {
        let led = led.clone();
        tasks.spawn(async move {
            let switched_off = led.set_color(Color::OFF).await;
            let closed = led.close().await;
            switched_off.and(closed).map_err(|err| {
                log::warn!("failed to switch off {}: {err}", led.name());
                err
            })
        });
    }

    let mut result = Ok(());
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(LedError::from).and_then(|done| done);
        if result.is_ok() {
            result = outcome;
        }
    }
    result
}
