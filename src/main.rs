use std::{f64::consts::PI, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use rgb_animator::{
    config::Args,
    delay::{wait_for_shutdown, Shutdown},
    effects,
    layout::Layout,
    rgb_led::switch_off_all,
    Animator, Binding, RgbLed,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let duration = args.run_duration()?;

    let layout = match &args.layout {
        Some(path) => Layout::load(path).await?,
        None => Layout::numbered(args.count),
    };
    let leds_dir = layout.leds_dir.clone().unwrap_or(args.leds_dir.clone());

    let mut leds = Vec::with_capacity(layout.leds.len());
    for ids in &layout.leds {
        let led = RgbLed::open(ids.devices(&leds_dir))
            .await
            .with_context(|| format!("Failed to open {ids:?}"))?;
        leds.push(Arc::new(led));
    }
    log::info!("opened {} rgb leds", leds.len());

    let shift = 2.0 * PI / leds.len().max(1) as f64;
    let animation = args.animation.animation();
    let bindings = leds
        .iter()
        .enumerate()
        .map(|(index, led)| {
            Binding::new(
                effects::scaled(animation.clone(), args.speed, shift * index as f64),
                vec![led.clone()],
            )
        })
        .collect();

    let mut animator = Animator::new(bindings, args.frequency).await?;

    match wait_for_shutdown(duration, tokio::signal::ctrl_c()).await {
        Shutdown::Elapsed => log::info!("{duration:?} elapsed, switching off"),
        Shutdown::Interrupted => log::info!("ctrl-c received, switching off"),
    }

    // Stop the animation
    if let Err(err) = animator.set_frequency(0.0).await {
        log::warn!("last update failed: {err}");
    }

    // Turn off the leds
    switch_off_all(&leds).await?;

    Ok(())
}
