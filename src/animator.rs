//! Shared periodic scheduler driving many [`RgbLed`]s.
//!
//! Every tick evaluates each binding's animation once and writes the color to
//! all of its leds concurrently. At most one tick's writes are outstanding at
//! any time: a tick that fires while the previous one is still writing is
//! dropped outright, nothing is queued.
//!
//! Write failures during a tick are logged and kept in the last update's
//! result. Nobody else sees them unless the update is drained, which
//! `set_frequency(0)` does.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use tokio::{
    task::{JoinHandle, JoinSet},
    time::{Instant, MissedTickBehavior},
};

use crate::{
    delay::period_for,
    effects::Animation,
    error::{LedError, Result},
    rgb_led::RgbLed,
};

/// An animation and the leds it drives. The leds are shared, their lifetime
/// is up to whoever built the binding.
#[derive(Clone)]
pub struct Binding {
    pub animation: Animation,
    pub leds: Vec<Arc<RgbLed>>,
}

impl Binding {
    pub fn new(animation: Animation, leds: Vec<Arc<RgbLed>>) -> Binding {
        Binding { animation, leds }
    }
}

struct Shared {
    bindings: Vec<Binding>,
    epoch: Instant,
    in_flight: AtomicBool,
    last_update: Mutex<Option<JoinHandle<Result<()>>>>,
    ticks: AtomicU64,
    skipped: AtomicU64,
}

pub struct Animator {
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

impl Animator {
    /// Must be called from within a tokio runtime.
    pub async fn new(bindings: Vec<Binding>, frequency: f64) -> Result<Animator> {
        let mut animator = Animator {
            shared: Arc::new(Shared {
                bindings,
                epoch: Instant::now(),
                in_flight: AtomicBool::new(false),
                last_update: Mutex::new(None),
                ticks: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
            }),
            timer: None,
            period: None,
        };
        animator.set_frequency(frequency).await?;
        Ok(animator)
    }

    /// Tick period while running, `None` when stopped.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Ticks that started an update.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    /// Ticks dropped because an update was still in flight.
    pub fn skipped_ticks(&self) -> u64 {
        self.shared.skipped.load(Ordering::Relaxed)
    }

    /// Changes the tick rate in Hz.
    ///
    /// A negative frequency, or one too small to express as a period, fails
    /// and leaves the scheduler as it was. Zero
    /// stops the timer and waits for the update in flight, if any, returning
    /// its write error; once it resolves no further writes happen. Anything
    /// positive replaces the timer with one ticking every `1000 / frequency`
    /// milliseconds.
    pub async fn set_frequency(&mut self, frequency: f64) -> Result<()> {
        let period = period_for(frequency)?;

        self.disarm().await;

        let Some(period) = period else {
            log::info!("animator stopped");
            return self.drain().await;
        };

        log::info!("animator running at {frequency} Hz ({period:?} period)");
        self.timer = Some(tokio::spawn(run_timer(self.shared.clone(), period)));
        self.period = Some(period);

        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.set_frequency(0.0).await
    }

    async fn disarm(&mut self) {
        self.period = None;
        if let Some(timer) = self.timer.take() {
            timer.abort();
            // On a multi-threaded runtime the timer may be mid-tick right now;
            // once it has terminated it cannot start another update.
            timer.await.ok();
        }
    }

    async fn drain(&self) -> Result<()> {
        let last_update = self
            .shared
            .last_update
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match last_update {
            Some(update) => update.await?,
            None => Ok(()),
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn run_timer(shared: Arc<Shared>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        tick(&shared);
    }
}

/// Starts one update unless the previous one is still writing. Contains no
/// await, so aborting the timer can't interrupt it halfway.
fn tick(shared: &Arc<Shared>) {
    if shared
        .in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        shared.skipped.fetch_add(1, Ordering::Relaxed);
        log::debug!("previous update still in flight, skipping tick");
        return;
    }

    // Built before the animations run: if one of them panics, unwinding
    // still clears the flag.
    let guard = InFlight(shared.clone());
    shared.ticks.fetch_add(1, Ordering::Relaxed);
    let t = shared.epoch.elapsed().as_secs_f64();

    let mut writes = JoinSet::new();
    for binding in &shared.bindings {
        let color = (binding.animation)(t);
        for led in &binding.leds {
            let led = led.clone();
            writes.spawn(async move {
                led.set_color(color).await.map_err(|err| {
                    log::warn!("failed to update {}: {err}", led.name());
                    err
                })
            });
        }
    }

    let update = tokio::spawn(async move {
        let _guard = guard;
        let mut result = Ok(());
        while let Some(joined) = writes.join_next().await {
            let outcome = joined.map_err(LedError::from).and_then(|written| written);
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    });

    *shared
        .last_update
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(update);
}

/// Clears the in-flight flag when the update finishes, however it finishes.
struct InFlight(Arc<Shared>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}
