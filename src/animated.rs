//! An [`RgbLed`] that runs its own animation loop instead of being driven by
//! an [`Animator`](crate::animator::Animator).
//!
//! Each iteration writes one color, then sleeps for what is left of the
//! period. The sleep is cancellable, so changing the animation or closing the
//! led takes effect immediately rather than after the stale period.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{
    sync::{oneshot, Notify},
    task::JoinHandle,
    time::Instant,
};

use crate::{
    delay::{cancellable_delay, period_for},
    effects::{constant, Animation, Color},
    error::{LedError, Result},
    rgb_led::RgbLed,
};

struct LoopState {
    animation: Animation,
    period: Option<Duration>,
    alive: bool,
    /// Bumped on every change so the loop can tell it missed a wake-up.
    generation: u64,
    /// Resolved once a color from the current animation has been written.
    pending: Option<oneshot::Sender<Result<()>>>,
}

struct LoopShared {
    state: Mutex<LoopState>,
    wake: Notify,
}

impl LoopShared {
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct AnimatedRgbLed {
    led: Arc<RgbLed>,
    shared: Arc<LoopShared>,
    task: JoinHandle<()>,
}

impl AnimatedRgbLed {
    /// Starts the loop with a static `[0, 0, 0]`. Must be called from within
    /// a tokio runtime.
    pub fn new(led: RgbLed) -> AnimatedRgbLed {
        let led = Arc::new(led);
        let shared = Arc::new(LoopShared {
            state: Mutex::new(LoopState {
                animation: constant(Color::OFF),
                period: None,
                alive: true,
                generation: 0,
                pending: None,
            }),
            wake: Notify::new(),
        });
        let task = tokio::spawn(run_loop(led.clone(), shared.clone()));

        AnimatedRgbLed { led, shared, task }
    }

    pub fn led(&self) -> &Arc<RgbLed> {
        &self.led
    }

    /// Switches to `animation` at `frequency` Hz and waits until a color
    /// from it has been written, returning that write's result. A frequency
    /// of zero writes once and then sleeps until the next change.
    ///
    /// If another call replaces the animation before this one was applied,
    /// this one resolves `Ok` without writing.
    pub async fn set_animation(&self, animation: Animation, frequency: f64) -> Result<()> {
        let period = period_for(frequency)?;

        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.shared.lock();
            if !state.alive {
                return Err(LedError::Closed(self.led.name()));
            }
            state.animation = animation;
            state.period = period;
            state.pending = Some(tx);
            state.generation += 1;
        }
        self.shared.wake.notify_waiters();

        rx.await.unwrap_or(Ok(()))
    }

    pub async fn set_static_color(&self, color: Color) -> Result<()> {
        self.set_animation(constant(color), 0.0).await
    }

    /// Stops the loop, waking it if it sleeps, then closes the leds.
    pub async fn close(mut self) -> Result<()> {
        self.shared.lock().alive = false;
        self.shared.wake.notify_waiters();
        (&mut self.task).await?;
        self.shared.lock().pending.take();

        self.led.close().await
    }
}

impl Drop for AnimatedRgbLed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_loop(led: Arc<RgbLed>, shared: Arc<LoopShared>) {
    let epoch = Instant::now();

    loop {
        let start = Instant::now();
        let (animation, pending, generation) = {
            let mut state = shared.lock();
            if !state.alive {
                break;
            }
            (state.animation.clone(), state.pending.take(), state.generation)
        };

        let result = led.set_color(animation(epoch.elapsed().as_secs_f64())).await;
        if let Err(err) = &result {
            log::warn!("failed to update {}: {err}", led.name());
        }
        if let Some(pending) = pending {
            pending.send(result).ok();
        }

        // Register for wake-ups before looking at the state, so a change made
        // in between still ends the delay.
        let wake = shared.wake.notified();
        tokio::pin!(wake);
        wake.as_mut().enable();

        let period = {
            let state = shared.lock();
            if !state.alive || state.generation != generation {
                continue;
            }
            state.period
        };
        let remaining = period.map(|period| period.saturating_sub(start.elapsed()));
        cancellable_delay(remaining, wake).await;
    }

    log::debug!("animation loop for {} finished", led.name());
}
