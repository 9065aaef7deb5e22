use std::{future::Future, time::Duration};

use crate::error::{LedError, Result};

/// Tick period for a rate in Hz: `None` for zero, `1 / frequency` seconds
/// otherwise. Rejects negative and non-finite rates, and rates whose period
/// doesn't fit a `Duration` or rounds down to nothing.
pub fn period_for(frequency: f64) -> Result<Option<Duration>> {
    if !frequency.is_finite() || frequency < 0.0 {
        return Err(LedError::InvalidFrequency(frequency));
    }
    if frequency == 0.0 {
        return Ok(None);
    }

    match Duration::try_from_secs_f64(1.0 / frequency) {
        Ok(period) if !period.is_zero() => Ok(Some(period)),
        _ => Err(LedError::InvalidFrequency(frequency)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shutdown {
    Elapsed,
    Interrupted,
}

/// Waits out `duration` unless `signal` resolves `Ok` first. A signal that
/// fails is logged and ignored, so the full duration still runs.
pub async fn wait_for_shutdown(
    duration: Duration,
    signal: impl Future<Output = std::io::Result<()>>,
) -> Shutdown {
    let interrupted = async {
        if let Err(err) = signal.await {
            log::error!("Unable to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    };

    match cancellable_delay(Some(duration), interrupted).await {
        Wake::Elapsed => Shutdown::Elapsed,
        Wake::Cancelled => Shutdown::Interrupted,
    }
}

/// Sleeps for `duration`, or forever when it is `None`, unless `cancel`
/// completes first.
pub async fn cancellable_delay(duration: Option<Duration>, cancel: impl Future<Output = ()>) -> Wake {
    match duration {
        Some(duration) => tokio::select! {
            _ = tokio::time::sleep(duration) => Wake::Elapsed,
            _ = cancel => Wake::Cancelled,
        },
        None => {
            cancel.await;
            Wake::Cancelled
        }
    }
}
