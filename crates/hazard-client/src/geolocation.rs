//! # Geolocation Acquirer
//!
//! Wraps a one-shot device location query in a `GeolocationResult` slot.
//!
//! Overlapping attempts within one session resolve last-wins. An
//! [`invalidate`](GeolocationAcquirer::invalidate) call (form reset or
//! unmount) starts a new session epoch, and anything still in flight from
//! the old epoch is dropped when it lands.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{self, Either};
use hazard_domain::{GeolocationError, GeolocationResult, Position};
use tracing::{debug, warn};

/// Options handed to the device query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Upper bound on the wait; past it the attempt fails with `Timeout`
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Device location capability
#[async_trait(?Send)]
pub trait LocationSource {
    /// One-shot current position, coordinates verbatim from the device
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError>;
}

/// Query `source`, failing with `Timeout` if `deadline` completes first.
///
/// The deadline is a future so each platform can supply its own timer
/// (tokio natively, `gloo-timers` in the browser).
pub async fn locate<S, D>(
    source: &S,
    options: &PositionOptions,
    deadline: D,
) -> Result<Position, GeolocationError>
where
    S: LocationSource + ?Sized,
    D: Future<Output = ()>,
{
    let lookup = source.current_position(options);
    futures::pin_mut!(deadline);

    match future::select(lookup, deadline).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(GeolocationError::Timeout),
    }
}

/// Identifies one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionTicket {
    epoch: u64,
    attempt: u64,
}

impl AcquisitionTicket {
    pub const fn attempt(&self) -> u64 {
        self.attempt
    }
}

/// Single result slot for device location attempts
#[derive(Debug, Clone, Default)]
pub struct GeolocationAcquirer {
    result: GeolocationResult,
    options: PositionOptions,
    epoch: u64,
    attempts: u64,
}

impl GeolocationAcquirer {
    pub fn new(options: PositionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub const fn result(&self) -> &GeolocationResult {
        &self.result
    }

    pub const fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Start an attempt; the slot shows `Pending` immediately
    pub fn begin(&mut self) -> AcquisitionTicket {
        self.attempts += 1;
        self.result = GeolocationResult::Pending;
        debug!(attempt = self.attempts, "acquiring device location");
        AcquisitionTicket {
            epoch: self.epoch,
            attempt: self.attempts,
        }
    }

    /// Apply an attempt's outcome. Returns the position when one was
    /// accepted; stale tickets change nothing.
    pub fn resolve(
        &mut self,
        ticket: AcquisitionTicket,
        outcome: Result<Position, GeolocationError>,
    ) -> Option<Position> {
        if ticket.epoch != self.epoch {
            debug!(attempt = ticket.attempt, "discarding location from a previous session");
            return None;
        }

        match outcome {
            Ok(position) => {
                debug!(attempt = ticket.attempt, lat = position.lat, lng = position.lng, "location acquired");
                self.result = GeolocationResult::Success(position);
                Some(position)
            }
            Err(err) => {
                warn!(attempt = ticket.attempt, error = ?err, "location acquisition failed");
                self.result = GeolocationResult::Failure(err);
                None
            }
        }
    }

    /// Forget the current result and orphan every outstanding attempt
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.result = GeolocationResult::Idle;
    }

    /// Run one full attempt against `source`
    pub async fn acquire<S, D>(&mut self, source: &S, deadline: D) -> &GeolocationResult
    where
        S: LocationSource + ?Sized,
        D: Future<Output = ()>,
    {
        let ticket = self.begin();
        let outcome = locate(source, &self.options, deadline).await;
        self.resolve(ticket, outcome);
        &self.result
    }
}
