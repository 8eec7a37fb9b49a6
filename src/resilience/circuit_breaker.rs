//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: backend assumed down, calls fail fast
//! - Half-Open: testing if the backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: the last window_size outcomes are all failures
//! Open → Half-Open: open_duration elapsed, next permit() becomes the probe
//! Half-Open → Closed: probe call succeeds (window starts empty)
//! Half-Open → Open: probe call fails (open timer restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker instance for the one outbound call type
//! - Fail fast in Open state, no queueing behind the timeout
//! - Single probe in Half-Open (prevents hammering a recovering backend)
//! - Open → Half-Open is evaluated lazily inside `permit()`, no timer task

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Outcome of one attempted backend call, fed to the breaker exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    /// Failed call, tagged with a compact reason label for logs and metrics.
    Failure(&'static str),
}

impl CallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CallOutcome::Failure(_))
    }
}

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State plus the data that only exists in that state.
#[derive(Debug)]
enum Inner {
    /// Sliding record of the last `window_size` outcomes, `true` = failure.
    Closed { window: VecDeque<bool> },
    Open { opened_at: Instant },
    HalfOpen { probe_in_flight: bool },
}

impl Inner {
    fn kind(&self) -> CircuitState {
        match self {
            Inner::Closed { .. } => CircuitState::Closed,
            Inner::Open { .. } => CircuitState::Open,
            Inner::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }
}

/// Three-state circuit breaker guarding the outbound ring call.
///
/// `permit()` and `record()` are total: they never fail and handle every
/// state. One mutex guards the whole state so a permit/record pair from two
/// tasks cannot interleave into a double transition, and the Half-Open probe
/// slot is granted to at most one caller.
#[derive(Debug)]
pub struct CircuitBreaker {
    window_size: usize,
    open_duration: std::time::Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        Self {
            window_size: config.window_size.max(1),
            open_duration: config.open_duration(),
            inner: Mutex::new(Inner::Closed {
                window: VecDeque::with_capacity(config.window_size.max(1) + 1),
            }),
        }
    }

    /// Decide whether the next call may be attempted.
    ///
    /// Closed always permits. Open permits only once `open_duration` has
    /// elapsed, which moves the breaker to Half-Open with the probe slot
    /// taken by this caller. Half-Open permits only while no probe is in
    /// flight.
    pub fn permit(&self) -> bool {
        let mut inner = self.lock();
        let (allowed, next) = match &mut *inner {
            Inner::Closed { .. } => (true, None),
            Inner::Open { opened_at } => {
                if opened_at.elapsed() >= self.open_duration {
                    (
                        true,
                        Some(Inner::HalfOpen {
                            probe_in_flight: true,
                        }),
                    )
                } else {
                    (false, None)
                }
            }
            Inner::HalfOpen { probe_in_flight } => {
                if *probe_in_flight {
                    (false, None)
                } else {
                    *probe_in_flight = true;
                    (true, None)
                }
            }
        };
        if let Some(next) = next {
            Self::transition(&mut inner, next);
        }
        allowed
    }

    /// Feed the outcome of an attempted call back into the breaker.
    ///
    /// While Closed the outcome joins the sliding window; a full window of
    /// failures trips the breaker. While Half-Open the probe outcome decides
    /// the next state. An outcome arriving while Open belongs to a call
    /// permitted before the trip and is dropped.
    pub fn record(&self, outcome: CallOutcome) {
        let mut inner = self.lock();
        let next = match &mut *inner {
            Inner::Closed { window } => {
                window.push_back(outcome.is_failure());
                if window.len() > self.window_size {
                    window.pop_front();
                }
                // The window only votes once it is full.
                if window.len() == self.window_size && window.iter().all(|failed| *failed) {
                    Some(Inner::Open {
                        opened_at: Instant::now(),
                    })
                } else {
                    None
                }
            }
            Inner::HalfOpen { .. } => match outcome {
                CallOutcome::Success => Some(Inner::Closed {
                    window: VecDeque::with_capacity(self.window_size + 1),
                }),
                CallOutcome::Failure(_) => Some(Inner::Open {
                    opened_at: Instant::now(),
                }),
            },
            Inner::Open { .. } => None,
        };
        if let Some(next) = next {
            Self::transition(&mut inner, next);
        }
    }

    /// Snapshot of the current state, for introspection and tests.
    pub fn state(&self) -> CircuitState {
        self.lock().kind()
    }

    fn transition(inner: &mut Inner, next: Inner) {
        let from = inner.kind();
        let to = next.kind();
        *inner = next;
        match to {
            CircuitState::Open => {
                tracing::warn!(from = %from, to = %to, "Circuit breaker opened");
            }
            _ => {
                tracing::info!(from = %from, to = %to, "Circuit breaker state changed");
            }
        }
        metrics::record_breaker_transition(from, to);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every transition leaves the state consistent, so a guard recovered
        // from a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
