//! Lightweight Prometheus-compatible call metrics using atomic counters.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::error_code::ErrorCode;

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    /// No response was obtained.
    Transport,
    /// Failure HTTP status without a service error code in the body.
    Protocol,
    /// Body carried a service error code.
    Domain,
    /// Body could not be parsed.
    Decode,
    /// Rejected because server-side state changed concurrently.
    Conflict,
}

impl CallOutcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Domain => "domain",
            Self::Decode => "decode",
            Self::Conflict => "conflict",
        }
    }

    /// Classifies a failure by the code at the top of its chain.
    ///
    /// Conflicts are a routing decision of the caller and are never inferred
    /// here.
    pub fn classify(error: &Error) -> Self {
        match error.code() {
            ErrorCode::NetworkError => Self::Transport,
            ErrorCode::InvalidResponse => Self::Decode,
            code if code.is_http_status() => Self::Protocol,
            _ => Self::Domain,
        }
    }
}

const ALL_OUTCOMES: [CallOutcome; 6] = [
    CallOutcome::Success,
    CallOutcome::Transport,
    CallOutcome::Protocol,
    CallOutcome::Domain,
    CallOutcome::Decode,
    CallOutcome::Conflict,
];

/// SDK-wide call metrics collected via atomic counters.
pub struct CallMetrics {
    in_flight: AtomicU64,
    outcomes: [AtomicU64; 6],
    /// Accumulated round-trip time stored as microseconds.
    duration_us_sum: AtomicU64,
    duration_count: AtomicU64,
}

impl Default for CallMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CallMetrics {
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicU64::new(0),
            outcomes: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
            duration_us_sum: AtomicU64::new(0),
            duration_count: AtomicU64::new(0),
        }
    }

    fn slot(&self, outcome: CallOutcome) -> &AtomicU64 {
        let idx = match outcome {
            CallOutcome::Success => 0,
            CallOutcome::Transport => 1,
            CallOutcome::Protocol => 2,
            CallOutcome::Domain => 3,
            CallOutcome::Decode => 4,
            CallOutcome::Conflict => 5,
        };
        &self.outcomes[idx]
    }

    /// Record a request handed to the transport.
    ///
    /// The call counts as in flight until the returned guard is dropped,
    /// whether it completes or its future is abandoned.
    #[must_use = "the call stops counting as in flight when the guard is dropped"]
    pub fn record_sent(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlight { metrics: self }
    }

    /// Record the round-trip time of a response or transport failure.
    pub fn record_delivered(&self, duration_us: u64) {
        self.duration_us_sum
            .fetch_add(duration_us, Ordering::Relaxed);
        self.duration_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how a call ended.
    pub fn record_outcome(&self, outcome: CallOutcome) {
        self.slot(outcome).fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, outcome: CallOutcome) -> u64 {
        self.slot(outcome).load(Ordering::Relaxed)
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(1024);

        writeln!(out, "# HELP lodestar_calls_in_flight Requests awaiting a response.").unwrap();
        writeln!(out, "# TYPE lodestar_calls_in_flight gauge").unwrap();
        writeln!(out, "lodestar_calls_in_flight {}", self.in_flight()).unwrap();

        writeln!(out, "# HELP lodestar_calls_total Completed calls by outcome.").unwrap();
        writeln!(out, "# TYPE lodestar_calls_total counter").unwrap();
        for outcome in &ALL_OUTCOMES {
            let label = outcome.label();
            let total = self.count(*outcome);
            writeln!(out, "lodestar_calls_total{{outcome=\"{label}\"}} {total}").unwrap();
        }

        let us = self.duration_us_sum.load(Ordering::Relaxed);
        let secs = us as f64 / 1_000_000.0;
        writeln!(
            out,
            "# HELP lodestar_call_duration_seconds_sum Total round-trip time in seconds."
        )
        .unwrap();
        writeln!(out, "# TYPE lodestar_call_duration_seconds_sum counter").unwrap();
        writeln!(out, "lodestar_call_duration_seconds_sum {secs:.6}").unwrap();

        writeln!(
            out,
            "# HELP lodestar_call_duration_seconds_count Total number of timed calls."
        )
        .unwrap();
        writeln!(out, "# TYPE lodestar_call_duration_seconds_count counter").unwrap();
        writeln!(
            out,
            "lodestar_call_duration_seconds_count {}",
            self.duration_count.load(Ordering::Relaxed)
        )
        .unwrap();

        out
    }
}

/// Holds one slot of the in-flight gauge.
pub struct InFlight<'a> {
    metrics: &'a CallMetrics,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
