//! Round-trip task latency benchmark.
//!
//! A producer submits one task at a time and blocks on an [`AlternationSignal`](crate::AlternationSignal)
//! until the consumer has received that task's result, so exactly one task is ever in flight
//! and every measured interval is a true round trip.

mod config;
pub use config::RoundTripConfig;

mod thinker;
pub use thinker::RoundTrip;

mod benchmark;
pub use benchmark::RoundTripBenchmark;

mod report;
pub use report::RoundTripReport;
