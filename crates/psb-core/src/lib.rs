pub mod error;
pub use error::{CoreError, CoreResult};

pub mod matrix;
pub use matrix::TaskMatrix;

pub mod signal;
pub use signal::AlternationSignal;

pub mod rtt;
pub use rtt::{RoundTrip, RoundTripBenchmark, RoundTripConfig, RoundTripReport};

pub mod qps;
pub use qps::{LoadGenerator, PROCESS_STARTUP_BUFFER, QpsConfig, WorkerRun};

mod aggregate;
pub use aggregate::aggregate;

mod clock;
pub use clock::{readable_time, run_dir_name, wait_until};
