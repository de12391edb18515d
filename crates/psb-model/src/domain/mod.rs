mod task_config;
pub use task_config::TaskConfig;

mod payload;
pub use payload::Payload;

mod value;
pub use value::{ProxyRef, REDACTED, Value};

mod task_request;
pub use task_request::TaskRequest;

mod task_result;
pub use task_result::TaskResult;

mod route;
pub use route::RouteKind;

mod clock;
pub use clock::{epoch_seconds, now_epoch};

/// Size value in bytes.
///
/// Sizes are accepted as floating point numbers on the command line (e.g. `1e6`),
/// so they stay floating point until a buffer is actually allocated.
pub type SizeBytes = f64;
