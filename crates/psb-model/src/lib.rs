mod domain;
pub use domain::*;

mod stats;
pub use stats::*;

mod error;
pub use error::ModelError;
