mod worker;
pub use worker::Stats;

mod aggregate;
pub use aggregate::AggregateStats;
