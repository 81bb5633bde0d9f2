#![forbid(unsafe_code)]

pub mod model;
pub mod stats;
pub mod time;
pub mod trend;

pub use time::Clock;
