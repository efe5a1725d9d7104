mod generator;
mod sleep_provider;
mod tokio_sleep;

pub use generator::*;
pub use sleep_provider::*;
pub use tokio_sleep::*;
