mod atomic;
mod backoff;
mod config;
mod interface;
mod lock;
mod mutex;
mod status;

pub use atomic::*;
pub use backoff::*;
pub use config::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
pub use status::*;
