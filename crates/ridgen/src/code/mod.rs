mod encode;
mod error;
mod options;

pub use encode::*;
pub use error::*;
pub use options::*;
