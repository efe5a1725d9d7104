mod id;
mod minter;
mod tag;

pub use id::*;
pub use minter::*;
pub use tag::*;
