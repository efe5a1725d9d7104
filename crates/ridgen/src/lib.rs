#![cfg_attr(docsrs, feature(doc_cfg))]
//! Coordination-free resource identifiers.
//!
//! `ridgen` mints identifiers in two stages:
//!
//! 1. A Snowflake-style generator produces a 64-bit numeric ID made of a
//!    millisecond timestamp (relative to a configured epoch), a machine ID and
//!    a per-tick sequence. No shared counter or consensus round-trip is
//!    needed, only a unique machine ID per running instance.
//! 2. A short-code encoder scales, salts, diffuses and permutes that number
//!    into a fixed-length string over a human-typeable alphabet, hiding the
//!    issuance order, instance and volume.
//!
//! [`Minter`] glues both together and prefixes the code with a
//! [`ResourceTag`]:
//!
//! ```
//! use ridgen::{
//!     BackoffPolicy, CodeOptions, GeneratorConfig, LockGenerator, Minter, ResourceTag,
//!     SnowflakeId, SystemClock,
//! };
//!
//! let config = GeneratorConfig::<SnowflakeId>::new(1).unwrap();
//! let generator = LockGenerator::new(config, SystemClock);
//! let minter = Minter::new(generator, CodeOptions::default(), BackoffPolicy::default());
//!
//! let id = minter.mint_blocking(&ResourceTag::USER).unwrap();
//! assert!(id.as_str().starts_with("mu-"));
//! assert_eq!(id.code().chars().count(), 8);
//! ```
mod code;
mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod id;
mod resource;
mod time;

pub use crate::code::*;
pub use crate::error::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::resource::*;
pub use crate::time::*;
#[cfg(feature = "async-tokio")]
pub use tokio_util::sync::CancellationToken;
