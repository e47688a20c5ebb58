//! Snowflake-style distributed IDs.
//!
//! A [`SnowflakeId`] packs four fields into a positive `i64`:
//!
//! ```text
//! [ sign (1) | timestamp delta (41) | datacenter ID (5) | worker ID (5) | sequence (12) ]
//! ```
//!
//! A generator bound to one `(datacenter_id, worker_id)` pair hands out
//! strictly increasing IDs, up to 4096 per millisecond, and refuses to issue
//! anything while the clock reads earlier than its last ID. Distinct pairs
//! never collide, so every concurrently running generator in a deployment
//! needs its own pair.
//!
//! ```
//! use snowseq::LockSnowflakeGenerator;
//!
//! let generator = LockSnowflakeGenerator::new(1, 1).unwrap();
//! let a = generator.next_id().unwrap();
//! let b = generator.next_id().unwrap();
//! assert!(a < b);
//! assert_eq!(a.sequence(), 0);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::config::*;
pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
