//! # Shared Types Crate
//!
//! Primitive aliases and the hex/hash codec used across the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifier shapes (document ids, tx hashes,
//!   addresses) are parsed and printed only through this crate.
//! - **Fixed-size types**: hashes and addresses are byte arrays, so a value
//!   that made it past parsing always has the right length.

pub mod entities;
pub mod errors;
pub mod hex_codec;

pub use entities::*;
pub use errors::*;
pub use hex_codec::*;
