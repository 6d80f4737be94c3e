//! # Domain Layer
//!
//! Pure signing logic with no I/O dependencies.

pub mod ecdsa;
pub mod errors;
pub mod keys;
pub mod transaction;
