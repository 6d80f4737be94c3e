//! # Domain Layer
//!
//! Pure encode/decode transforms.

pub mod abi;
pub mod calls;
pub mod errors;
pub mod records;
