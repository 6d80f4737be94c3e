//! # Reference Compatibility
//!
//! The hand-written codecs must agree byte for byte with widely used
//! implementations.

mod signing;
