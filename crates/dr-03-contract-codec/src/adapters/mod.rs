//! # Adapters Layer
//!
//! File-backed ABI artifacts.

pub mod artifact;
