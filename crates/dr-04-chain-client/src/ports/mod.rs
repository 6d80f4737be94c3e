//! # Ports Layer
//!
//! Outbound SPI consumed by the registry service.

pub mod outbound;
