//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

pub mod cached;
pub mod clock;
pub mod file_source;
