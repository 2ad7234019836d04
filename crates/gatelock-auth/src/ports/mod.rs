//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the host gateway calls
//! - **Outbound (Driven)**: Dependencies this crate needs

pub mod inbound;
pub mod outbound;
