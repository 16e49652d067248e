//! Shared domain types for Tandem.
//!
//! This crate contains the core domain types used across the Tandem console:
//! AI roles, conversation messages, context-budget configuration, gateway
//! wire shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod budget;
pub mod error;
pub mod message;
pub mod role;
pub mod wire;
