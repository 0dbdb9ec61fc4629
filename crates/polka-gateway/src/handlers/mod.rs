//! Gateway handlers
//!
//! Request handlers for all gateway endpoints.
//! Each module handles a specific domain.

pub mod accounts;
pub mod agents;
pub mod events;
pub mod health;
pub mod queries;
