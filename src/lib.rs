//! Customer ordering client for the restaurant point-of-sale backend.
//!
//! - `gateway`: REST operations against the backend, tolerant of its
//!   inconsistent JSON.
//! - `order`: the ordering session (cart + table choice) and the multi-step
//!   checkout with best-effort cancellation.
//! - `tables`: periodic table availability refresh.
//! - `session`: signed-in staff identity for authenticated calls.

pub mod cart;
pub mod config;
pub mod error;
pub mod gateway;
pub mod menu;
pub mod model;
pub mod order;
pub mod session;
pub mod tables;
