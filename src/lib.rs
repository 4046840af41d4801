//! Starfire backend library
//!
//! Exposes the core of the Starfire notes backend for integration
//! testing and embedding.

pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod services;
pub mod versioning;
