//! Dakids - kids channel catalog addon and embed proxy
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod library;
pub mod proxy;
pub mod server;
pub mod streams;
