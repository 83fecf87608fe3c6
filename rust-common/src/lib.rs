//! Shared library for cross-cutting concerns in the ESC SDK crates.
//!
//! This crate provides:
//! - The transport-level error type with retryability classification
//! - Tracing subscriber setup for applications embedding the SDK

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod tracing_config;

pub use error::PlatformError;
pub use tracing_config::{TracingConfig, init_tracing, try_init_tracing};
