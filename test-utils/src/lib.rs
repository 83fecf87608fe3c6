//! Shared test utilities for the ESC SDK crates.
//!
//! This crate provides:
//! - Proptest generators for value trees and eligibility rules
//! - An in-memory transport for driving the client
//! - Canned service response bodies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{MockTransport, RecordedRequest, RequestMethod};
