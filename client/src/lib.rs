//! ESC client for Rust.
//!
//! Ties an [`EscTransport`] to the value and gate codecs: builds endpoint
//! URLs, request bodies, and decodes responses into annotated environments
//! and typed change gates. HTTP itself stays behind the transport trait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{EnvironmentValues, EscClient};
pub use config::EscConfig;
pub use error::{EscError, EscResult};
pub use transport::EscTransport;
