//! Annotated value trees for ESC environments.
//!
//! The service returns resolved configuration as a tree of [`ValueNode`]s,
//! each carrying its payload plus `secret`/`unknown` flags and a provenance
//! [`Trace`]. This crate provides:
//! - Decoding of raw response bodies into value trees, with located errors
//! - Projection of trees into plain JSON values ([`project`])
//! - Dot-separated property path navigation ([`resolve`])
//! - The `OpenEnvironment` and `Environment` response models
//!
//! Everything here is pure and synchronous; fetching the response is the
//! transport's job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod environment;
pub mod error;
pub mod node;
pub mod path;
pub mod projection;

pub use environment::{Environment, OpenEnvironment};
pub use error::{ValueError, ValueResult};
pub use node::{Pos, Properties, Range, Trace, ValueNode, ValuePayload, decode_properties};
pub use path::resolve;
pub use projection::{PlainValue, project, project_properties};
