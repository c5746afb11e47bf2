//! Shared domain types for Parley: conversation messages, the model
//! catalog, configuration, the error type, and structured trace events.

pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod trace;

pub use catalog::{ModelCatalog, ModelOption, DEFAULT_MODEL};
pub use error::{Error, Result};
pub use message::{Message, Role};
