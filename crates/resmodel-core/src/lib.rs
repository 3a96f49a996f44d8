//! Resolves the resources of a REST API description into a named, grouped
//! resource model with CRUD operations.

pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

pub use transform::{ImportOptions, import_service, import_spec};
