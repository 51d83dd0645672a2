//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod description;
pub mod error;
pub mod error_ext;
pub mod jmx;
pub mod services;
pub mod tree;

pub use description::{describe, load, PlanDescription};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use jmx::{render, RenderOptions};
pub use tree::PlanTreeConvert;
