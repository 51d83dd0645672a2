//! Domain layer: test-plan elements, option schema and validation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod schema;

pub use builder::{build, InMemoryPlan, PlanBuilder, PlanResult};
pub use entities::*;
pub use error::DomainError;
