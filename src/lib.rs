//! jmxplan: build JMeter test plans as typed element trees and write them as `.jmx` files.
//!
//! ```no_run
//! use jmxplan::domain::{Options, SamplerKind, TestPlanNode};
//!
//! let root = TestPlanNode::test_plan([TestPlanNode::thread_group(
//!     Options::new().with("count", 1).with("rampup", 0).with("loops", 1),
//!     [TestPlanNode::sampler(
//!         SamplerKind::BeanShell,
//!         Options::new().with("query", r#"log.info("Hello");"#),
//!     )],
//! )]);
//!
//! let plan = jmxplan::build(root)?;
//! jmxplan::write(&plan, std::path::Path::new("hello.jmx"))?;
//! # Ok::<(), jmxplan::application::ApplicationError>(())
//! ```

use std::path::Path;
use std::sync::Arc;

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

use application::jmx::RenderOptions;
use application::services::PlanService;
use application::ApplicationResult;
use domain::{InMemoryPlan, TestPlanNode};
use infrastructure::traits::RealFileSystem;

fn default_service() -> PlanService {
    PlanService::new(Arc::new(RealFileSystem), RenderOptions::default())
}

/// Validate `root` and produce an in-memory plan. Fails with `InvalidStructure`.
pub fn build(root: TestPlanNode) -> ApplicationResult<InMemoryPlan> {
    default_service().build(root)
}

/// Serialize `plan` to `path` with default render options. Fails with `IoFailure`.
pub fn write(plan: &InMemoryPlan, path: &Path) -> ApplicationResult<()> {
    default_service().write(plan, path)
}
