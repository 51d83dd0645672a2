//! Plan service
//!
//! Builds test-plan trees, renders them to JMX and writes the result.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::description;
use crate::application::jmx::{self, RenderOptions};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{InMemoryPlan, PlanBuilder, TestPlanNode};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::has_parent_traversal;

/// Service for building and writing JMX test plans.
pub struct PlanService {
    fs: Arc<dyn FileSystem>,
    render: RenderOptions,
    builder: PlanBuilder,
}

impl PlanService {
    /// Create a new plan service.
    pub fn new(fs: Arc<dyn FileSystem>, render: RenderOptions) -> Self {
        Self {
            fs,
            render,
            builder: PlanBuilder::new(),
        }
    }

    /// Validate `root` and resolve option defaults.
    ///
    /// Fails with `InvalidStructure`; never touches the filesystem.
    pub fn build(&self, root: TestPlanNode) -> ApplicationResult<InMemoryPlan> {
        let plan = self.builder.build(root)?;
        debug!(
            "build: {} thread groups, {} elements",
            plan.thread_group_count(),
            plan.element_count()
        );
        Ok(plan)
    }

    /// Render the plan as a JMX document.
    pub fn render(&self, plan: &InMemoryPlan) -> String {
        jmx::render(plan, &self.render)
    }

    /// Serialize `plan` to `path`, creating parent directories.
    ///
    /// The file is replaced atomically: on failure the previous content (or
    /// absence) of `path` is preserved. Fails with `IoFailure`.
    pub fn write(&self, plan: &InMemoryPlan, path: &Path) -> ApplicationResult<()> {
        debug!("write: path={}", path.display());
        if has_parent_traversal(path) {
            return Err(ApplicationError::IoFailure {
                context: format!("plan file {}", path.display()),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path must not contain '..' components",
                ),
            });
        }

        let content = self.render(plan);
        self.fs
            .ensure_parent(path)
            .with_path_context("parent directory of", path)?;
        self.fs
            .write_atomic(path, &content)
            .with_path_context("plan file", path)?;

        info!("wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Read a plan description file into an element tree.
    pub fn load(&self, path: &Path) -> ApplicationResult<TestPlanNode> {
        debug!("load: path={}", path.display());
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InputFailure {
                context: format!("plan description {}", path.display()),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_input_context("plan description", path)?;
        Ok(description::load(&content)?)
    }

    /// Load a description, build it, and write the JMX to `output`.
    pub fn build_file(&self, input: &Path, output: &Path) -> ApplicationResult<InMemoryPlan> {
        let root = self.load(input)?;
        let plan = self.build(root)?;
        self.write(&plan, output)?;
        Ok(plan)
    }
}
