//! Plan builder: validates a test-plan tree and resolves option defaults.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::entities::{ConfigKind, ElementKind, OptionValue, Options, TestPlanNode};
use crate::domain::error::DomainError;
use crate::domain::schema;

/// Result type for plan building.
pub type PlanResult<T> = Result<T, DomainError>;

/// A validated plan, ready for serialization.
///
/// The root is always a `test_plan` element and every option that has a
/// schema default is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryPlan {
    root: TestPlanNode,
}

impl InMemoryPlan {
    pub fn root(&self) -> &TestPlanNode {
        &self.root
    }

    pub fn thread_group_count(&self) -> usize {
        self.root
            .children()
            .iter()
            .filter(|c| c.kind() == ElementKind::ThreadGroup)
            .count()
    }

    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }
}

/// Validates nesting and option rules.
///
/// Checks run depth-first with children in order; the first violation wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanBuilder;

impl PlanBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, root: TestPlanNode) -> PlanResult<InMemoryPlan> {
        let root = Self::normalize_root(root)?;
        debug!("build: validating {} elements", root.element_count());

        if !root
            .children()
            .iter()
            .any(|c| c.kind() == ElementKind::ThreadGroup)
        {
            return Err(DomainError::EmptyPlan);
        }

        let root = self.resolve(root, ElementKind::TestPlan.id().to_string())?;
        Ok(InMemoryPlan { root })
    }

    /// A bare thread group is wrapped in a default test plan.
    fn normalize_root(root: TestPlanNode) -> PlanResult<TestPlanNode> {
        match root.kind() {
            ElementKind::TestPlan => Ok(root),
            ElementKind::ThreadGroup => {
                debug!("build: wrapping root thread group in a test plan");
                Ok(TestPlanNode::test_plan([root]))
            }
            kind @ (ElementKind::Sampler(_) | ElementKind::ConfigElement(_)) => {
                Err(DomainError::InvalidRoot { kind })
            }
        }
    }

    fn resolve(&self, node: TestPlanNode, path: String) -> PlanResult<TestPlanNode> {
        trace!("resolve: {}", path);
        let (kind, options, children) = node.into_parts();

        let options = Self::resolve_options(kind, options, &path)?;
        Self::check_cross_field(kind, &options, &path)?;

        if !kind.is_container() && !children.is_empty() {
            return Err(DomainError::LeafWithChildren { path, kind });
        }

        // index among siblings sharing a kind id
        let mut seen: HashMap<ElementKind, usize> = HashMap::new();
        let mut resolved = Vec::with_capacity(children.len());
        for child in children {
            let child_kind = child.kind();
            let index = seen.entry(child_kind).or_insert(0);
            let child_path = format!("{}/{}[{}]", path, child_kind.id(), index);
            *index += 1;

            if !kind.accepts_child(child_kind) {
                return Err(DomainError::MisplacedElement {
                    path: child_path,
                    parent: kind,
                    child: child_kind,
                });
            }
            resolved.push(self.resolve(child, child_path)?);
        }

        Ok(TestPlanNode::new(kind, options, resolved))
    }

    fn resolve_options(kind: ElementKind, options: Options, path: &str) -> PlanResult<Options> {
        for (name, value) in options.iter() {
            let spec = schema::lookup(kind, name).ok_or_else(|| DomainError::UnknownOption {
                path: path.to_string(),
                kind,
                option: name.to_string(),
            })?;
            spec.check(path, value)?;
        }

        let mut resolved = options;
        for spec in schema::specs(kind) {
            if resolved.contains(spec.name) {
                continue;
            }
            if spec.required {
                return Err(DomainError::MissingOption {
                    path: path.to_string(),
                    option: spec.name.to_string(),
                });
            }
            if let Some(value) = spec.default.resolve(kind) {
                resolved.set(spec.name, value);
            }
        }
        Ok(resolved)
    }

    fn check_cross_field(kind: ElementKind, options: &Options, path: &str) -> PlanResult<()> {
        if kind != ElementKind::ConfigElement(ConfigKind::Counter) {
            return Ok(());
        }
        let start = options.get("start").and_then(OptionValue::as_int);
        let end = options.get("end").and_then(OptionValue::as_int);
        match (start, end) {
            (Some(start), Some(end)) if end < start => Err(DomainError::InvalidOptionValue {
                path: path.to_string(),
                option: "end".to_string(),
                reason: format!("{} is below start {}", end, start),
            }),
            _ => Ok(()),
        }
    }
}

/// Validate `root` with a default [`PlanBuilder`].
pub fn build(root: TestPlanNode) -> PlanResult<InMemoryPlan> {
    PlanBuilder::new().build(root)
}
