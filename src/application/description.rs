//! Plan description files: a TOML rendition of a test-plan tree.
//!
//! ```toml
//! [plan]
//! name = "Hello plan"
//!
//! [[elements]]
//! kind = "thread_group"
//! options = { count = 1, rampup = 0, loops = 1 }
//!
//! [[elements.children]]
//! kind = "beanshell_sampler"
//! options = { query = 'log.info("Hello");' }
//! ```
//!
//! `[plan]` holds the options of the `test_plan` root, `elements` its
//! children. Element order is kept as written.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, ElementKind, Options, PlanResult, TestPlanNode};

/// Top level of a description file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDescription {
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub plan: Options,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementDescription>,
}

/// One element and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDescription {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementDescription>,
}

impl PlanDescription {
    pub fn parse(content: &str) -> PlanResult<Self> {
        toml::from_str(content).map_err(|e| DomainError::Description(e.to_string()))
    }

    /// Convert into an (unvalidated) element tree rooted at a test plan.
    pub fn into_node(self) -> PlanResult<TestPlanNode> {
        let children = self
            .elements
            .into_iter()
            .map(ElementDescription::into_node)
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(TestPlanNode::new(ElementKind::TestPlan, self.plan, children))
    }

    /// Describe `node`. A `test_plan` root maps to `[plan]`; any other root
    /// becomes the single top-level element.
    pub fn from_node(node: &TestPlanNode) -> Self {
        if node.kind() == ElementKind::TestPlan {
            Self {
                plan: node.options().clone(),
                elements: node.children().iter().map(ElementDescription::from_node).collect(),
            }
        } else {
            Self {
                plan: Options::new(),
                elements: vec![ElementDescription::from_node(node)],
            }
        }
    }

    pub fn to_toml(&self) -> PlanResult<String> {
        toml::to_string_pretty(self).map_err(|e| DomainError::Description(e.to_string()))
    }
}

impl ElementDescription {
    fn into_node(self) -> PlanResult<TestPlanNode> {
        let kind: ElementKind = self.kind.parse()?;
        let children = self
            .children
            .into_iter()
            .map(ElementDescription::into_node)
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(TestPlanNode::new(kind, self.options, children))
    }

    fn from_node(node: &TestPlanNode) -> Self {
        Self {
            kind: node.kind().id().to_string(),
            options: node.options().clone(),
            children: node.children().iter().map(ElementDescription::from_node).collect(),
        }
    }
}

/// Parse a description into an element tree.
pub fn load(content: &str) -> PlanResult<TestPlanNode> {
    PlanDescription::parse(content)?.into_node()
}

/// TOML description of `node`; [`load`] turns it back into an equivalent tree.
pub fn describe(node: &TestPlanNode) -> PlanResult<String> {
    PlanDescription::from_node(node).to_toml()
}
