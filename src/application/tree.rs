//! Tree display of test plans (termtree)

use termtree::Tree;

use crate::domain::{ElementKind, InMemoryPlan, TestPlanNode};

pub trait PlanTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl PlanTreeConvert for TestPlanNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

impl PlanTreeConvert for InMemoryPlan {
    fn to_tree_string(&self) -> Tree<String> {
        self.root().to_tree_string()
    }
}

/// `name [kind]`, plus the load shape for thread groups.
fn label(node: &TestPlanNode) -> String {
    let mut label = format!("{} [{}]", node.name(), node.kind().id());
    if node.kind() == ElementKind::ThreadGroup {
        let shape: Vec<String> = ["count", "rampup", "loops"]
            .iter()
            .filter_map(|name| node.option(name).map(|v| format!("{}={}", name, v)))
            .collect();
        if !shape.is_empty() {
            label.push_str(&format!(" ({})", shape.join(", ")));
        }
    }
    label
}
