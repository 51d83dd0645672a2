//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::ElementKind;

/// Structural violations of a test-plan tree.
///
/// Every variant is raised before any I/O happens; the caller can fix the
/// tree and retry. `path` locates the offending element, e.g.
/// `test_plan/thread_group[0]/beanshell_sampler[1]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("plan has no thread group")]
    EmptyPlan,

    #[error("{kind} cannot be the root of a plan")]
    InvalidRoot { kind: ElementKind },

    #[error("{path}: {kind} is a leaf element and cannot contain children")]
    LeafWithChildren { path: String, kind: ElementKind },

    #[error("{path}: {child} is not allowed inside {parent}")]
    MisplacedElement {
        path: String,
        parent: ElementKind,
        child: ElementKind,
    },

    #[error("{path}: missing required option '{option}'")]
    MissingOption { path: String, option: String },

    #[error("{path}: unknown option '{option}' for {kind}")]
    UnknownOption {
        path: String,
        kind: ElementKind,
        option: String,
    },

    #[error("{path}: option '{option}' expects {expected}, got {actual}")]
    OptionType {
        path: String,
        option: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{path}: invalid value for '{option}': {reason}")]
    InvalidOptionValue {
        path: String,
        option: String,
        reason: String,
    },

    #[error("unknown element kind: {0}")]
    UnknownKind(String),

    #[error("invalid plan description: {0}")]
    Description(String),
}
