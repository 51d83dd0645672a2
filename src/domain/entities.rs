//! Domain entities: test-plan elements and their options

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Scalar option value attached to a test-plan element.
///
/// Deserialization is untagged: TOML booleans, integers and strings map to
/// the matching variant; anything else (floats, arrays, tables) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    /// Short type name used in error messages and schema listings.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Str(_) => "str",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(i64::from(v))
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(i64::from(v))
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// Option-name to value mapping.
///
/// Insertion order is kept for stable output; equality ignores it.
/// Re-setting a name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(IndexMap<String, OptionValue>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an option, returning the previous value if there was one.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (k, v) in iter {
            options.set(k, v);
        }
        options
    }
}

/// Sampler flavours the builder knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    BeanShell,
    Jsr223,
    Http,
    Debug,
}

/// Configuration elements the builder knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    CsvDataSet,
    HttpDefaults,
    CookieManager,
    Counter,
}

/// Kind tag of a test-plan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Root container of every plan.
    TestPlan,
    ThreadGroup,
    Sampler(SamplerKind),
    ConfigElement(ConfigKind),
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::TestPlan,
        ElementKind::ThreadGroup,
        ElementKind::Sampler(SamplerKind::BeanShell),
        ElementKind::Sampler(SamplerKind::Jsr223),
        ElementKind::Sampler(SamplerKind::Http),
        ElementKind::Sampler(SamplerKind::Debug),
        ElementKind::ConfigElement(ConfigKind::CsvDataSet),
        ElementKind::ConfigElement(ConfigKind::HttpDefaults),
        ElementKind::ConfigElement(ConfigKind::CookieManager),
        ElementKind::ConfigElement(ConfigKind::Counter),
    ];

    /// Stable snake_case identifier used by plan descriptions and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            ElementKind::TestPlan => "test_plan",
            ElementKind::ThreadGroup => "thread_group",
            ElementKind::Sampler(SamplerKind::BeanShell) => "beanshell_sampler",
            ElementKind::Sampler(SamplerKind::Jsr223) => "jsr223_sampler",
            ElementKind::Sampler(SamplerKind::Http) => "http_sampler",
            ElementKind::Sampler(SamplerKind::Debug) => "debug_sampler",
            ElementKind::ConfigElement(ConfigKind::CsvDataSet) => "csv_data_set",
            ElementKind::ConfigElement(ConfigKind::HttpDefaults) => "http_defaults",
            ElementKind::ConfigElement(ConfigKind::CookieManager) => "cookie_manager",
            ElementKind::ConfigElement(ConfigKind::Counter) => "counter",
        }
    }

    /// Default element name, matching what JMeter's GUI assigns.
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::TestPlan => "Test Plan",
            ElementKind::ThreadGroup => "Thread Group",
            ElementKind::Sampler(SamplerKind::BeanShell) => "BeanShell Sampler",
            ElementKind::Sampler(SamplerKind::Jsr223) => "JSR223 Sampler",
            ElementKind::Sampler(SamplerKind::Http) => "HTTP Request",
            ElementKind::Sampler(SamplerKind::Debug) => "Debug Sampler",
            ElementKind::ConfigElement(ConfigKind::CsvDataSet) => "CSV Data Set Config",
            ElementKind::ConfigElement(ConfigKind::HttpDefaults) => "HTTP Request Defaults",
            ElementKind::ConfigElement(ConfigKind::CookieManager) => "HTTP Cookie Manager",
            ElementKind::ConfigElement(ConfigKind::Counter) => "Counter",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ElementKind::TestPlan | ElementKind::ThreadGroup)
    }

    /// Nesting rule: may `child` appear directly below `self`?
    pub fn accepts_child(&self, child: ElementKind) -> bool {
        match self {
            ElementKind::TestPlan => matches!(
                child,
                ElementKind::ThreadGroup | ElementKind::ConfigElement(_)
            ),
            ElementKind::ThreadGroup => matches!(
                child,
                ElementKind::Sampler(_) | ElementKind::ConfigElement(_)
            ),
            ElementKind::Sampler(_) | ElementKind::ConfigElement(_) => false,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ElementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s.trim()).ok_or_else(|| DomainError::UnknownKind(s.to_string()))
    }
}

/// One element of a test plan.
///
/// Constructed bottom-up: container constructors take already-built
/// children. Nothing is validated here; see [`crate::domain::PlanBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlanNode {
    kind: ElementKind,
    options: Options,
    children: Vec<TestPlanNode>,
}

impl TestPlanNode {
    pub fn new(kind: ElementKind, options: Options, children: Vec<TestPlanNode>) -> Self {
        Self {
            kind,
            options,
            children,
        }
    }

    pub fn test_plan(children: impl IntoIterator<Item = TestPlanNode>) -> Self {
        Self::new(
            ElementKind::TestPlan,
            Options::new(),
            children.into_iter().collect(),
        )
    }

    pub fn thread_group(
        options: Options,
        children: impl IntoIterator<Item = TestPlanNode>,
    ) -> Self {
        Self::new(
            ElementKind::ThreadGroup,
            options,
            children.into_iter().collect(),
        )
    }

    pub fn sampler(kind: SamplerKind, options: Options) -> Self {
        Self::new(ElementKind::Sampler(kind), options, Vec::new())
    }

    pub fn config(kind: ConfigKind, options: Options) -> Self {
        Self::new(ElementKind::ConfigElement(kind), options, Vec::new())
    }

    /// Replace this node's options, keeping kind and children.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn children(&self) -> &[TestPlanNode] {
        &self.children
    }

    /// Element name: the `name` option, or the kind's display name.
    pub fn name(&self) -> &str {
        self.options
            .get("name")
            .and_then(OptionValue::as_str)
            .unwrap_or_else(|| self.kind.display_name())
    }

    /// Number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TestPlanNode::element_count)
            .sum::<usize>()
    }

    pub(crate) fn into_parts(self) -> (ElementKind, Options, Vec<TestPlanNode>) {
        (self.kind, self.options, self.children)
    }
}
