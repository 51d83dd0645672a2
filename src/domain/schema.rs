//! Option schema per element kind.
//!
//! Each kind accepts the common options (`name`, `comments`, `enabled`) plus
//! its own fixed set. Unknown names, wrong types and out-of-range values are
//! structural errors.

use std::fmt;

use crate::domain::entities::{ConfigKind, ElementKind, OptionValue, SamplerKind};
use crate::domain::error::DomainError;

use DefaultValue as D;
use OptionType::{Bool, Int, Str};

/// Value type accepted by an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Int,
    Bool,
    Str,
}

impl OptionType {
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Int => "int",
            OptionType::Bool => "bool",
            OptionType::Str => "str",
        }
    }

    pub fn matches(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (OptionType::Int, OptionValue::Int(_))
                | (OptionType::Bool, OptionValue::Bool(_))
                | (OptionType::Str, OptionValue::Str(_))
        )
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value filled in when an option is not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Stays absent; rendered as an empty property.
    None,
    /// The kind's display name (used by `name`).
    DisplayName,
    Int(i64),
    Bool(bool),
    Str(&'static str),
}

impl DefaultValue {
    pub fn resolve(&self, kind: ElementKind) -> Option<OptionValue> {
        match self {
            DefaultValue::None => None,
            DefaultValue::DisplayName => Some(OptionValue::from(kind.display_name())),
            DefaultValue::Int(v) => Some(OptionValue::Int(*v)),
            DefaultValue::Bool(v) => Some(OptionValue::Bool(*v)),
            DefaultValue::Str(v) => Some(OptionValue::from(*v)),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => f.write_str("-"),
            DefaultValue::DisplayName => f.write_str("<display name>"),
            DefaultValue::Int(v) => write!(f, "{}", v),
            DefaultValue::Bool(v) => write!(f, "{}", v),
            DefaultValue::Str(v) => write!(f, "\"{}\"", v),
        }
    }
}

/// Additional value constraint beyond the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Any,
    Min(i64),
    Range(i64, i64),
    /// Loop count: positive, or -1 for "forever".
    Loops,
    NonEmpty,
    OneOf(&'static [&'static str]),
}

impl Rule {
    fn check(&self, value: &OptionValue) -> Result<(), String> {
        match (self, value) {
            (Rule::Any, _) => Ok(()),
            (Rule::Min(min), OptionValue::Int(v)) if v < min => {
                Err(format!("{} is below the minimum of {}", v, min))
            }
            (Rule::Range(lo, hi), OptionValue::Int(v)) if v < lo || v > hi => {
                Err(format!("{} is outside {}..={}", v, lo, hi))
            }
            (Rule::Loops, OptionValue::Int(v)) if *v != -1 && *v < 1 => Err(format!(
                "{} is not a loop count (use a positive number or -1 for forever)",
                v
            )),
            (Rule::NonEmpty, OptionValue::Str(s)) if s.trim().is_empty() => {
                Err("must not be empty".to_string())
            }
            (Rule::OneOf(allowed), OptionValue::Str(s)) if !allowed.contains(&s.as_str()) => {
                Err(format!("'{}' is not one of: {}", s, allowed.join(", ")))
            }
            _ => Ok(()),
        }
    }
}

/// Declared option of an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub ty: OptionType,
    pub required: bool,
    pub default: DefaultValue,
    pub rule: Rule,
    pub help: &'static str,
}

impl OptionSpec {
    const fn required(name: &'static str, ty: OptionType, help: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            default: DefaultValue::None,
            rule: Rule::Any,
            help,
        }
    }

    const fn optional(
        name: &'static str,
        ty: OptionType,
        default: DefaultValue,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            required: false,
            default,
            rule: Rule::Any,
            help,
        }
    }

    const fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    /// Type and rule check for a single value.
    pub fn check(&self, path: &str, value: &OptionValue) -> Result<(), DomainError> {
        if !self.ty.matches(value) {
            return Err(DomainError::OptionType {
                path: path.to_string(),
                option: self.name.to_string(),
                expected: self.ty.name(),
                actual: value.type_name(),
            });
        }
        check_xml_chars(value)
            .and_then(|()| self.rule.check(value))
            .map_err(|reason| DomainError::InvalidOptionValue {
                path: path.to_string(),
                option: self.name.to_string(),
                reason,
            })
    }
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Plans are XML documents; some characters cannot appear there even escaped.
fn check_xml_chars(value: &OptionValue) -> Result<(), String> {
    match value.as_str().and_then(|s| s.chars().find(|c| !is_xml_char(*c))) {
        Some(c) => Err(format!(
            "contains U+{:04X}, which XML 1.0 does not allow",
            u32::from(c)
        )),
        None => Ok(()),
    }
}

pub const SAMPLE_ERROR_ACTIONS: &[&str] = &[
    "continue",
    "start_next_loop",
    "stop_thread",
    "stop_test",
    "stop_test_now",
];
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];
pub const HTTP_PROTOCOLS: &[&str] = &["http", "https"];
pub const SHARE_MODES: &[&str] = &["all", "group", "thread"];

static COMMON: &[OptionSpec] = &[
    OptionSpec::optional("name", Str, D::DisplayName, "element name shown by JMeter"),
    OptionSpec::optional("comments", Str, D::Str(""), "free-text comment"),
    OptionSpec::optional(
        "enabled",
        Bool,
        D::Bool(true),
        "disabled elements are skipped by the engine",
    ),
];

static TEST_PLAN: &[OptionSpec] = &[
    OptionSpec::optional(
        "functional_mode",
        Bool,
        D::Bool(false),
        "save response data of every sample",
    ),
    OptionSpec::optional(
        "serialize_thread_groups",
        Bool,
        D::Bool(false),
        "run thread groups one after another",
    ),
    OptionSpec::optional(
        "tear_down_on_shutdown",
        Bool,
        D::Bool(true),
        "run tearDown groups after shutdown",
    ),
];

static THREAD_GROUP: &[OptionSpec] = &[
    OptionSpec::required("count", Int, "number of virtual users").rule(Rule::Min(1)),
    OptionSpec::required("rampup", Int, "seconds to start all users").rule(Rule::Min(0)),
    OptionSpec::required("loops", Int, "iterations per user, -1 for forever").rule(Rule::Loops),
    OptionSpec::optional("scheduler", Bool, D::Bool(false), "honour duration and delay"),
    OptionSpec::optional("duration", Int, D::None, "run time in seconds").rule(Rule::Min(0)),
    OptionSpec::optional("delay", Int, D::None, "startup delay in seconds").rule(Rule::Min(0)),
    OptionSpec::optional(
        "continue_forever",
        Bool,
        D::Bool(false),
        "loop controller continues forever",
    ),
    OptionSpec::optional("on_sample_error", Str, D::Str("continue"), "action after a failed sample")
        .rule(Rule::OneOf(SAMPLE_ERROR_ACTIONS)),
];

static BEANSHELL_SAMPLER: &[OptionSpec] = &[
    OptionSpec::required("query", Str, "BeanShell script to run"),
    OptionSpec::optional("parameters", Str, D::Str(""), "script parameters"),
    OptionSpec::optional("filename", Str, D::Str(""), "script file, used instead of query"),
    OptionSpec::optional("reset_interpreter", Bool, D::Bool(false), "fresh interpreter per call"),
];

static JSR223_SAMPLER: &[OptionSpec] = &[
    OptionSpec::required("script", Str, "script source"),
    OptionSpec::optional("language", Str, D::Str("groovy"), "script language"),
    OptionSpec::optional("parameters", Str, D::Str(""), "script parameters"),
    OptionSpec::optional("filename", Str, D::Str(""), "script file, used instead of script"),
    OptionSpec::optional("cache_compiled", Bool, D::Bool(true), "cache the compiled script"),
];

static HTTP_SAMPLER: &[OptionSpec] = &[
    OptionSpec::required("domain", Str, "server name or IP").rule(Rule::NonEmpty),
    OptionSpec::optional("path", Str, D::Str("/"), "request path"),
    OptionSpec::optional("method", Str, D::Str("GET"), "HTTP method")
        .rule(Rule::OneOf(HTTP_METHODS)),
    OptionSpec::optional("protocol", Str, D::Str("http"), "http or https")
        .rule(Rule::OneOf(HTTP_PROTOCOLS)),
    OptionSpec::optional("port", Int, D::None, "server port").rule(Rule::Range(1, 65535)),
    OptionSpec::optional("follow_redirects", Bool, D::Bool(true), "follow redirects"),
    OptionSpec::optional("use_keepalive", Bool, D::Bool(true), "use HTTP keep-alive"),
];

static DEBUG_SAMPLER: &[OptionSpec] = &[
    OptionSpec::optional("jmeter_properties", Bool, D::Bool(false), "dump JMeter properties"),
    OptionSpec::optional("jmeter_variables", Bool, D::Bool(true), "dump JMeter variables"),
    OptionSpec::optional("system_properties", Bool, D::Bool(false), "dump system properties"),
];

static CSV_DATA_SET: &[OptionSpec] = &[
    OptionSpec::required("filename", Str, "CSV file to read").rule(Rule::NonEmpty),
    OptionSpec::optional("variable_names", Str, D::Str(""), "comma separated variable names"),
    OptionSpec::optional("delimiter", Str, D::Str(","), "field delimiter"),
    OptionSpec::optional("ignore_first_line", Bool, D::Bool(false), "skip a header line"),
    OptionSpec::optional("quoted_data", Bool, D::Bool(false), "allow quoted fields"),
    OptionSpec::optional("recycle", Bool, D::Bool(true), "restart at end of file"),
    OptionSpec::optional("stop_thread", Bool, D::Bool(false), "stop the thread at end of file"),
    OptionSpec::optional("share_mode", Str, D::Str("all"), "all, group or thread")
        .rule(Rule::OneOf(SHARE_MODES)),
];

static HTTP_DEFAULTS: &[OptionSpec] = &[
    OptionSpec::optional("domain", Str, D::None, "default server name or IP"),
    OptionSpec::optional("path", Str, D::None, "default request path"),
    OptionSpec::optional("protocol", Str, D::None, "default protocol")
        .rule(Rule::OneOf(HTTP_PROTOCOLS)),
    OptionSpec::optional("port", Int, D::None, "default server port").rule(Rule::Range(1, 65535)),
];

static COOKIE_MANAGER: &[OptionSpec] = &[OptionSpec::optional(
    "clear_each_iteration",
    Bool,
    D::Bool(false),
    "drop cookies at the start of each iteration",
)];

static COUNTER: &[OptionSpec] = &[
    OptionSpec::required("reference_name", Str, "variable receiving the value")
        .rule(Rule::NonEmpty),
    OptionSpec::optional("start", Int, D::Int(1), "first value"),
    OptionSpec::optional("increment", Int, D::Int(1), "step"),
    OptionSpec::optional("end", Int, D::None, "maximum value, wraps to start"),
    OptionSpec::optional("format", Str, D::Str(""), "DecimalFormat pattern"),
    OptionSpec::optional("per_user", Bool, D::Bool(false), "track the counter per user"),
];

/// Kind-specific options (without the common ones).
pub fn kind_specs(kind: ElementKind) -> &'static [OptionSpec] {
    match kind {
        ElementKind::TestPlan => TEST_PLAN,
        ElementKind::ThreadGroup => THREAD_GROUP,
        ElementKind::Sampler(SamplerKind::BeanShell) => BEANSHELL_SAMPLER,
        ElementKind::Sampler(SamplerKind::Jsr223) => JSR223_SAMPLER,
        ElementKind::Sampler(SamplerKind::Http) => HTTP_SAMPLER,
        ElementKind::Sampler(SamplerKind::Debug) => DEBUG_SAMPLER,
        ElementKind::ConfigElement(ConfigKind::CsvDataSet) => CSV_DATA_SET,
        ElementKind::ConfigElement(ConfigKind::HttpDefaults) => HTTP_DEFAULTS,
        ElementKind::ConfigElement(ConfigKind::CookieManager) => COOKIE_MANAGER,
        ElementKind::ConfigElement(ConfigKind::Counter) => COUNTER,
    }
}

/// All options accepted by `kind`, common ones first.
pub fn specs(kind: ElementKind) -> impl Iterator<Item = &'static OptionSpec> {
    COMMON.iter().chain(kind_specs(kind).iter())
}

pub fn lookup(kind: ElementKind, name: &str) -> Option<&'static OptionSpec> {
    specs(kind).find(|spec| spec.name == name)
}
