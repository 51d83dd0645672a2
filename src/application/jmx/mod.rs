//! JMX rendering: serializes a validated plan into JMeter's native XML format.
//!
//! Layout follows what JMeter itself saves: every test element is followed by
//! a sibling `<hashTree>` holding its children (`<hashTree/>` for leaves).
//! Properties are written in a fixed order per kind, so the output depends
//! only on the tree, not on option insertion order.

mod xml;

use xml::XmlWriter;

use crate::domain::{
    ConfigKind, ElementKind, InMemoryPlan, OptionValue, Options, SamplerKind, TestPlanNode,
};

pub const DEFAULT_JMETER_VERSION: &str = "5.6.3";
pub const DEFAULT_PROPERTIES_VERSION: &str = "5.0";
pub const DEFAULT_INDENT: usize = 2;

/// Header values and layout of the emitted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub jmeter_version: String,
    pub properties_version: String,
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            jmeter_version: DEFAULT_JMETER_VERSION.to_string(),
            properties_version: DEFAULT_PROPERTIES_VERSION.to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

/// Render `plan` as a complete JMX document.
pub fn render(plan: &InMemoryPlan, options: &RenderOptions) -> String {
    let mut w = XmlWriter::new(options.indent);
    w.declaration();
    w.open(
        "jmeterTestPlan",
        &[
            ("version", "1.2"),
            ("properties", options.properties_version.as_str()),
            ("jmeter", options.jmeter_version.as_str()),
        ],
    );
    w.open("hashTree", &[]);
    write_node(&mut w, plan.root());
    w.close("hashTree");
    w.close("jmeterTestPlan");
    w.finish()
}

fn write_node(w: &mut XmlWriter, node: &TestPlanNode) {
    let (tag, guiclass) = element_classes(node.kind());
    let opts = node.options();
    let enabled = flag(opts, "enabled");
    w.open(
        tag,
        &[
            ("guiclass", guiclass),
            ("testclass", tag),
            ("testname", node.name()),
            ("enabled", bool_str(enabled)),
        ],
    );
    write_properties(w, node.kind(), opts);
    w.close(tag);

    if node.children().is_empty() {
        w.empty("hashTree", &[]);
    } else {
        w.open("hashTree", &[]);
        for child in node.children() {
            write_node(w, child);
        }
        w.close("hashTree");
    }
}

/// Element tag (also the test class) and GUI class per kind.
fn element_classes(kind: ElementKind) -> (&'static str, &'static str) {
    match kind {
        ElementKind::TestPlan => ("TestPlan", "TestPlanGui"),
        ElementKind::ThreadGroup => ("ThreadGroup", "ThreadGroupGui"),
        ElementKind::Sampler(SamplerKind::BeanShell) => {
            ("BeanShellSampler", "BeanShellSamplerGui")
        }
        ElementKind::Sampler(SamplerKind::Jsr223) => ("JSR223Sampler", "TestBeanGUI"),
        ElementKind::Sampler(SamplerKind::Http) => ("HTTPSamplerProxy", "HttpTestSampleGui"),
        ElementKind::Sampler(SamplerKind::Debug) => ("DebugSampler", "TestBeanGUI"),
        ElementKind::ConfigElement(ConfigKind::CsvDataSet) => ("CSVDataSet", "TestBeanGUI"),
        ElementKind::ConfigElement(ConfigKind::HttpDefaults) => {
            ("ConfigTestElement", "HttpDefaultsGui")
        }
        ElementKind::ConfigElement(ConfigKind::CookieManager) => ("CookieManager", "CookiePanel"),
        ElementKind::ConfigElement(ConfigKind::Counter) => ("CounterConfig", "CounterConfigGui"),
    }
}

fn write_properties(w: &mut XmlWriter, kind: ElementKind, opts: &Options) {
    if kind != ElementKind::TestPlan {
        let comments = prop(opts, "comments");
        if !comments.is_empty() {
            string_prop(w, "TestElement.comments", &comments);
        }
    }

    match kind {
        ElementKind::TestPlan => {
            string_prop(w, "TestPlan.comments", &prop(opts, "comments"));
            bool_prop(w, "TestPlan.functional_mode", flag(opts, "functional_mode"));
            bool_prop(w, "TestPlan.tearDown_on_shutdown", flag(opts, "tear_down_on_shutdown"));
            bool_prop(w, "TestPlan.serialize_threadgroups", flag(opts, "serialize_thread_groups"));
            empty_arguments(w, "TestPlan.user_defined_variables", "ArgumentsPanel");
            string_prop(w, "TestPlan.user_define_classpath", "");
        }
        ElementKind::ThreadGroup => {
            string_prop(
                w,
                "ThreadGroup.on_sample_error",
                sample_error_action(&prop(opts, "on_sample_error")),
            );
            w.open(
                "elementProp",
                &[
                    ("name", "ThreadGroup.main_controller"),
                    ("elementType", "LoopController"),
                    ("guiclass", "LoopControlPanel"),
                    ("testclass", "LoopController"),
                    ("testname", "Loop Controller"),
                    ("enabled", "true"),
                ],
            );
            bool_prop(w, "LoopController.continue_forever", flag(opts, "continue_forever"));
            string_prop(w, "LoopController.loops", &prop(opts, "loops"));
            w.close("elementProp");
            string_prop(w, "ThreadGroup.num_threads", &prop(opts, "count"));
            string_prop(w, "ThreadGroup.ramp_time", &prop(opts, "rampup"));
            bool_prop(w, "ThreadGroup.scheduler", flag(opts, "scheduler"));
            string_prop(w, "ThreadGroup.duration", &prop(opts, "duration"));
            string_prop(w, "ThreadGroup.delay", &prop(opts, "delay"));
        }
        ElementKind::Sampler(SamplerKind::BeanShell) => {
            string_prop(w, "BeanShellSampler.query", &prop(opts, "query"));
            string_prop(w, "BeanShellSampler.filename", &prop(opts, "filename"));
            string_prop(w, "BeanShellSampler.parameters", &prop(opts, "parameters"));
            bool_prop(w, "BeanShellSampler.resetInterpreter", flag(opts, "reset_interpreter"));
        }
        ElementKind::Sampler(SamplerKind::Jsr223) => {
            string_prop(w, "scriptLanguage", &prop(opts, "language"));
            string_prop(w, "parameters", &prop(opts, "parameters"));
            string_prop(w, "filename", &prop(opts, "filename"));
            string_prop(w, "cacheKey", bool_str(flag(opts, "cache_compiled")));
            string_prop(w, "script", &prop(opts, "script"));
        }
        ElementKind::Sampler(SamplerKind::Http) => {
            empty_arguments(w, "HTTPsampler.Arguments", "HTTPArgumentsPanel");
            http_target(w, opts);
            string_prop(w, "HTTPSampler.method", &prop(opts, "method"));
            bool_prop(w, "HTTPSampler.follow_redirects", flag(opts, "follow_redirects"));
            bool_prop(w, "HTTPSampler.auto_redirects", false);
            bool_prop(w, "HTTPSampler.use_keepalive", flag(opts, "use_keepalive"));
        }
        ElementKind::Sampler(SamplerKind::Debug) => {
            bool_prop(w, "displayJMeterProperties", flag(opts, "jmeter_properties"));
            bool_prop(w, "displayJMeterVariables", flag(opts, "jmeter_variables"));
            bool_prop(w, "displaySystemProperties", flag(opts, "system_properties"));
        }
        ElementKind::ConfigElement(ConfigKind::CsvDataSet) => {
            string_prop(w, "delimiter", &prop(opts, "delimiter"));
            string_prop(w, "fileEncoding", "");
            string_prop(w, "filename", &prop(opts, "filename"));
            bool_prop(w, "ignoreFirstLine", flag(opts, "ignore_first_line"));
            bool_prop(w, "quotedData", flag(opts, "quoted_data"));
            bool_prop(w, "recycle", flag(opts, "recycle"));
            string_prop(w, "shareMode", &format!("shareMode.{}", prop(opts, "share_mode")));
            bool_prop(w, "stopThread", flag(opts, "stop_thread"));
            string_prop(w, "variableNames", &prop(opts, "variable_names"));
        }
        ElementKind::ConfigElement(ConfigKind::HttpDefaults) => {
            empty_arguments(w, "HTTPsampler.Arguments", "HTTPArgumentsPanel");
            http_target(w, opts);
        }
        ElementKind::ConfigElement(ConfigKind::CookieManager) => {
            w.empty("collectionProp", &[("name", "CookieManager.cookies")]);
            bool_prop(w, "CookieManager.clearEachIteration", flag(opts, "clear_each_iteration"));
        }
        ElementKind::ConfigElement(ConfigKind::Counter) => {
            string_prop(w, "CounterConfig.start", &prop(opts, "start"));
            string_prop(w, "CounterConfig.end", &prop(opts, "end"));
            string_prop(w, "CounterConfig.incr", &prop(opts, "increment"));
            string_prop(w, "CounterConfig.name", &prop(opts, "reference_name"));
            string_prop(w, "CounterConfig.format", &prop(opts, "format"));
            bool_prop(w, "CounterConfig.per_user", flag(opts, "per_user"));
        }
    }
}

fn http_target(w: &mut XmlWriter, opts: &Options) {
    string_prop(w, "HTTPSampler.domain", &prop(opts, "domain"));
    string_prop(w, "HTTPSampler.port", &prop(opts, "port"));
    string_prop(w, "HTTPSampler.protocol", &prop(opts, "protocol"));
    string_prop(w, "HTTPSampler.path", &prop(opts, "path"));
}

fn empty_arguments(w: &mut XmlWriter, name: &str, guiclass: &str) {
    w.open(
        "elementProp",
        &[
            ("name", name),
            ("elementType", "Arguments"),
            ("guiclass", guiclass),
            ("testclass", "Arguments"),
            ("testname", "User Defined Variables"),
            ("enabled", "true"),
        ],
    );
    w.empty("collectionProp", &[("name", "Arguments.arguments")]);
    w.close("elementProp");
}

fn string_prop(w: &mut XmlWriter, name: &str, value: &str) {
    w.text("stringProp", &[("name", name)], value);
}

fn bool_prop(w: &mut XmlWriter, name: &str, value: bool) {
    w.text("boolProp", &[("name", name)], bool_str(value));
}

/// Property text of an option; absent options render empty.
fn prop(opts: &Options, name: &str) -> String {
    opts.get(name).map(ToString::to_string).unwrap_or_default()
}

fn flag(opts: &Options, name: &str) -> bool {
    opts.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// JMeter's spelling of the thread group error actions.
fn sample_error_action(action: &str) -> &str {
    match action {
        "start_next_loop" => "startnextloop",
        "stop_thread" => "stopthread",
        "stop_test" => "stoptest",
        "stop_test_now" => "stoptestnow",
        other => other,
    }
}
