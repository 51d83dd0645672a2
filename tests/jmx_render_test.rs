//! Integration tests for JMX rendering

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use jmxplan::application::jmx::{render, RenderOptions};
use jmxplan::domain::{
    build, ConfigKind, DomainError, InMemoryPlan, Options, SamplerKind, TestPlanNode,
};
use jmxplan::util::testing;

#[fixture]
fn hello() -> InMemoryPlan {
    testing::init_test_setup();
    build(TestPlanNode::thread_group(
        Options::new()
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1)
            .with("scheduler", false),
        [TestPlanNode::sampler(
            SamplerKind::BeanShell,
            Options::new().with("query", r#"log.info("Hello");"#),
        )],
    ))
    .unwrap()
}

/// Element tags in document order, with `/` marking closing tags.
fn tag_stream(xml: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find('<') {
        let end = rest[start..].find('>').unwrap() + start;
        let inner = &rest[start + 1..end];
        rest = &rest[end + 1..];
        if inner.starts_with('?') {
            continue;
        }
        let self_closing = inner.ends_with('/');
        let name: String = inner
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap()
            .to_string();
        tags.push(name.clone());
        if self_closing {
            tags.push(format!("/{}", name));
        }
    }
    tags
}

/// Text of the `stringProp` named `name`, as an XML parser reads it.
fn string_prop(doc: &roxmltree::Document, name: &str) -> String {
    doc.descendants()
        .find(|n| n.has_tag_name("stringProp") && n.attribute("name") == Some(name))
        .and_then(|n| n.text())
        .unwrap_or_default()
        .to_string()
}

fn is_balanced(xml: &str) -> bool {
    let mut stack: Vec<String> = Vec::new();
    for tag in tag_stream(xml) {
        match tag.strip_prefix('/') {
            Some(name) => {
                if stack.pop().as_deref() != Some(name) {
                    return false;
                }
            }
            None => stack.push(tag),
        }
    }
    stack.is_empty()
}

#[rstest]
fn given_hello_plan_when_rendering_then_document_is_well_formed(hello: InMemoryPlan) {
    let xml = render(&hello, &RenderOptions::default());

    assert!(is_balanced(&xml), "unbalanced document:\n{}", xml);
    let doc = roxmltree::Document::parse(&xml).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "jmeterTestPlan");
    assert_eq!(xml.matches("<BeanShellSampler ").count(), 1);
    assert!(xml.contains(
        r#"<stringProp name="BeanShellSampler.query">log.info(&quot;Hello&quot;);</stringProp>"#
    ));
}

#[rstest]
fn given_hello_plan_when_rendering_then_every_element_has_a_sibling_hash_tree(
    hello: InMemoryPlan,
) {
    let xml = render(&hello, &RenderOptions::default());
    let tags = tag_stream(&xml);

    for element in ["/TestPlan", "/ThreadGroup", "/BeanShellSampler"] {
        let pos = tags.iter().position(|t| t == element).unwrap();
        assert_eq!(tags[pos + 1], "hashTree", "after {}", element);
    }
}

#[rstest]
fn given_same_plan_when_rendering_twice_then_byte_identical(hello: InMemoryPlan) {
    let options = RenderOptions::default();
    assert_eq!(render(&hello, &options), render(&hello, &options));
}

#[rstest]
fn given_options_in_different_order_when_rendering_then_identical_output() {
    let a = build(TestPlanNode::thread_group(
        Options::new()
            .with("count", 3)
            .with("rampup", 1)
            .with("loops", 2),
        [],
    ))
    .unwrap();
    let b = build(TestPlanNode::thread_group(
        Options::new()
            .with("loops", 2)
            .with("count", 3)
            .with("rampup", 1),
        [],
    ))
    .unwrap();

    let options = RenderOptions::default();
    assert_eq!(render(&a, &options), render(&b, &options));
}

#[rstest]
fn given_hello_plan_when_rendering_then_thread_group_properties_match(hello: InMemoryPlan) {
    let xml = render(&hello, &RenderOptions::default());

    let expected = r#"      <ThreadGroup guiclass="ThreadGroupGui" testclass="ThreadGroup" testname="Thread Group" enabled="true">
        <stringProp name="ThreadGroup.on_sample_error">continue</stringProp>
        <elementProp name="ThreadGroup.main_controller" elementType="LoopController" guiclass="LoopControlPanel" testclass="LoopController" testname="Loop Controller" enabled="true">
          <boolProp name="LoopController.continue_forever">false</boolProp>
          <stringProp name="LoopController.loops">1</stringProp>
        </elementProp>
        <stringProp name="ThreadGroup.num_threads">1</stringProp>
        <stringProp name="ThreadGroup.ramp_time">0</stringProp>
        <boolProp name="ThreadGroup.scheduler">false</boolProp>
        <stringProp name="ThreadGroup.duration"></stringProp>
        <stringProp name="ThreadGroup.delay"></stringProp>
      </ThreadGroup>
"#;
    assert!(xml.contains(expected), "got:\n{}", xml);
}

#[rstest]
fn given_special_characters_when_rendering_then_escaped_in_text_and_attributes() {
    let plan = build(TestPlanNode::thread_group(
        Options::new()
            .with("name", "Users <A&B>")
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1),
        [TestPlanNode::sampler(
            SamplerKind::Jsr223,
            Options::new().with("script", "if (a < b && c > 'd') {}"),
        )],
    ))
    .unwrap();

    let xml = render(&plan, &RenderOptions::default());

    assert!(xml.contains(r#"testname="Users &lt;A&amp;B&gt;""#));
    assert!(xml.contains(
        r#"<stringProp name="script">if (a &lt; b &amp;&amp; c &gt; &apos;d&apos;) {}</stringProp>"#
    ));
    assert!(is_balanced(&xml));
}

#[rstest]
fn given_disabled_element_when_rendering_then_enabled_attribute_false() {
    let plan = build(TestPlanNode::thread_group(
        Options::new()
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1),
        [TestPlanNode::sampler(
            SamplerKind::Debug,
            Options::new().with("enabled", false),
        )],
    ))
    .unwrap();

    let xml = render(&plan, &RenderOptions::default());

    assert!(xml.contains(
        r#"<DebugSampler guiclass="TestBeanGUI" testclass="DebugSampler" testname="Debug Sampler" enabled="false">"#
    ));
}

#[rstest]
fn given_config_elements_when_rendering_then_jmeter_property_names_used() {
    let plan = build(TestPlanNode::test_plan([TestPlanNode::thread_group(
        Options::new()
            .with("count", 2)
            .with("rampup", 1)
            .with("loops", -1),
        [
            TestPlanNode::config(
                ConfigKind::CsvDataSet,
                Options::new()
                    .with("filename", "users.csv")
                    .with("variable_names", "user,pass")
                    .with("share_mode", "group"),
            ),
            TestPlanNode::config(
                ConfigKind::Counter,
                Options::new().with("reference_name", "n").with("end", 5),
            ),
        ],
    )]))
    .unwrap();

    let xml = render(&plan, &RenderOptions::default());

    assert!(xml.contains(r#"<stringProp name="LoopController.loops">-1</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="filename">users.csv</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="shareMode">shareMode.group</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="CounterConfig.end">5</stringProp>"#));
    assert!(xml.contains(r#"<stringProp name="CounterConfig.name">n</stringProp>"#));
    assert!(is_balanced(&xml));
}

#[rstest]
fn given_custom_versions_when_rendering_then_header_uses_them(hello: InMemoryPlan) {
    let options = RenderOptions {
        jmeter_version: "5.4.1".to_string(),
        properties_version: "5.0".to_string(),
        indent: 2,
    };

    let xml = render(&hello, &options);

    assert!(xml.contains(r#"<jmeterTestPlan version="1.2" properties="5.0" jmeter="5.4.1">"#));
}

#[rstest]
#[case::crlf_script("log.info(\"a\r\nb\");\r\nlog.info(\"c\");")]
#[case::tabs_and_lone_cr("\tvars.put(\"k\", \"v\");\rreturn;")]
#[case::non_ascii("log.info(\"Grüße, 東京 ✓ 😀\");")]
#[case::markup("if (a < b && c > 'd') { log.info(\"]]>\"); }")]
fn given_script_text_when_rendering_and_parsing_then_text_is_unchanged(#[case] query: &str) {
    let plan = build(TestPlanNode::thread_group(
        Options::new()
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1),
        [TestPlanNode::sampler(
            SamplerKind::BeanShell,
            Options::new().with("query", query),
        )],
    ))
    .unwrap();

    let xml = render(&plan, &RenderOptions::default());
    let doc = roxmltree::Document::parse(&xml).unwrap();

    assert_eq!(string_prop(&doc, "BeanShellSampler.query"), query);
}

#[rstest]
fn given_name_with_line_break_and_tab_when_rendering_and_parsing_then_testname_is_unchanged() {
    let name = "Users\r\nstep\t1";
    let plan = build(TestPlanNode::thread_group(
        Options::new()
            .with("name", name)
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1),
        [],
    ))
    .unwrap();

    let xml = render(&plan, &RenderOptions::default());
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let group = doc
        .descendants()
        .find(|n| n.has_tag_name("ThreadGroup"))
        .unwrap();
    assert_eq!(group.attribute("testname"), Some(name));
}

#[rstest]
#[case::nul("a\u{0}b")]
#[case::start_of_heading("log.info(\"a\u{1}b\");")]
#[case::escape("\u{1b}[31m")]
#[case::noncharacter("a\u{FFFE}")]
fn given_character_xml_forbids_when_building_then_rejected_before_rendering(
    #[case] query: &str,
) {
    let result = build(TestPlanNode::thread_group(
        Options::new()
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1),
        [TestPlanNode::sampler(
            SamplerKind::BeanShell,
            Options::new().with("query", query),
        )],
    ));

    assert!(matches!(
        result,
        Err(DomainError::InvalidOptionValue { ref path, ref option, .. })
            if path == "test_plan/thread_group[0]/beanshell_sampler[0]" && option == "query"
    ));
}
