//! Integration tests for TOML plan descriptions

use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;

use jmxplan::application::{describe, load, PlanDescription};
use jmxplan::domain::{build, DomainError, ElementKind, OptionValue};
use jmxplan::util::testing;

fn resource(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/plans")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[rstest]
fn given_shop_description_when_loading_then_order_and_kinds_are_kept() {
    testing::init_test_setup();

    let root = load(&resource("shop.toml")).unwrap();

    let kinds: Vec<_> = root.children().iter().map(|c| c.kind().id()).collect();
    assert_eq!(kinds, vec!["http_defaults", "thread_group", "thread_group"]);
    let browsers = &root.children()[1];
    let names: Vec<_> = browsers.children().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec!["HTTP Cookie Manager", "CSV Data Set Config", "home", "login"]
    );
    assert_eq!(browsers.option("loops"), Some(&OptionValue::Int(-1)));
}

#[rstest]
fn given_shop_description_when_building_then_valid() {
    let plan = build(load(&resource("shop.toml")).unwrap()).unwrap();

    assert_eq!(plan.thread_group_count(), 2);
    assert_eq!(plan.element_count(), 11);
    assert_eq!(
        plan.root().option("serialize_thread_groups"),
        Some(&OptionValue::Bool(true))
    );
}

#[rstest]
fn given_nested_thread_groups_when_building_then_misplaced_element() {
    let err = build(load(&resource("nested_groups.toml")).unwrap()).unwrap_err();

    assert!(matches!(
        err,
        DomainError::MisplacedElement {
            parent: ElementKind::ThreadGroup,
            child: ElementKind::ThreadGroup,
            ..
        }
    ));
}

#[rstest]
#[case::hello("hello.toml")]
#[case::shop("shop.toml")]
fn given_loaded_tree_when_describing_and_loading_again_then_same_tree(#[case] name: &str) {
    let original = load(&resource(name)).unwrap();

    let text = describe(&original).unwrap();
    let reloaded = load(&text).unwrap();

    assert_eq!(reloaded, original);
}

#[rstest]
fn given_built_plan_when_described_then_defaults_are_spelled_out() {
    let plan = build(load(&resource("hello.toml")).unwrap()).unwrap();

    let text = describe(plan.root()).unwrap();

    assert!(text.contains("tear_down_on_shutdown = true"), "{}", text);
    assert_eq!(build(load(&text).unwrap()).unwrap(), plan);
}

#[rstest]
#[case::float("[[elements]]\nkind = \"thread_group\"\noptions = { count = 1.5 }\n")]
#[case::array("[[elements]]\nkind = \"thread_group\"\noptions = { count = [1] }\n")]
#[case::unknown_key("[[elements]]\nkind = \"thread_group\"\nthreads = 3\n")]
#[case::missing_kind("[[elements]]\noptions = { count = 1 }\n")]
#[case::not_toml("[[elements]\n")]
fn given_malformed_description_when_parsing_then_description_error(#[case] content: &str) {
    let err = PlanDescription::parse(content).unwrap_err();
    assert!(matches!(err, DomainError::Description(_)), "{:?}", err);
}
