//! Integration tests for PlanService: build, write and load

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use jmxplan::application::jmx::RenderOptions;
use jmxplan::application::services::PlanService;
use jmxplan::application::ApplicationError;
use jmxplan::domain::{InMemoryPlan, Options, SamplerKind, TestPlanNode};
use jmxplan::infrastructure::traits::{FileSystem, RealFileSystem};
use jmxplan::util::testing;

/// Filesystem whose writes always fail; reads go to disk.
struct ReadOnlyFileSystem;

impl FileSystem for ReadOnlyFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
    fn write_atomic(&self, _path: &Path, _content: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

fn service() -> PlanService {
    PlanService::new(Arc::new(RealFileSystem), RenderOptions::default())
}

fn hello_tree() -> TestPlanNode {
    TestPlanNode::test_plan([TestPlanNode::thread_group(
        Options::new()
            .with("count", 1)
            .with("rampup", 0)
            .with("loops", 1)
            .with("scheduler", false),
        [TestPlanNode::sampler(
            SamplerKind::BeanShell,
            Options::new().with("query", r#"log.info("Hello");"#),
        )],
    )])
}

#[fixture]
fn hello() -> InMemoryPlan {
    testing::init_test_setup();
    service().build(hello_tree()).unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

#[rstest]
fn given_hello_plan_when_writing_then_file_holds_rendered_document(hello: InMemoryPlan) {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hello.jmx");
    let svc = service();

    svc.write(&hello, &target).unwrap();

    let content = std::fs::read_to_string(&target).unwrap();
    assert_eq!(content, svc.render(&hello));
    assert_eq!(content.matches("<BeanShellSampler ").count(), 1);
    assert!(content.contains("log.info(&quot;Hello&quot;);"));
}

#[rstest]
fn given_missing_parent_directories_when_writing_then_created(hello: InMemoryPlan) {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("plans/smoke/hello.jmx");

    service().write(&hello, &target).unwrap();

    assert!(target.is_file());
}

#[rstest]
fn given_written_plan_when_writing_again_then_bytes_identical(hello: InMemoryPlan) {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("a.jmx");
    let second = temp.path().join("b.jmx");

    service().write(&hello, &first).unwrap();
    service().write(&hello, &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[rstest]
fn given_parent_is_regular_file_when_writing_then_io_failure_and_no_file(hello: InMemoryPlan) {
    let temp = TempDir::new().unwrap();
    let blocker = write_file(&temp, "blocker", "not a directory");
    let target = blocker.join("hello.jmx");

    let err = service().write(&hello, &target).unwrap_err();

    assert!(err.is_io_failure(), "expected IoFailure, got {:?}", err);
    assert!(!target.exists());
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "not a directory");
}

#[rstest]
fn given_failing_filesystem_when_writing_then_existing_file_untouched(hello: InMemoryPlan) {
    let temp = TempDir::new().unwrap();
    let target = write_file(&temp, "hello.jmx", "previous");
    let svc = PlanService::new(Arc::new(ReadOnlyFileSystem), RenderOptions::default());

    let err = svc.write(&hello, &target).unwrap_err();

    match err {
        ApplicationError::IoFailure { context, source } => {
            assert!(context.contains("hello.jmx"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected IoFailure, got {:?}", other),
    }
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "previous");
}

#[rstest]
fn given_empty_plan_when_building_then_invalid_structure_and_nothing_written() {
    let temp = TempDir::new().unwrap();

    let err = service().build(TestPlanNode::test_plan([])).unwrap_err();

    assert!(err.is_invalid_structure());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[rstest]
fn given_description_file_when_build_file_then_jmx_written() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let input = write_file(
        &temp,
        "hello.toml",
        r#"
[plan]
name = "Hello plan"

[[elements]]
kind = "thread_group"
options = { count = 1, rampup = 0, loops = 1, scheduler = false }

[[elements.children]]
kind = "beanshell_sampler"
options = { query = 'log.info("Hello");' }
"#,
    );
    let output = temp.path().join("out/hello.jmx");

    let plan = service().build_file(&input, &output).unwrap();

    assert_eq!(plan.root().name(), "Hello plan");
    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains(r#"testname="Hello plan""#));
    assert!(content.contains("log.info(&quot;Hello&quot;);"));
}

#[rstest]
fn given_invalid_description_when_build_file_then_no_output_written() {
    let temp = TempDir::new().unwrap();
    let input = write_file(&temp, "empty.toml", "[plan]\nname = \"nothing\"\n");
    let output = temp.path().join("empty.jmx");

    let err = service().build_file(&input, &output).unwrap_err();

    assert!(err.is_invalid_structure());
    assert!(!output.exists());
}

#[rstest]
fn given_missing_description_when_loading_then_input_failure() {
    let temp = TempDir::new().unwrap();

    let err = service().load(&temp.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ApplicationError::InputFailure { .. }));
}

#[rstest]
fn given_library_entry_points_when_building_and_writing_then_file_written() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("lib.jmx");

    let plan = jmxplan::build(hello_tree()).unwrap();
    jmxplan::write(&plan, &target).unwrap();

    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
}
