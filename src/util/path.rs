use std::path::{Component, Path, PathBuf};

/// Does `path` contain a `..` component?
pub fn has_parent_traversal(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Output path for a plan description: same stem with a `.jmx` extension,
/// next to the input unless `output_dir` is given.
pub fn default_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let jmx = input.with_extension("jmx");
    match (output_dir, jmx.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => jmx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_plan_toml_when_default_output_then_jmx_next_to_it() {
        assert_eq!(
            default_output_path(Path::new("plans/hello.toml"), None),
            PathBuf::from("plans/hello.jmx")
        );
    }

    #[test]
    fn given_output_dir_when_default_output_then_placed_there() {
        assert_eq!(
            default_output_path(Path::new("plans/hello.toml"), Some(Path::new("/tmp/out"))),
            PathBuf::from("/tmp/out/hello.jmx")
        );
    }

    #[test]
    fn given_paths_when_checking_traversal_then_only_parent_dir_counts() {
        assert!(has_parent_traversal(Path::new("a/../b.jmx")));
        assert!(!has_parent_traversal(Path::new("/tmp/a..b/plan.jmx")));
    }
}
