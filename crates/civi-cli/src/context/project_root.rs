use std::path::{Path, PathBuf};

use civi_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.civibridge` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::find_project_root;

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".civibridge")).expect(".civibridge should create");
        std::fs::create_dir_all(temp.path().join("wp-content/plugins")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("wp-content/plugins"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        assert!(find_project_root(temp.path()).is_none());
    }
}
