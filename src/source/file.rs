//! Reads pages from a directory on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, info};

use super::{FetchError, PageSource, check_page_id};

pub struct FileSource {
    root: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        info!("FileSource initialized with root: {}", name);
        Self { root, name }
    }
}

#[async_trait]
impl PageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_text(&self, page_id: &str) -> Result<String, FetchError> {
        check_page_id(page_id)?;
        let path = self.root.join(page_id);
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.rs"), "// = A\n").unwrap();
        let source = FileSource::new(dir.path());

        let text = tokio_test::block_on(source.fetch_text("a.rs")).unwrap();
        assert_eq!(text, "// = A\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let result = tokio_test::block_on(source.fetch_text("nope.rs"));
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[test]
    fn parent_traversal_is_refused() {
        let source = FileSource::new("/tmp");
        let result = tokio_test::block_on(source.fetch_text("../etc/passwd"));
        assert!(matches!(result, Err(FetchError::InvalidPageId(_))));
    }
}
