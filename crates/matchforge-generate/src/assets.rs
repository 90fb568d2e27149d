use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::GenerationError;

/// Reads line-oriented pool overrides from a directory.
#[derive(Debug, Clone)]
pub struct AssetsLoader {
    root: PathBuf,
}

impl AssetsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Trimmed, non-blank lines of `relative`, or `None` when the file does
    /// not exist.
    pub fn load_lines(&self, relative: &str) -> Result<Option<Vec<String>>, GenerationError> {
        let path = self.root.join(relative);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    return Ok(None);
                }
                return Err(GenerationError::Asset(format!(
                    "failed to read asset {}: {}",
                    path.display(),
                    err
                )));
            }
        };

        let values = contents
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect();

        Ok(Some(values))
    }
}
