//! Tests for the conversion engine

pub mod writer_tests;

use crate::app::services::conversion_engine::{ConversionEngine, EngineOptions};
use crate::app::services::variable_database::VariableDatabase;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Source and target directories for one test
pub struct Workspace {
    pub source: TempDir,
    pub target: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().unwrap(),
            target: TempDir::new().unwrap(),
        }
    }

    /// Write an archive file with CRLF line endings
    pub fn archive(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.source.path().join(name);
        let mut content = lines.join("\r\n");
        content.push_str("\r\n");
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn engine(&self, variables: VariableDatabase) -> ConversionEngine {
        ConversionEngine::new(
            Arc::new(variables),
            EngineOptions::new(self.target.path()),
        )
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.target.path().join(name)
    }
}

/// Read an output file and split it into CRLF-terminated rows
pub fn read_rows(path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(path).unwrap();
    assert!(
        content.is_empty() || content.ends_with("\r\n"),
        "rows must be CRLF-terminated: {:?}",
        content
    );
    content
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect()
}
