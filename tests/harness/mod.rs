pub mod fixtures;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use tablematch::pipeline::RunOptions;

/// Temporary workspace holding a read corpus, a write corpus and the match
/// output path.
pub struct Workspace {
    pub dir: TempDir,
    pub options: RunOptions,
}

impl Workspace {
    pub fn new(reads: &str, writes: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let select_file = dir.path().join("reads.sql");
        let write_file = dir.path().join("writes.sql");
        fs::write(&select_file, reads).unwrap();
        fs::write(&write_file, writes).unwrap();
        let output = dir.path().join("matches.csv");
        Self {
            options: RunOptions::new(select_file, write_file, output),
            dir,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn output(&self) -> String {
        fs::read_to_string(&self.options.output).unwrap()
    }

    /// Output rows without the header.
    pub fn rows(&self) -> Vec<String> {
        self.output().lines().skip(1).map(str::to_string).collect()
    }
}
