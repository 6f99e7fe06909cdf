use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::TrackStorage;

/// Filesystem-backed track storage rooted at a data directory.
pub struct FsTrackStorage {
    dir: PathBuf,
}

impl FsTrackStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create storage directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl TrackStorage for FsTrackStorage {
    fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    fn read_all_lines(&self, name: &str) -> Result<Vec<String>> {
        let path = self.path(name);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn write_all_lines(&self, name: &str, lines: &[String]) -> Result<()> {
        let path = self.path(name);
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).with_context(|| format!("failed to delete {}", path.display()))
    }

    fn copy_to(&self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let dest = dest_dir.join(name);
        fs::copy(self.path(name), &dest)
            .with_context(|| format!("failed to copy track to {}", dest.display()))?;
        Ok(dest)
    }
}
