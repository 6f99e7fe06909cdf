use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::KeyValueStore;

/// Key-value persistence backed by a small JSON file, reloaded at
/// construction and rewritten on every set.
pub struct JsonKeyValueStore {
    path: PathBuf,
    data: BTreeMap<String, i64>,
}

impl JsonKeyValueStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, data })
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.data.get(key).copied().unwrap_or(default)
    }

    fn set_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.data.insert(key.to_string(), value);
        let serialized = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
