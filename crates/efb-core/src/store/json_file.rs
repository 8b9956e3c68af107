use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{errors::Error, ports::KeyValueStore, Result};

/// JSON document persisted to a single file.
///
/// Reads and writes hit the in-memory document; `save` writes a full snapshot to a
/// temporary sibling file and renames it over the target.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<Value>,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Open `path`, starting from an empty document if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = load_document(&path)?;
        Ok(Self {
            path,
            doc: Mutex::new(doc),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "db.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(json!({}));
    }
    let txt = fs::read_to_string(path)?;
    if txt.trim().is_empty() {
        return Ok(json!({}));
    }
    let doc: Value = serde_json::from_str(&txt)?;
    if !doc.is_object() {
        return Err(Error::InvalidInput(format!(
            "{} does not contain a JSON object",
            path.display()
        )));
    }
    Ok(doc)
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        super::lookup(&doc, key)
    }

    fn set(&self, key: &str, value: Value) {
        let mut doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        super::insert(&mut doc, key, value);
    }

    async fn save(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let txt = {
            let doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_string_pretty(&*doc)?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, txt).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "store saved");
        Ok(())
    }
}
