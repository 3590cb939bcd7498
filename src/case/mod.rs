//! Persisted case documents.
//!
//! A case is stored as JSON. The Inlet/Outlet configuration is one section of
//! it; other sections the GUI edits (such as the MoorDynPlus XML) travel with
//! it unchanged. Loading always runs the migration chain in [`schema`].

pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::InletOutletConfig;

pub use schema::CURRENT_VERSION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    pub version: u32,
    pub name: String,
    pub inout: InletOutletConfig,
    /// Raw MoorDynPlus configuration, kept verbatim.
    #[serde(default)]
    pub moordynplus_xml: Option<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CaseDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_VERSION,
            name: name.into(),
            inout: InletOutletConfig::default(),
            moordynplus_xml: None,
            saved_at: None,
        }
    }

    /// Migrates a raw document, deserializes it and checks the Inlet/Outlet
    /// section against the model's rules.
    pub fn from_value(mut value: Value) -> Result<Self> {
        schema::run_migrations(&mut value)?;
        let doc: Self =
            serde_json::from_value(value).context("Failed to read migrated case document")?;
        doc.inout
            .check()
            .context("Case document holds an invalid inout configuration")?;
        Ok(doc)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Case file is not valid JSON")?;
        Self::from_value(value)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file {}", path.display()))?;
        let doc = Self::from_json(&text)
            .with_context(|| format!("Failed to load case file {}", path.display()))?;
        tracing::info!(
            "Loaded case '{}' with {} inout zones from {}",
            doc.name,
            doc.inout.zones().len(),
            path.display()
        );
        Ok(doc)
    }

    /// Stamps `saved_at` and writes the document as pretty-printed JSON.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        self.version = CURRENT_VERSION;
        self.saved_at = Some(Utc::now());
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write case file {}", path.display()))?;
        tracing::info!("Saved case '{}' to {}", self.name, path.display());
        Ok(())
    }
}

/// The one case document shared by the HTTP handlers.
#[derive(Clone)]
pub struct CaseStore {
    doc: Arc<Mutex<CaseDocument>>,
    path: Option<PathBuf>,
}

impl CaseStore {
    /// Opens the case at `path`, or starts an empty one there if the file
    /// does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self> {
        let doc = if path.exists() {
            CaseDocument::load(&path)?
        } else {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::info!("Starting new case at {}", path.display());
            CaseDocument::new(name)
        };
        Ok(Self {
            doc: Arc::new(Mutex::new(doc)),
            path: Some(path),
        })
    }

    /// A store with nowhere to save to.
    pub fn in_memory(doc: CaseDocument) -> Self {
        Self {
            doc: Arc::new(Mutex::new(doc)),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CaseDocument>> {
        self.doc.lock().map_err(|_| anyhow!("case lock poisoned"))
    }

    pub fn read<R>(&self, f: impl FnOnce(&CaseDocument) -> R) -> Result<R> {
        let doc = self.lock()?;
        Ok(f(&doc))
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut CaseDocument) -> R) -> Result<R> {
        let mut doc = self.lock()?;
        Ok(f(&mut doc))
    }

    /// Writes the document to the store's path and returns that path.
    pub fn save(&self) -> Result<PathBuf> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| anyhow!("Case has no file to save to"))?;
        self.lock()?.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZoneShape;

    #[test]
    fn save_and_load_preserve_zones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases").join("dam.json");

        let mut doc = CaseDocument::new("dam");
        let id = doc.inout.add_zone(ZoneShape::Box).unwrap().id;
        doc.save(&path).unwrap();

        let loaded = CaseDocument::load(&path).unwrap();
        assert_eq!(loaded.inout.zone(id).unwrap().shape(), ZoneShape::Box);
        assert!(loaded.saved_at.is_some());
        assert_eq!(loaded, doc);
    }

    #[test]
    fn zero_layers_are_refused_on_load() {
        let mut doc = CaseDocument::new("dam");
        doc.inout.add_zone(ZoneShape::Box).unwrap();
        let mut value = serde_json::to_value(&doc).unwrap();
        value["inout"]["zones"][0]["layers"] = serde_json::json!(0);

        let err = CaseDocument::from_value(value).unwrap_err();
        let cause = err.downcast_ref::<crate::error::ModelError>().unwrap();
        assert!(
            matches!(cause, crate::error::ModelError::InvalidField { field, .. } if field == "zones[0].layers")
        );
    }

    #[test]
    fn store_without_path_cannot_save() {
        let store = CaseStore::in_memory(CaseDocument::new("scratch"));
        assert!(store.save().is_err());
    }

    #[test]
    fn opening_a_missing_file_starts_a_new_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = CaseStore::open(dir.path().join("wave.json")).unwrap();
        let name = store.read(|doc| doc.name.clone()).unwrap();
        assert_eq!(name, "wave");
    }
}
