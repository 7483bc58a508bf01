use crate::gate::domain::PhysicalLocation;
use crate::ports::outbound::MetadataStore;
use crate::shared::security::{
    validate_file_size, validate_not_symlink, validate_regular_file, MAX_STORE_FILE_SIZE,
};
use crate::shared::Result;
use anyhow::Context;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;
use tracing::debug;

type Document = BTreeMap<String, BTreeMap<String, String>>;

/// JsonFileMetadataStore adapter persisting properties to a JSON document
///
/// The document maps `"repo/path"` to a flat object of properties:
///
/// ```json
/// { "npm-remote/lodash/-/lodash-0.2.1.tgz": { "Sca.RiskLevel": "High" } }
/// ```
///
/// Every write rewrites the whole document through a temporary file in the
/// same directory, then renames it over the original.
pub struct JsonFileMetadataStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl JsonFileMetadataStore {
    /// Opens the store at `path`. A missing file starts an empty store.
    ///
    /// # Errors
    /// Returns an error if the file is a symlink, not a regular file,
    /// larger than `MAX_STORE_FILE_SIZE`, or not valid JSON.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if fs::symlink_metadata(&path).is_ok() {
            Self::load(&path)?
        } else {
            debug!(path = %path.display(), "Metadata store file not found, starting empty");
            Document::new()
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Document> {
        validate_regular_file(path, "metadata store")?;
        let size = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata store {}", path.display()))?
            .len();
        validate_file_size(size, path, MAX_STORE_FILE_SIZE)?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata store {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Document::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Metadata store {} is not valid JSON", path.display()))
    }

    fn save(&self, document: &Document) -> Result<()> {
        if fs::symlink_metadata(&self.path).is_ok() {
            validate_not_symlink(&self.path, "write")?;
        }

        let directory = match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(directory)
            .with_context(|| format!("Failed to create a temporary file in {}", directory.display()))?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.write_all(b"\n")?;
        file.persist(&self.path)
            .with_context(|| format!("Failed to write metadata store {}", self.path.display()))?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetadataStore for JsonFileMetadataStore {
    fn exists(&self, location: &PhysicalLocation) -> Result<bool> {
        Ok(self.lock().contains_key(&location.to_string()))
    }

    fn get_property(&self, location: &PhysicalLocation, key: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .get(&location.to_string())
            .and_then(|properties| properties.get(key).cloned()))
    }

    fn get_all_properties(&self, location: &PhysicalLocation) -> Result<HashMap<String, String>> {
        Ok(self
            .lock()
            .get(&location.to_string())
            .map(|properties| properties.clone().into_iter().collect())
            .unwrap_or_default())
    }

    fn set_property(&self, location: &PhysicalLocation, key: &str, value: &str) -> Result<()> {
        self.set_properties(location, &[(key, value.to_string())])
    }

    /// Saves once for all properties; memory is only updated when the save succeeds.
    fn set_properties(&self, location: &PhysicalLocation, properties: &[(&str, String)]) -> Result<()> {
        let mut document = self.lock();
        let mut updated = document.clone();
        let entry = updated.entry(location.to_string()).or_default();
        for (key, value) in properties {
            entry.insert(key.to_string(), value.clone());
        }
        self.save(&updated)?;
        *document = updated;
        Ok(())
    }
}
