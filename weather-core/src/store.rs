//! Durable storage for named locations.
//!
//! The whole collection lives in one JSON document, `{ "locations": [...] }`. Every call
//! re-reads it and every mutation rewrites it in full; nothing is cached between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{error::ToolError, model::Location};

/// Storage port used by the tool handlers.
#[async_trait]
pub trait LocationStore: Send + Sync + Debug {
    /// All locations in insertion order. Unreadable storage yields an empty list.
    async fn list(&self) -> Vec<Location>;

    /// Case-insensitive exact lookup.
    async fn find(&self, name: &str) -> Option<Location>;

    /// Validate and append a new location, then persist.
    async fn add(&self, name: &str, latitude: f64, longitude: f64) -> Result<(), ToolError>;

    /// Remove the location with a matching name, then persist.
    async fn delete(&self, name: &str) -> Result<(), ToolError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocationsDocument {
    #[serde(default)]
    locations: Vec<Location>,
}

/// [`LocationStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> LocationsDocument {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No locations file yet");
                return LocationsDocument::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read locations file, treating as empty");
                return LocationsDocument::default();
            }
        };

        // Corrupt content resets the visible state rather than blocking every tool.
        match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Locations file is not valid, treating as empty");
                LocationsDocument::default()
            }
        }
    }

    /// Replace the document on disk via a sibling temp file and rename.
    async fn write_document(&self, doc: &LocationsDocument) -> Result<(), ToolError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                ToolError::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| ToolError::Storage(format!("cannot serialize locations: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| ToolError::Storage(format!("cannot write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            ToolError::Storage(format!("cannot replace {}: {e}", self.path.display()))
        })?;

        Ok(())
    }
}

#[async_trait]
impl LocationStore for JsonFileStore {
    async fn list(&self) -> Vec<Location> {
        self.read_document().await.locations
    }

    async fn find(&self, name: &str) -> Option<Location> {
        self.read_document()
            .await
            .locations
            .into_iter()
            .find(|loc| loc.has_name(name))
    }

    async fn add(&self, name: &str, latitude: f64, longitude: f64) -> Result<(), ToolError> {
        validate(name, latitude, longitude)?;

        let mut doc = self.read_document().await;
        if let Some(existing) = doc.locations.iter().find(|loc| loc.has_name(name)) {
            return Err(ToolError::DuplicateName(existing.name.clone()));
        }

        doc.locations.push(Location {
            name: name.to_string(),
            latitude,
            longitude,
        });
        self.write_document(&doc).await?;

        info!(location = name, "Location added");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ToolError> {
        let mut doc = self.read_document().await;
        let index = doc
            .locations
            .iter()
            .position(|loc| loc.has_name(name))
            .ok_or_else(|| ToolError::LocationNotFound(name.to_string()))?;

        let removed = doc.locations.remove(index);
        self.write_document(&doc).await?;

        info!(location = %removed.name, "Location deleted");
        Ok(())
    }
}

fn validate(name: &str, latitude: f64, longitude: f64) -> Result<(), ToolError> {
    if name.trim().is_empty() {
        return Err(ToolError::EmptyName);
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ToolError::InvalidLatitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ToolError::InvalidLongitude(longitude));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("config").join("locations.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let (_dir, store) = store();

        assert!(store.list().await.is_empty());
        assert!(store.find("Home").await.is_none());
    }

    #[tokio::test]
    async fn add_then_find_any_case() {
        let (_dir, store) = store();

        store.add("Home", 35.6895, 139.6917).await.expect("add");

        for query in ["Home", "home", "HOME", "hOmE"] {
            let loc = store.find(query).await.expect("found");
            assert_eq!(loc.name, "Home");
            assert_eq!(loc.latitude, 35.6895);
            assert_eq!(loc.longitude, 139.6917);
        }
    }

    #[tokio::test]
    async fn add_creates_directory_and_document() {
        let (_dir, store) = store();

        store.add("Office", 51.5, -0.12).await.expect("add");

        let raw = std::fs::read_to_string(store.path()).expect("document written");
        let doc: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(doc["locations"][0]["name"], "Office");
        assert_eq!(doc["locations"][0]["latitude"], 51.5);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_and_unchanged() {
        let (_dir, store) = store();
        store.add("Home", 10.0, 20.0).await.expect("add");

        let err = store.add("HOME", 30.0, 40.0).await.unwrap_err();

        assert!(matches!(err, ToolError::DuplicateName(ref n) if n == "Home"));
        let all = store.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].latitude, 10.0);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_never_write() {
        let (_dir, store) = store();

        let err = store.add("North", 91.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidLatitude(_)));

        let err = store.add("East", 0.0, 181.0).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidLongitude(_)));

        let err = store.add("Nowhere", f64::NAN, 0.0).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidLatitude(_)));

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn boundary_coordinates_are_valid() {
        let (_dir, store) = store();

        store.add("Pole", 90.0, -180.0).await.expect("north pole");
        store.add("Other pole", -90.0, 180.0).await.expect("south pole");

        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (_dir, store) = store();

        let err = store.add("   ", 0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ToolError::EmptyName));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (_dir, store) = store();

        let err = store.delete("Ghost").await.unwrap_err();
        assert!(matches!(err, ToolError::LocationNotFound(ref n) if n == "Ghost"));
    }

    #[tokio::test]
    async fn delete_keeps_order_of_the_rest() {
        let (_dir, store) = store();
        store.add("A", 1.0, 1.0).await.expect("add");
        store.add("B", 2.0, 2.0).await.expect("add");
        store.add("C", 3.0, 3.0).await.expect("add");

        store.delete("b").await.expect("delete");

        let names: Vec<String> = store.list().await.into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[tokio::test]
    async fn name_can_be_reused_after_delete() {
        let (_dir, store) = store();
        store.add("Cabin", 45.0, 7.0).await.expect("add");
        store.delete("Cabin").await.expect("delete");
        store.add("cabin", -33.9, 18.4).await.expect("re-add");

        let loc = store.find("CABIN").await.expect("found");
        assert_eq!(loc.name, "cabin");
        assert_eq!((loc.latitude, loc.longitude), (-33.9, 18.4));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_document_reads_as_empty() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "{ not json").expect("write");

        assert!(store.list().await.is_empty());

        // The next mutation overwrites the corrupt document.
        store.add("Fresh", 1.0, 2.0).await.expect("add");
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn document_without_locations_field_is_empty() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "{}").expect("write");

        assert!(store.list().await.is_empty());
    }
}
