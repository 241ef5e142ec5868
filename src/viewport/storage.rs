use crate::models::viewport::Viewport;
use crate::traits::ViewportStore;
use crate::viewport::route::parse_viewport;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const LATITUDE_KEY: &str = "latitude";
pub const LONGITUDE_KEY: &str = "longitude";
pub const ZOOM_KEY: &str = "zoom";

/// Read the stored viewport, if all three keys hold valid values.
pub fn load_viewport(store: &dyn ViewportStore) -> Option<Viewport> {
    let latitude = store.get(LATITUDE_KEY)?;
    let longitude = store.get(LONGITUDE_KEY)?;
    let zoom = store.get(ZOOM_KEY)?;
    match parse_viewport(&latitude, &longitude, &zoom) {
        Ok(viewport) => Some(viewport),
        Err(e) => {
            tracing::debug!("Ignoring stored viewport: {}", e);
            None
        }
    }
}

/// Write `viewport` at route precision.
pub fn save_viewport(store: &mut dyn ViewportStore, viewport: &Viewport) {
    let key = viewport.key();
    store.set(LATITUDE_KEY, &key.latitude);
    store.set(LONGITUDE_KEY, &key.longitude);
    store.set(ZOOM_KEY, &key.zoom);
}

/// In-process storage, used when no storage file is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl ViewportStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// One row of the storage file.
#[derive(Serialize, Deserialize)]
struct StoredValue {
    key: String,
    value: String,
}

/// `key,value` CSV file, rewritten on every change.
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl CsvStore {
    /// Open the store at `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_values(&path);
        CsvStore { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewportStore for CsvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = save_values(&self.path, &self.values) {
            tracing::warn!("Failed to save viewport to {}: {}", self.path.display(), e);
        }
    }
}

fn load_values(path: &Path) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    if let Ok(mut rdr) = ReaderBuilder::new().has_headers(true).from_path(path) {
        for row in rdr.deserialize::<StoredValue>().flatten() {
            values.insert(row.key, row.value);
        }
    }
    values
}

fn save_values(path: &Path, values: &BTreeMap<String, String>) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(path)?;
    for (key, value) in values {
        wtr.serialize(StoredValue {
            key: key.clone(),
            value: value.clone(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
