//! Schemaless document storage for observation records.
//!
//! [`DocumentStore`] is the seam to whatever database backs the tools.
//! [`JsonLinesStore`] keeps one `<collection>.jsonl` file per collection;
//! [`MemoryStore`] keeps everything in a map.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::observation::Location;

pub const WEATHER_COLLECTION: &str = "weather_records";
pub const FAUNA_COLLECTION: &str = "fauna_catalog";

pub trait DocumentStore {
    /// Append one document. Only JSON objects are accepted.
    fn insert(&mut self, collection: &str, doc: Value) -> Result<(), StoreError>;

    /// Number of documents in `collection`; 0 if it does not exist yet.
    fn count(&self, collection: &str) -> Result<usize, StoreError>;

    /// All documents of `collection` in insertion order.
    fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
}

fn check_collection(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::BadCollection(name.to_string()))
    }
}

// ── JSON-lines files ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    root: PathBuf,
}

impl JsonLinesStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io { path: root.clone(), source })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, collection: &str) -> Result<PathBuf, StoreError> {
        check_collection(collection)?;
        Ok(self.root.join(format!("{collection}.jsonl")))
    }
}

impl DocumentStore for JsonLinesStore {
    fn insert(&mut self, collection: &str, doc: Value) -> Result<(), StoreError> {
        if !doc.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let path = self.path_for(collection)?;
        let mut line = serde_json::to_string(&doc)?;
        line.push('\n');

        let io_err = |source| StoreError::Io { path: path.clone(), source };
        let mut file = OpenOptions::new().create(true).append(true).open(&path).map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)?;
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.find_all(collection)?.len())
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.path_for(collection)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&path).map_err(|source| StoreError::Io { path: path.clone(), source })?;

        let mut docs = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io { path: path.clone(), source })?;
            if line.trim().is_empty() {
                continue;
            }
            let doc = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                line: i + 1,
                source,
            })?;
            docs.push(doc);
        }
        Ok(docs)
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, collection: &str, doc: Value) -> Result<(), StoreError> {
        check_collection(collection)?;
        if !doc.is_object() {
            return Err(StoreError::NotAnObject);
        }
        self.collections.entry(collection.to_string()).or_default().push(doc);
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize, StoreError> {
        check_collection(collection)?;
        Ok(self.collections.get(collection).map_or(0, Vec::len))
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        check_collection(collection)?;
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}

// ── Map overlay ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Weather,
    Fauna,
}

/// One stored record placed on the monitoring map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub layer: MapLayer,
    pub label: String,
}

fn text<'a>(doc: &'a Value, key: &str) -> &'a str {
    doc.get(key).and_then(Value::as_str).unwrap_or("")
}

fn field(doc: &Value, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(v) => v.to_string(),
    }
}

/// Every weather and fauna record whose `location` holds two numbers.
/// Coordinates are plotted as stored, without range checks; records with
/// no parseable location are skipped.
pub fn map_points(store: &dyn DocumentStore) -> Result<Vec<MapPoint>, StoreError> {
    let mut points = Vec::new();

    for doc in store.find_all(FAUNA_COLLECTION)? {
        if let Ok(loc) = Location::parse_unchecked(text(&doc, "location")) {
            points.push(MapPoint {
                lat: loc.lat,
                lon: loc.lon,
                layer: MapLayer::Fauna,
                label: format!(
                    "Fauna: {} ({}) x{}",
                    field(&doc, "species"),
                    field(&doc, "kind"),
                    field(&doc, "count")
                ),
            });
        }
    }

    for doc in store.find_all(WEATHER_COLLECTION)? {
        if let Ok(loc) = Location::parse_unchecked(text(&doc, "location")) {
            points.push(MapPoint {
                lat: loc.lat,
                lon: loc.lon,
                layer: MapLayer::Weather,
                label: format!(
                    "Weather: rain {}, {} °C",
                    field(&doc, "rain"),
                    field(&doc, "temperature")
                ),
            });
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_store_counts_per_collection() {
        let mut s = MemoryStore::new();
        s.insert(WEATHER_COLLECTION, json!({"rain": "no"})).unwrap();
        s.insert(WEATHER_COLLECTION, json!({"rain": "drizzle"})).unwrap();
        s.insert(FAUNA_COLLECTION, json!({"kind": "bird"})).unwrap();
        assert_eq!(s.count(WEATHER_COLLECTION).unwrap(), 2);
        assert_eq!(s.count(FAUNA_COLLECTION).unwrap(), 1);
        assert_eq!(s.count("empty").unwrap(), 0);
        assert_eq!(s.find_all(WEATHER_COLLECTION).unwrap()[1]["rain"], "drizzle");
    }

    #[test]
    fn non_objects_and_bad_names_are_rejected() {
        let mut s = MemoryStore::new();
        assert!(matches!(s.insert("ok", json!([1, 2])), Err(StoreError::NotAnObject)));
        assert!(matches!(s.insert("../etc", json!({})), Err(StoreError::BadCollection(_))));
        assert!(matches!(s.count(""), Err(StoreError::BadCollection(_))));
    }

    #[test]
    fn jsonl_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut s = JsonLinesStore::open(dir.path()).unwrap();
            s.insert(FAUNA_COLLECTION, json!({"kind": "bird", "count": 3})).unwrap();
            s.insert(FAUNA_COLLECTION, json!({"kind": "fish", "count": 1})).unwrap();
        }
        let s = JsonLinesStore::open(dir.path()).unwrap();
        assert_eq!(s.count(FAUNA_COLLECTION).unwrap(), 2);
        assert_eq!(s.count(WEATHER_COLLECTION).unwrap(), 0);
        let docs = s.find_all(FAUNA_COLLECTION).unwrap();
        assert_eq!(docs[0]["kind"], "bird");
        assert_eq!(docs[1]["count"], 1);
        assert!(dir.path().join("fauna_catalog.jsonl").exists());
    }

    #[test]
    fn jsonl_store_reports_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("weather_records.jsonl"), "{\"a\":1}\nnot json\n").unwrap();
        let s = JsonLinesStore::open(dir.path()).unwrap();
        let err = s.find_all(WEATHER_COLLECTION).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { line: 2, .. }));
    }

    #[test]
    fn map_points_skip_unparseable_locations() {
        let mut s = MemoryStore::new();
        s.insert(FAUNA_COLLECTION, json!({"location": "4.7,-74.1", "species": "heron", "kind": "bird", "count": 2}))
            .unwrap();
        s.insert(FAUNA_COLLECTION, json!({"location": "near the river"})).unwrap();
        s.insert(WEATHER_COLLECTION, json!({"location": "4.6 -74.0", "rain": "no", "temperature": 21.0}))
            .unwrap();
        s.insert(WEATHER_COLLECTION, json!({"rain": "no"})).unwrap();

        let points = map_points(&s).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].layer, MapLayer::Fauna);
        assert_eq!(points[0].label, "Fauna: heron (bird) x2");
        assert_eq!(points[1].layer, MapLayer::Weather);
        assert_eq!((points[1].lat, points[1].lon), (4.6, -74.0));
        assert_eq!(points[1].label, "Weather: rain no, 21.0 °C");
    }

    #[test]
    fn map_points_keep_out_of_range_coordinates() {
        let mut s = MemoryStore::new();
        s.insert(WEATHER_COLLECTION, json!({"location": "95,200", "rain": "no", "temperature": 20}))
            .unwrap();
        s.insert(FAUNA_COLLECTION, json!({"location": "NaN,1", "species": "owl"})).unwrap();

        let points = map_points(&s).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].layer, MapLayer::Weather);
        assert_eq!((points[0].lat, points[0].lon), (95.0, 200.0));
    }
}
