use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::content::catalog::{
    Catalog, District, Equipment, Mission, Policy, Staff, Upgrade, Vehicle,
};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads every content-pack file in a directory and merges the results into
/// one catalog.
///
/// File naming follows the pack convention: `missions_*.json`,
/// `vehicles_*.json`, `staff_*.json`, `districts_*.json`, `upgrades_*.json`,
/// `equipment_*.json`, `policies_*.json`. Each file carries a top-level array
/// under its kind key. A malformed entry is skipped with a logged error; a
/// malformed file fails only that file.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Catalog, PackError> {
    let dir = dir.as_ref();
    let mut catalog = Catalog::default();

    let entries = fs::read_dir(dir).map_err(|source| PackError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let result = if file_name.starts_with("missions_") {
            load_file(&path, "missions", &mut catalog.missions, |m: &Mission| {
                m.id.clone()
            })
        } else if file_name.starts_with("vehicles_") {
            load_file(&path, "vehicles", &mut catalog.vehicles, |v: &Vehicle| {
                v.id.clone()
            })
        } else if file_name.starts_with("staff_") {
            load_file(&path, "staff", &mut catalog.staff, |s: &Staff| s.id.clone())
        } else if file_name.starts_with("districts_") {
            load_file(&path, "districts", &mut catalog.districts, |d: &District| {
                d.id.clone()
            })
        } else if file_name.starts_with("upgrades_") {
            load_file(&path, "upgrades", &mut catalog.upgrades, |u: &Upgrade| {
                u.id.clone()
            })
        } else if file_name.starts_with("equipment_") {
            load_file(&path, "equipment", &mut catalog.equipment, |e: &Equipment| {
                e.id.clone()
            })
        } else if file_name.starts_with("policies_") {
            load_file(&path, "policies", &mut catalog.policies, |p: &Policy| {
                p.id.clone()
            })
        } else {
            continue;
        };

        if let Err(err) = result {
            error!(target: "precinct.content", path = %path.display(), %err, "skipping pack file");
        }
    }

    let (missions, vehicles, staff, districts, upgrades, equipment, policies) =
        catalog.entry_counts();
    info!(
        target: "precinct.content",
        missions, vehicles, staff, districts, upgrades, equipment, policies,
        "content packs loaded"
    );

    Ok(catalog)
}

/// Parses one pack file's entries, keeping whatever deserializes cleanly.
fn load_file<T, F>(
    path: &Path,
    top_key: &str,
    target: &mut BTreeMap<String, T>,
    id_of: F,
) -> Result<(), PackError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> String,
{
    let text = fs::read_to_string(path).map_err(|source| PackError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = parse_entries(&text, top_key, target, id_of).map_err(|source| PackError::Json {
        path: path.display().to_string(),
        source,
    })?;
    info!(target: "precinct.content", path = %path.display(), loaded, top_key, "loaded pack file");
    Ok(())
}

/// Shared entry-level parser so pack content can also be fed from strings in
/// tests. Returns how many entries were accepted.
pub fn parse_entries<T, F>(
    text: &str,
    top_key: &str,
    target: &mut BTreeMap<String, T>,
    id_of: F,
) -> Result<usize, serde_json::Error>
where
    T: DeserializeOwned,
    F: Fn(&T) -> String,
{
    let document: Value = serde_json::from_str(text)?;
    let entries = match document.get(top_key).and_then(Value::as_array) {
        Some(entries) => entries.clone(),
        None => Vec::new(),
    };

    let mut loaded = 0;
    for entry in entries {
        match serde_json::from_value::<T>(entry) {
            Ok(parsed) => {
                target.insert(id_of(&parsed), parsed);
                loaded += 1;
            }
            Err(err) => {
                error!(target: "precinct.content", top_key, %err, "skipping malformed entry");
            }
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_skips_malformed_ones() {
        let text = r#"{
            "districts": [
                {
                    "id": "downtown",
                    "name": "Downtown",
                    "unlock_cost": 0,
                    "mission_reward_multiplier": 1.0,
                    "mission_difficulty_modifier": 0
                },
                { "id": "broken" }
            ]
        }"#;

        let mut districts = BTreeMap::new();
        let loaded =
            parse_entries(text, "districts", &mut districts, |d: &District| d.id.clone()).unwrap();
        assert_eq!(loaded, 1);
        assert!(districts.contains_key("downtown"));
        assert!(!districts.contains_key("broken"));
    }

    #[test]
    fn missing_top_key_yields_empty_pack() {
        let mut missions: BTreeMap<String, Mission> = BTreeMap::new();
        let loaded =
            parse_entries("{}", "missions", &mut missions, |m: &Mission| m.id.clone()).unwrap();
        assert_eq!(loaded, 0);
        assert!(missions.is_empty());
    }
}
