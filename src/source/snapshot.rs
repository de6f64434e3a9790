use crate::config::MissingKeyPolicy;
use crate::error::SourceError;
use crate::model::{FamilyInventory, UserFamilyRecord};
use crate::source::{resolve_system_type, FamilySource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Reads records from a JSON snapshot.
///
/// The layout matches what `export_snapshot` writes. A system type's
/// `category_key` (alias `family_name`) may be `null` or left out, which is
/// how a type with no family-name parameter is recorded.
///
/// ```json
/// {
///   "user_families": [
///     { "category": "Doors", "family_name": "Door-A", "type_names": ["36in"] }
///   ],
///   "system_types": [
///     { "family_name": "Basic Wall", "type_name": "Generic - 200mm" }
///   ]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    user_families: Vec<UserFamilyRecord>,
    #[serde(default)]
    system_types: Vec<RawSystemType>,
}

#[derive(Debug, Deserialize)]
struct RawSystemType {
    #[serde(default, alias = "family_name")]
    category_key: Option<String>,
    type_name: String,
}

impl SnapshotSource {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parses snapshot JSON that is already in memory.
    pub fn parse(content: &str, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError> {
        let raw: RawSnapshot = serde_json::from_str(content)?;

        let mut system_types = Vec::with_capacity(raw.system_types.len());
        for entry in &raw.system_types {
            if let Some(record) = resolve_system_type(entry.category_key.as_deref(), &entry.type_name, policy)? {
                system_types.push(record);
            }
        }

        Ok(FamilyInventory {
            user_families: raw.user_families,
            system_types,
        })
    }
}

impl FamilySource for SnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    fn load(&self, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError> {
        let content = read_input(&self.path)?;
        let inventory = Self::parse(&content, policy)?;
        tracing::info!(
            user_families = inventory.user_families.len(),
            system_types = inventory.system_types.len(),
            "loaded snapshot"
        );
        Ok(inventory)
    }
}

/// Reads an input file, reporting a missing file as [`SourceError::MissingInput`].
pub(crate) fn read_input(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::MissingInput {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_snapshot;
    use crate::model::SystemFamilyTypeRecord;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"{
        "user_families": [
            { "category": "Doors", "family_name": "Door-A", "type_names": ["36in"] },
            { "category": "Doors", "family_name": "Door-B", "type_names": ["30in", "32in"] }
        ],
        "system_types": [
            { "family_name": "Basic Wall", "type_name": "Generic - 200mm" },
            { "family_name": null, "type_name": "Orphan" },
            { "type_name": "Also orphan" },
            { "category_key": "Floor", "type_name": "Concrete 150" }
        ]
    }"#;

    #[test]
    fn skips_types_without_family_name() {
        let inventory = SnapshotSource::parse(SNAPSHOT, MissingKeyPolicy::Skip).unwrap();

        assert_eq!(inventory.user_families.len(), 2);
        assert_eq!(inventory.user_families[1].type_names, vec!["30in", "32in"]);
        assert_eq!(
            inventory.system_types,
            vec![
                SystemFamilyTypeRecord::new("Basic Wall", "Generic - 200mm"),
                SystemFamilyTypeRecord::new("Floor", "Concrete 150"),
            ]
        );
    }

    #[test]
    fn strict_policy_fails_on_first_missing_name() {
        let err = SnapshotSource::parse(SNAPSHOT, MissingKeyPolicy::Fail).unwrap_err();
        assert!(matches!(err, SourceError::MissingFamilyName { type_name } if type_name == "Orphan"));
    }

    #[test]
    fn empty_object_is_an_empty_inventory() {
        let inventory = SnapshotSource::parse("{}", MissingKeyPolicy::Skip).unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_snapshot() {
        let err = SnapshotSource::parse("{ not json", MissingKeyPolicy::Skip).unwrap_err();
        assert!(matches!(err, SourceError::InvalidSnapshot { .. }));
    }

    #[test]
    fn missing_file_is_missing_input() {
        let err = SnapshotSource::new("/nonexistent/families.json")
            .load(MissingKeyPolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingInput { .. }));
    }

    #[test]
    fn reads_back_an_exported_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("families.json");
        let inventory = SnapshotSource::parse(SNAPSHOT, MissingKeyPolicy::Skip).unwrap();

        export_snapshot(&inventory, &path).unwrap();
        let loaded = SnapshotSource::new(&path).load(MissingKeyPolicy::Fail).unwrap();

        assert_eq!(loaded, inventory);
    }
}
