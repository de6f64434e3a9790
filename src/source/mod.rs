//! Data sources that supply the two record lists.

pub mod ifc;
pub mod snapshot;
pub mod step;

use crate::config::MissingKeyPolicy;
use crate::error::SourceError;
use crate::model::{FamilyInventory, SystemFamilyTypeRecord};

pub use ifc::IfcSource;
pub use snapshot::SnapshotSource;

/// Something that can enumerate a model's families and system family types.
pub trait FamilySource {
    /// Short human-readable name of the source, used in logs.
    fn describe(&self) -> String;

    /// Loads both record lists. Records are returned in source order.
    fn load(&self, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError>;
}

/// Turns a system type with a possibly-missing family-name key into a record,
/// applying `policy` when the key is absent or blank.
pub(crate) fn resolve_system_type(
    family_name: Option<&str>,
    type_name: &str,
    policy: MissingKeyPolicy,
) -> Result<Option<SystemFamilyTypeRecord>, SourceError> {
    match family_name.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Ok(Some(SystemFamilyTypeRecord::new(key, type_name))),
        None => match policy {
            MissingKeyPolicy::Skip => {
                tracing::warn!(type_name, "skipping system family type without a family name");
                Ok(None)
            }
            MissingKeyPolicy::Fail => Err(SourceError::MissingFamilyName {
                type_name: type_name.to_string(),
            }),
        },
    }
}
