use crate::config::MissingKeyPolicy;
use crate::error::SourceError;
use crate::model::{FamilyInventory, UserFamilyRecord};
use crate::source::snapshot::read_input;
use crate::source::step::{StepEntity, StepFile};
use crate::source::{resolve_system_type, FamilySource};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

// Type entities of loadable (user) families, with the category each maps to.
// IFC4 types first, then IFC2X3 styles.
const USER_FAMILY_TYPES: &[(&str, &str)] = &[
    ("IFCDOORTYPE", "Doors"),
    ("IFCDOORSTYLE", "Doors"),
    ("IFCWINDOWTYPE", "Windows"),
    ("IFCWINDOWSTYLE", "Windows"),
    ("IFCFURNITURETYPE", "Furniture"),
    ("IFCFURNISHINGELEMENTTYPE", "Furniture"),
    ("IFCSANITARYTERMINALTYPE", "Plumbing Fixtures"),
    ("IFCFLOWTERMINALTYPE", "Plumbing Fixtures"),
    ("IFCCOLUMNTYPE", "Columns"),
    ("IFCBEAMTYPE", "Structural Framing"),
    ("IFCMEMBERTYPE", "Structural Framing"),
    ("IFCLIGHTFIXTURETYPE", "Lighting Fixtures"),
    ("IFCBUILDINGELEMENTPROXYTYPE", "Generic Models"),
];

// Type entities of system families. Their family name is the category key.
const SYSTEM_FAMILY_TYPES: &[&str] = &[
    "IFCWALLTYPE",
    "IFCSLABTYPE",
    "IFCROOFTYPE",
    "IFCSTAIRTYPE",
    "IFCSTAIRFLIGHTTYPE",
    "IFCRAILINGTYPE",
    "IFCRAMPTYPE",
    "IFCCURTAINWALLTYPE",
    "IFCCOVERINGTYPE",
];

// IfcRoot attribute positions shared by every type object.
const NAME_INDEX: usize = 2;

/// Reads family records from an IFC file exported by a BIM authoring tool.
///
/// Type objects are named `Family:Type`. Loadable family types are grouped
/// into one [`UserFamilyRecord`] per (category, family); system family types
/// use the family part as their category key. A system type named without a
/// `:` has no family name and is handled by the [`MissingKeyPolicy`].
///
/// Supports both IFC2x3 and IFC4 schemas.
#[derive(Debug, Clone)]
pub struct IfcSource {
    path: PathBuf,
}

impl IfcSource {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Extracts records from STEP content that is already in memory.
    pub fn parse(content: &str, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError> {
        let step_file = StepFile::parse(content)?;
        tracing::debug!(schema = %step_file.schema, entities = step_file.entities.len(), "parsed STEP file");
        extract_inventory(&step_file, policy)
    }
}

impl FamilySource for IfcSource {
    fn describe(&self) -> String {
        format!("IFC model {}", self.path.display())
    }

    fn load(&self, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError> {
        let content = read_input(&self.path)?;
        let inventory = Self::parse(&content, policy)?;
        tracing::info!(
            user_families = inventory.user_families.len(),
            system_types = inventory.system_types.len(),
            "loaded IFC model"
        );
        Ok(inventory)
    }
}

fn extract_inventory(step_file: &StepFile, policy: MissingKeyPolicy) -> Result<FamilyInventory, SourceError> {
    let mut families: IndexMap<(&str, String), Vec<String>> = IndexMap::new();
    let mut system_types = Vec::new();

    // Walk in file order so first-seen order is the model's own order.
    for entity in &step_file.entities {
        if let Some(category) = user_category(&entity.keyword) {
            let label = type_label(entity);
            let (family, type_name) = split_type_name(&label);
            let family = family.unwrap_or(type_name);
            families
                .entry((category, family.to_string()))
                .or_default()
                .push(type_name.to_string());
        } else if SYSTEM_FAMILY_TYPES.contains(&entity.keyword.as_str()) {
            let label = type_label(entity);
            let (family, type_name) = split_type_name(&label);
            if let Some(record) = resolve_system_type(family, type_name, policy)? {
                system_types.push(record);
            }
        }
    }

    let user_families = families
        .into_iter()
        .map(|((category, family_name), type_names)| UserFamilyRecord {
            category: category.to_string(),
            family_name,
            type_names,
        })
        .collect();

    Ok(FamilyInventory {
        user_families,
        system_types,
    })
}

fn user_category(keyword: &str) -> Option<&'static str> {
    USER_FAMILY_TYPES
        .iter()
        .find(|(entity, _)| *entity == keyword)
        .map(|(_, category)| *category)
}

fn type_label(entity: &StepEntity) -> String {
    entity
        .string_at(NAME_INDEX)
        .map_or_else(|| format!("Type #{}", entity.id), str::to_string)
}

/// Splits `Family:Type` at the first `:`. Both halves are trimmed; the family
/// is `None` when there is no separator or nothing before it.
fn split_type_name(label: &str) -> (Option<&str>, &str) {
    match label.split_once(':') {
        Some((family, type_name)) => {
            let family = family.trim();
            let type_name = type_name.trim();
            ((!family.is_empty()).then_some(family), type_name)
        }
        None => (None, label.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SystemFamilyTypeRecord;
    use pretty_assertions::assert_eq;

    const MODEL: &str = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#10=IFCWALLTYPE('1',#2,'Basic Wall:Generic - 200mm',$,$,$,$,$,$,.STANDARD.);
#11=IFCDOORSTYLE('2',#2,'Door-B:30in',$,$,$,$,$,.SINGLE_SWING_LEFT.,.NOTDEFINED.,.F.,.F.);
#12=IFCWINDOWTYPE('3',#2,'Fixed:0406 x 0610mm',$,$,$,$,$,$,.WINDOW.,.SINGLE_PANEL.,.F.,$);
#13=IFCDOORTYPE('4',#2,'Door-B:32in',$,$,$,$,$,$,.DOOR.,.SINGLE_SWING_LEFT.,.F.,$);
#14=IFCSLABTYPE('5',#2,'Floor:Concrete 150',$,$,$,$,$,$,.FLOOR.);
#15=IFCWALLTYPE('6',#2,'Basic Wall:Exterior - Brick',$,$,$,$,$,$,.STANDARD.);
#16=IFCROOFTYPE('7',#2,'Loose roof type',$,$,$,$,$,$,.FLAT_ROOF.);
#17=IFCFURNITURETYPE('8',#2,'Desk',$,$,$,$,$,$,.DESK.,$);
#18=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(915.),$);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn groups_user_types_into_families_in_file_order() {
        let inventory = IfcSource::parse(MODEL, MissingKeyPolicy::Skip).unwrap();

        assert_eq!(
            inventory.user_families,
            vec![
                UserFamilyRecord::new("Doors", "Door-B", ["30in", "32in"]),
                UserFamilyRecord::new("Windows", "Fixed", ["0406 x 0610mm"]),
                UserFamilyRecord::new("Furniture", "Desk", ["Desk"]),
            ]
        );
    }

    #[test]
    fn system_types_use_family_name_as_key() {
        let inventory = IfcSource::parse(MODEL, MissingKeyPolicy::Skip).unwrap();

        assert_eq!(
            inventory.system_types,
            vec![
                SystemFamilyTypeRecord::new("Basic Wall", "Generic - 200mm"),
                SystemFamilyTypeRecord::new("Floor", "Concrete 150"),
                SystemFamilyTypeRecord::new("Basic Wall", "Exterior - Brick"),
            ]
        );
    }

    #[test]
    fn unnamed_system_family_fails_under_strict_policy() {
        let err = IfcSource::parse(MODEL, MissingKeyPolicy::Fail).unwrap_err();
        assert!(matches!(err, SourceError::MissingFamilyName { type_name } if type_name == "Loose roof type"));
    }

    #[test]
    fn exporter_comments_keep_every_type() {
        let content = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
/* Revit's export */
#1=IFCWALLTYPE('a',$,'Basic Wall:Generic',$,$,$,$,$,$,.STANDARD.);
#2=IFCDOORTYPE('b',$,'Door-A:36in',$,$,$,$,$,$,.DOOR.,.NOTDEFINED.,.F.,$);
ENDSEC;
END-ISO-10303-21;
";
        let inventory = IfcSource::parse(content, MissingKeyPolicy::Fail).unwrap();

        assert_eq!(
            inventory.system_types,
            vec![SystemFamilyTypeRecord::new("Basic Wall", "Generic")]
        );
        assert_eq!(
            inventory.user_families,
            vec![UserFamilyRecord::new("Doors", "Door-A", ["36in"])]
        );
    }

    #[test]
    fn splits_at_first_colon_only() {
        assert_eq!(split_type_name("M_Door:915 x 2134:A"), (Some("M_Door"), "915 x 2134:A"));
        assert_eq!(split_type_name(":Orphan"), (None, "Orphan"));
        assert_eq!(split_type_name(" Desk "), (None, "Desk"));
    }

    #[test]
    fn missing_file_is_missing_input() {
        let err = IfcSource::new("/nonexistent/model.ifc")
            .load(MissingKeyPolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingInput { .. }));
    }

    #[test]
    fn not_a_step_file_is_invalid() {
        let err = IfcSource::parse("{\"json\": true}", MissingKeyPolicy::Skip).unwrap_err();
        assert!(matches!(err, SourceError::InvalidStep { .. }));
    }
}
