use crate::config::ReportLabels;
use crate::error::ExportError;
use crate::model::ReportDocument;
use std::fs::File;
use std::path::Path;

/// Writes one row per report leaf: `Section,Category,Family,Type`.
///
/// System family rows leave `Family` empty since their category key is
/// already the family name. A user family with no types leaves `Type` empty.
pub fn export_csv<P: AsRef<Path>>(
    document: &ReportDocument,
    labels: &ReportLabels,
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Section", "Category", "Family", "Type"])?;

    for row in document.rows() {
        let is_system = row.section == labels.system_families;
        let (category, family, type_name) = match row.path.as_slice() {
            [category, family, type_name] => (*category, *family, *type_name),
            [category, type_name] if is_system => (*category, "", *type_name),
            [category, family] => (*category, *family, ""),
            // A category with no members never reaches the tree.
            _ => continue,
        };
        writer.write_record([row.section, category, family, type_name])?;
    }

    writer.flush().map_err(|e| ExportError::Write {
        message: e.to_string(),
    })?;

    tracing::info!(path = %path_ref.display(), "wrote CSV export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::model::{SystemFamilyTypeRecord, UserFamilyRecord};
    use crate::report::build_report;
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_both_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let config = ReportConfig::default();
        let users = vec![
            UserFamilyRecord::new("Doors", "Door-B", ["30in", "32in"]),
            UserFamilyRecord::new("Generic Models", "Marker", Vec::<String>::new()),
        ];
        let system = vec![SystemFamilyTypeRecord::new("Basic Wall", "Generic, 200mm")];
        let doc = build_report(&users, &system, &config);

        export_csv(&doc, &config.labels, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Section,Category,Family,Type\n\
             UserFamilies,Doors,Door-B,30in\n\
             UserFamilies,Doors,Door-B,32in\n\
             UserFamilies,Generic Models,Marker,\n\
             SystemFamilies,Basic Wall,,\"Generic, 200mm\"\n"
        );
    }
}
