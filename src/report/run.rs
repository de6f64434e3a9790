use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::export::write_report;
use crate::model::{FamilyInventory, ReportDocument};
use crate::report::build_report;
use crate::source::FamilySource;
use std::path::PathBuf;

/// Counts describing a written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub categories: usize,
    pub user_families: usize,
    pub user_types: usize,
    pub system_types: usize,
}

/// What a report run loaded and wrote, kept for further exports.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub summary: ReportSummary,
    pub inventory: FamilyInventory,
    pub document: ReportDocument,
}

/// Runs one report invocation: load records, build the tree, write the XML.
///
/// The source is loaded exactly once. Fails without retrying on the first
/// error. The output file is only touched once the records have loaded.
pub fn generate_report<S>(source: &S, config: &ReportConfig) -> Result<GeneratedReport, ReportError>
where
    S: FamilySource + ?Sized,
{
    config.validate()?;

    tracing::info!(source = %source.describe(), "loading family records");
    let inventory = source.load(config.missing_key_policy)?;

    let document = build_report(&inventory.user_families, &inventory.system_types, config);
    write_report(&document, &config.output)?;

    let categories = document.root.children.iter().map(|s| s.children.len()).sum();
    let summary = ReportSummary {
        output: config.output.clone(),
        categories,
        user_families: inventory.user_families.len(),
        user_types: inventory.total_user_types(),
        system_types: inventory.system_types.len(),
    };

    tracing::info!(
        output = %summary.output.display(),
        categories = summary.categories,
        user_families = summary.user_families,
        system_types = summary.system_types,
        "report written"
    );

    Ok(GeneratedReport {
        summary,
        inventory,
        document,
    })
}
