pub mod csv;
pub mod json;
pub mod xml;

pub use crate::error::ExportError;
pub use csv::export_csv;
pub use json::export_snapshot;
pub use xml::{parse_report, to_xml_string, write_report};
