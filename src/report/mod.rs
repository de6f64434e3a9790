pub mod builder;
pub mod run;

pub use builder::{build_report, group_system_types, group_user_families};
pub use run::{generate_report, GeneratedReport, ReportSummary};
