pub mod document;
pub mod group;
pub mod records;

pub use document::{ReportDocument, ReportNode, ReportRow};
pub use group::CategoryGroup;
pub use records::{FamilyInventory, SystemFamilyTypeRecord, UserFamilyRecord};
