//! # Family Report
//!
//! Builds an inventory of BIM families and family types grouped by category
//! and writes it as an XML report.
//!
//! ## Features
//!
//! - Load records from a JSON snapshot or an IFC (IFC2x3 / IFC4) file
//! - Group user families (category → family → type) and system family
//!   types (family name → type) in first-seen order
//! - Write the report as XML, or flatten it to CSV
//! - Read a written report back for verification
//!
//! ## Example
//!
//! ```no_run
//! use family_report::config::ReportConfig;
//! use family_report::report::generate_report;
//! use family_report::source::IfcSource;
//!
//! let config = ReportConfig::default();
//! let generated = generate_report(&IfcSource::new("model.ifc"), &config)?;
//! println!("Categories: {}", generated.summary.categories);
//! # Ok::<(), family_report::error::ReportError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod source;
