use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use family_report::config::{load_config_from, MissingKeyPolicy, ReportConfig};
use family_report::export::{export_csv, export_snapshot};
use family_report::report::generate_report;
use family_report::source::{FamilySource, IfcSource, SnapshotSource};

#[derive(Parser, Debug)]
#[command(name = "family-report")]
#[command(about = "Family Report - list families and family types by category as XML")]
#[command(version)]
struct Args {
    /// Model to read: an .ifc file or a JSON snapshot
    #[arg(required = true)]
    input: PathBuf,

    /// XML report path (overwritten)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also export the report as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Also dump the loaded records as a JSON snapshot
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// TOML file with output path, comment and element labels
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail on system family types without a family name instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "family_report=info",
        1 => "family_report=debug",
        _ => "family_report=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => ReportConfig::default(),
    };
    if let Some(output) = &args.output {
        config.output.clone_from(output);
    }
    if args.strict {
        config.missing_key_policy = MissingKeyPolicy::Fail;
    }

    let is_ifc = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ifc"));
    let source: Box<dyn FamilySource> = if is_ifc {
        Box::new(IfcSource::new(&args.input))
    } else {
        Box::new(SnapshotSource::new(&args.input))
    };

    let generated = generate_report(source.as_ref(), &config)?;
    let summary = &generated.summary;
    println!(
        "Wrote {} ({} categories, {} families / {} types, {} system types)",
        summary.output.display(),
        summary.categories,
        summary.user_families,
        summary.user_types,
        summary.system_types
    );

    if let Some(csv_path) = &args.csv {
        export_csv(&generated.document, &config.labels, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(snapshot_path) = &args.snapshot {
        export_snapshot(&generated.inventory, snapshot_path)?;
        println!("Exported snapshot: {}", snapshot_path.display());
    }

    Ok(())
}
