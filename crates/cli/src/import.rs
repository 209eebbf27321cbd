//! `csv2wp` import command: run the selected imports and present their reports.

use std::path::PathBuf;

use csv2wp_config::ImportConfig;
use csv2wp_import::{import_architects, import_buildings, ImportReport, RowOutcome};
use csv2wp_wp_client::{EntityKind, WpClient};

use crate::exit_codes::EXIT_ROW_ERRORS;
use crate::{CliError, ImportType};

pub struct ImportOptions {
    pub kind: ImportType,
    pub file: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
    pub strict: bool,
}

impl ImportType {
    /// Entities to import, in dependency order (architects before buildings).
    fn targets(&self) -> &'static [EntityKind] {
        match self {
            ImportType::Architects => &[EntityKind::Architects],
            ImportType::Buildings => &[EntityKind::Buildings],
            ImportType::All => &[EntityKind::Architects, EntityKind::Buildings],
        }
    }
}

pub fn cmd_import(opts: ImportOptions) -> Result<(), CliError> {
    // 1. Configuration
    let config = ImportConfig::from_env().map_err(CliError::config)?;
    tracing::debug!(?config, "configuration loaded");
    let client = WpClient::new(&config).map_err(|e| CliError::error(e.to_string()))?;

    if let (Some(file), ImportType::All) = (&opts.file, opts.kind) {
        tracing::warn!(path = %file.display(), "--file applies to both architects and buildings");
    }

    // 2. Run each selected import; an abort keeps the reports already made
    let mut reports = Vec::new();
    let run = run_imports(&opts, &config, &client, &mut reports);

    // 3. Output
    if opts.json {
        let doc = serde_json::json!({
            "dry_run": opts.dry_run,
            "reports": reports,
            "error": run.as_ref().err().map(|e| e.message.as_str()),
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::error(format!("failed to serialize report: {}", e)))?;
        println!("{}", text);
    } else if run.is_ok() {
        println!();
        println!("Import process completed!");
    }
    run?;

    let failed: usize = reports.iter().map(|r| r.summary.errors).sum();
    if opts.strict && failed > 0 {
        return Err(CliError {
            code: EXIT_ROW_ERRORS,
            message: format!("{} row(s) failed to import", failed),
            hint: Some("re-run without --strict to accept partial imports".to_string()),
        });
    }

    Ok(())
}

fn run_imports(
    opts: &ImportOptions,
    config: &ImportConfig,
    client: &WpClient,
    reports: &mut Vec<ImportReport>,
) -> Result<(), CliError> {
    for &entity in opts.kind.targets() {
        let path = opts.file.clone().unwrap_or_else(|| default_path(config, entity));

        if !path.is_file() {
            let message = format!("{} CSV file not found at {}", capitalize(entity.as_str()), path.display());
            if opts.kind == ImportType::All {
                tracing::error!(entity = %entity, path = %path.display(), "{}", message);
                continue;
            }
            return Err(CliError::error(message));
        }

        let report = match entity {
            EntityKind::Architects => import_architects(&path, opts.dry_run, client),
            EntityKind::Buildings => import_buildings(&path, opts.dry_run, client),
        }
        .map_err(CliError::import)?;

        if !opts.json {
            print_report(&report);
        }
        reports.push(report);
    }

    Ok(())
}

fn default_path(config: &ImportConfig, entity: EntityKind) -> PathBuf {
    match entity {
        EntityKind::Architects => config.architects_csv.clone(),
        EntityKind::Buildings => config.buildings_csv.clone(),
    }
}

/// Human summary on stdout.
fn print_report(report: &ImportReport) {
    let failures: Vec<_> = report
        .rows
        .iter()
        .filter_map(|r| match &r.outcome {
            RowOutcome::Failed { error, status, .. } => Some((r, error, status)),
            _ => None,
        })
        .collect();

    println!();
    println!(
        "{} import summary{}:",
        capitalize(report.entity.as_str()),
        if report.dry_run { " (dry run)" } else { "" },
    );
    println!("- Created: {}", report.summary.created);
    println!("- Updated: {}", report.summary.updated);
    println!("- Skipped: {}", report.summary.skipped);
    println!("- Errors:  {}", report.summary.errors);

    for (row, error, status) in failures {
        match status {
            Some(status) => println!("  row {} {}: {} (status {})", row.row, row.name, error, status),
            None => println!("  row {} {}: {}", row.row, row.name, error),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
