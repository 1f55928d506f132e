use crate::commands::{print_json, resolve_actor, Context};
use crate::error::invalid_input;
use crate::util::{local_offset, now_utc};
use anyhow::{Context as _, Result};
use clap::Args;
use leadline_core::dto::ImportRowDto;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file: an array of lead rows, or `{"leads": [...]}`
    pub file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Rows(Vec<ImportRowDto>),
    Wrapped { leads: Vec<ImportRowDto> },
}

pub fn import_leads(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let actor = resolve_actor(ctx)?;
    let contents = fs::read_to_string(&args.file)
        .with_context(|| format!("read import file {}", args.file.display()))?;
    let rows = match serde_json::from_str::<ImportFile>(&contents) {
        Ok(ImportFile::Rows(rows)) => rows,
        Ok(ImportFile::Wrapped { leads }) => leads,
        Err(err) => {
            return Err(invalid_input(format!(
                "parse import file {}: {}",
                args.file.display(),
                err
            )))
        }
    };

    let report = ctx
        .store
        .leads()
        .import_batch(now_utc(), local_offset(), &actor, &rows)?;

    if ctx.json {
        print_json(&report)?;
        return Ok(());
    }

    println!(
        "received {}  valid {}  inserted {}  skipped {}  invalid {}",
        report.received,
        report.valid,
        report.inserted,
        report.skipped_existing,
        report.invalid.len()
    );
    for row in &report.invalid {
        println!("  row {}: {} ({})", row.row, row.mobile, row.reason);
    }
    Ok(())
}
