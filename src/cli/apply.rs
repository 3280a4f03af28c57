use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::input::{load_records, Record};
use crate::cli::output::{format_apply, OutputFormat};
use crate::cli::{load_config, InputArgs};
use crate::config::RowdiffConfig;
use crate::surface::{reload_rows, ReloadOptions, RenderSurface, RowTable, SurfaceEvent};

/// Apply command arguments
#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Result of replaying a reconciliation on a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Visible row keys after the update
    pub rows: Vec<String>,
    /// Events recorded by the table during the update
    pub events: Vec<SurfaceEvent>,
}

/// Load `old` into a table, then reconcile it to `new`
pub fn apply_records(old: &[Record], new: &[Record], config: &RowdiffConfig) -> Result<ApplyOutcome> {
    let model: Rc<RefCell<Vec<Record>>> = Rc::new(RefCell::new(old.to_vec()));

    let source = Rc::clone(&model);
    let mut table = RowTable::new(move || {
        source
            .borrow()
            .iter()
            .map(|r| r.key().to_string())
            .collect()
    });
    table.full_reload();
    table.take_events();

    let options = ReloadOptions::from_config(config);
    let target = Rc::clone(&model);
    reload_rows(&mut table, old, new, &options, &mut || {
        *target.borrow_mut() = new.to_vec();
    })
    .context("Failed to apply rows to table")?;

    Ok(ApplyOutcome {
        rows: table.rows().to_vec(),
        events: table.take_events(),
    })
}

/// Run the apply command
pub fn run(args: ApplyArgs) -> Result<()> {
    let config = args.input.apply_to(load_config()?);
    let key_field = &config.diff.key_field;

    let old = load_records(&args.input.old, key_field)?;
    let new = load_records(&args.input.new, key_field)?;

    let outcome = apply_records(&old, &new, &config)?;
    print!("{}", format_apply(&outcome.rows, &outcome.events, args.format));
    if args.format == OutputFormat::Json {
        println!();
    }

    let expected: Vec<&str> = new.iter().map(Record::key).collect();
    if outcome.rows != expected {
        anyhow::bail!(
            "Table rows do not match the new rows (got {} rows, expected {})",
            outcome.rows.len(),
            expected.len()
        );
    }

    Ok(())
}
