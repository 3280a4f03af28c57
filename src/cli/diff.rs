use anyhow::Result;
use clap::Args;

use crate::cli::input::load_records;
use crate::cli::output::{format_reconciliation, OutputFormat};
use crate::cli::{load_config, InputArgs};

/// Diff command arguments
#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Run the diff command
pub fn run(args: DiffArgs) -> Result<()> {
    let config = args.input.apply_to(load_config()?);
    let key_field = &config.diff.key_field;

    let old = load_records(&args.input.old, key_field)?;
    let new = load_records(&args.input.new, key_field)?;

    let result = config.diff.reconciler().reconcile(&old, &new)?;

    print!("{}", format_reconciliation(&result, &old, &new, args.format));
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}
