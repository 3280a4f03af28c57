use clap::ValueEnum;
use colored::Colorize;

use crate::cli::input::Record;
use crate::core::edit::{Edit, Reconciliation};
use crate::surface::SurfaceEvent;
use crate::utils::{truncate, KEY_PREVIEW_LEN};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output with colors
    #[default]
    Pretty,
    /// JSON output for machine consumption
    Json,
}

/// Format a reconciliation for display
pub fn format_reconciliation(
    result: &Reconciliation,
    old: &[Record],
    new: &[Record],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Pretty => format_reconciliation_pretty(result, old, new),
        OutputFormat::Json => format_reconciliation_json(result, old, new),
    }
}

/// Key of the row an edit is about
fn edit_key<'a>(edit: &Edit, old: &'a [Record], new: &'a [Record]) -> &'a str {
    let record = match *edit {
        Edit::Delete { index } => old.get(index),
        Edit::Move { from, .. } => old.get(from),
        Edit::Insert { index } | Edit::Replace { index } => new.get(index),
    };
    record.map(Record::key).unwrap_or("?")
}

fn format_reconciliation_pretty(result: &Reconciliation, old: &[Record], new: &[Record]) -> String {
    let script = match result {
        Reconciliation::Incremental(script) => script,
        Reconciliation::Reload => {
            return format!(
                "{} ({} → {} rows, one side empty)\n",
                "Full reload".bold(),
                old.len(),
                new.len()
            );
        }
    };

    if script.is_empty() {
        return format!("{}\n", "No changes".dimmed());
    }

    let mut output = String::new();

    for edit in script {
        let key = truncate(edit_key(edit, old, new), KEY_PREVIEW_LEN);
        let line = match *edit {
            Edit::Delete { index } => {
                format!("  {}  {:>5}        {}\n", "DELETE ".red(), index, key)
            }
            Edit::Insert { index } => {
                format!("  {}        {:>5}  {}\n", "INSERT ".green(), index, key)
            }
            Edit::Move { from, to } => {
                format!("  {}  {:>5} → {:>5}  {}\n", "MOVE   ".yellow(), from, to, key)
            }
            Edit::Replace { index } => {
                format!("  {}        {:>5}  {}\n", "REPLACE".blue(), index, key)
            }
        };
        output.push_str(&line);
    }

    output.push_str(&format!("{}\n", "─".repeat(40).dimmed()));
    output.push_str(&format!(
        "{} inserted, {} deleted, {} moved, {} replaced\n",
        script.insertions(),
        script.deletions(),
        script.moves(),
        script.replacements()
    ));

    output
}

fn format_reconciliation_json(result: &Reconciliation, old: &[Record], new: &[Record]) -> String {
    let value = match result {
        Reconciliation::Reload => serde_json::json!({
            "should_diff": false,
            "old_rows": old.len(),
            "new_rows": new.len(),
        }),
        Reconciliation::Incremental(script) => {
            let edits: Vec<serde_json::Value> = script
                .iter()
                .map(|edit| {
                    let mut value = serde_json::to_value(edit).unwrap_or_default();
                    if let Some(obj) = value.as_object_mut() {
                        obj.insert("key".to_string(), edit_key(edit, old, new).into());
                    }
                    value
                })
                .collect();

            serde_json::json!({
                "should_diff": true,
                "old_rows": old.len(),
                "new_rows": new.len(),
                "edits": edits,
                "summary": {
                    "inserted": script.insertions(),
                    "deleted": script.deletions(),
                    "moved": script.moves(),
                    "replaced": script.replacements(),
                }
            })
        }
    };

    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Format the table state after an apply run
pub fn format_apply(rows: &[String], events: &[SurfaceEvent], format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => format_apply_pretty(rows, events),
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "rows": rows,
            "events": events,
        }))
        .unwrap_or_else(|_| "{}".to_string()),
    }
}

fn format_apply_pretty(rows: &[String], events: &[SurfaceEvent]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "Surface events:".bold()));
    for event in events {
        let line = match event {
            SurfaceEvent::FullReload { rows } => format!("  full reload ({} rows)\n", rows),
            SurfaceEvent::Batch {
                deleted,
                inserted,
                moved,
                reloaded,
                ..
            } => format!(
                "  batch: {} deleted, {} inserted, {} moved, {} reloaded\n",
                deleted.len(),
                inserted.len(),
                moved.len(),
                reloaded.len()
            ),
        };
        output.push_str(&line);
    }

    output.push_str(&format!("\n{}\n", "Rows:".bold()));
    for (index, key) in rows.iter().enumerate() {
        output.push_str(&format!(
            "  {} {}\n",
            format!("{:>5}", index).dimmed(),
            truncate(key, KEY_PREVIEW_LEN)
        ));
    }

    output
}
