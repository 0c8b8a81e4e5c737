//! Eval command: replay a prediction log into a dynamic confusion matrix.
//!
//! The log holds one JSON [`MatrixEvent`] per line, e.g.
//!
//! ```text
//! {"op":"predict","real":1,"predicted":1}
//! {"op":"defer","real":3}
//! {"op":"resolve","real":3,"predicted":42,"novel":true}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use streams_evals::{DynamicConfusionMatrix, EvaluationReport, Label, MatrixEvent};
use tracing::{debug, info};

use crate::config::{OutputFormat, StreamsConfig};

/// Eval arguments.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Newline-delimited JSON prediction log
    pub log: PathBuf,

    /// Labels to register as known before replay (e.g. "1,2,3")
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub known: Vec<Label>,

    /// Events between progress log lines (0 disables)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Run eval command.
pub fn run(args: EvalArgs, config: &StreamsConfig) -> Result<()> {
    let known = if args.known.is_empty() {
        config.evaluation.known_labels.clone()
    } else {
        args.known
    };
    let interval = args.interval.unwrap_or(config.evaluation.log_interval);
    let format = args.format.unwrap_or(config.evaluation.format);

    let file = File::open(&args.log)
        .with_context(|| format!("failed to open prediction log {}", args.log.display()))?;

    let mut matrix = DynamicConfusionMatrix::with_known_labels(known);
    let events = replay(BufReader::new(file), &mut matrix, interval)?;
    info!(events, "replay finished");

    let report = EvaluationReport::from_matrix(&matrix)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            print!("{matrix}");
            println!();
            println!("{}", class_table(&report));
            println!("CER:  {:.6}", report.cer);
            println!("UnkR: {:.6}", report.unknown_rate);
        }
    }

    Ok(())
}

/// Apply every event in `log` to `matrix`, returning the number applied.
///
/// Blank lines are skipped. Progress is logged every `interval` events.
pub fn replay(
    log: impl BufRead,
    matrix: &mut DynamicConfusionMatrix,
    interval: u64,
) -> Result<u64> {
    let mut applied: u64 = 0;

    for (index, line) in log.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: MatrixEvent = serde_json::from_str(&line)
            .with_context(|| format!("line {line_no}: invalid event"))?;
        event
            .apply(matrix)
            .with_context(|| format!("line {line_no}: rejected {event:?}"))?;
        debug!(line = line_no, ?event, "applied event");

        applied += 1;
        if interval > 0 && applied % interval == 0 {
            info!(
                events = applied,
                cer = matrix.cer(),
                unknown_rate = matrix.unknown_rate(),
                "replay progress"
            );
        }
    }

    Ok(applied)
}

fn class_table(report: &EvaluationReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        [
            "Class",
            "Known",
            "Explained",
            "Unknown",
            "TP",
            "FP",
            "FN",
            "TN",
            "Novelties",
        ]
        .into_iter()
        .map(|title| Cell::new(title).fg(Color::Cyan)),
    );

    for class in &report.classes {
        let novelties = class
            .novelties
            .iter()
            .map(Label::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            Cell::new(class.label),
            Cell::new(if class.known { "yes" } else { "no" }),
            Cell::new(class.explained),
            Cell::new(class.unknown),
            Cell::new(class.contingency.true_positives),
            Cell::new(class.contingency.false_positives),
            Cell::new(class.contingency.false_negatives),
            Cell::new(class.contingency.true_negatives),
            Cell::new(novelties),
        ]);
    }

    table
}
