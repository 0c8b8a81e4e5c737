//! Samples command: stream a sample file and summarize its labels.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use streams_core::{Sample, StreamsReader};
use streams_evals::Label;

use crate::config::StreamsConfig;

/// Samples arguments.
#[derive(Args, Debug)]
pub struct SamplesArgs {
    /// Delimited sample file
    pub data: PathBuf,

    /// Separate file with one label per line
    #[arg(short, long)]
    pub labels: Option<PathBuf>,

    /// Field separator (defaults to the configured separator)
    #[arg(short, long)]
    pub separator: Option<String>,
}

/// Label counts and feature dimension of a sample stream.
#[derive(Debug, Default, PartialEq)]
pub struct StreamSummary {
    pub samples: u64,
    pub dimension: Option<usize>,
    pub labels: BTreeMap<Label, u64>,
}

impl StreamSummary {
    fn observe(&mut self, sample: &Sample) {
        self.samples += 1;
        self.dimension.get_or_insert(sample.dimension());
        if let Some(label) = sample.y {
            *self.labels.entry(label).or_default() += 1;
        }
    }
}

/// Run samples command.
pub fn run(args: SamplesArgs, config: &StreamsConfig) -> Result<()> {
    let separator = args
        .separator
        .unwrap_or_else(|| config.reader.separator.clone());

    let reader = match &args.labels {
        Some(labels) => StreamsReader::open_with_labels(&args.data, labels, separator),
        None => StreamsReader::open(&args.data, separator),
    }
    .with_context(|| format!("failed to open {}", args.data.display()))?;

    let summary = summarize(reader)?;

    println!("Samples:   {}", summary.samples);
    if let Some(dimension) = summary.dimension {
        println!("Features:  {dimension}");
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Samples").fg(Color::Cyan),
    ]);
    for (label, count) in &summary.labels {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{table}");

    Ok(())
}

/// Drain a sample source into a [`StreamSummary`].
pub fn summarize(samples: impl IntoIterator<Item = streams_core::Result<Sample>>) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();
    for sample in samples {
        summary.observe(&sample?);
    }
    Ok(summary)
}
