//! Delimited-text sample source.
//!
//! Each data line holds the features separated by a fixed separator. The true
//! label is either the last field of the line or, when a separate label source
//! is given, the matching line of that source.
//!
//! The first label read decides how labels are interpreted: numeric labels
//! (`-?\d+(\.\d+)?`) are truncated to integers, anything else switches the
//! reader to enumeration, where each distinct name gets the next integer in
//! first-seen order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use streams_evals::Label;
use tracing::debug;

use crate::error::{Result, StreamsError};
use crate::sample::Sample;

#[derive(Debug)]
enum LabelMode {
    Numeric,
    Enumerated(HashMap<String, Label>),
}

/// Lazy, finite, non-restartable stream of [`Sample`]s read from text.
pub struct StreamsReader {
    separator: String,
    data: Box<dyn BufRead>,
    labels: Option<Box<dyn BufRead>>,
    mode: Option<LabelMode>,
    line: usize,
    read: u64,
    done: bool,
}

impl std::fmt::Debug for StreamsReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamsReader")
            .field("separator", &self.separator)
            .field("separate_labels", &self.labels.is_some())
            .field("line", &self.line)
            .field("done", &self.done)
            .finish()
    }
}

impl StreamsReader {
    /// Reader whose lines end with the label field.
    pub fn new(data: impl BufRead + 'static, separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            data: Box::new(data),
            labels: None,
            mode: None,
            line: 0,
            read: 0,
            done: false,
        }
    }

    /// Reader taking labels line-by-line from a second source.
    pub fn with_labels(
        data: impl BufRead + 'static,
        labels: impl BufRead + 'static,
        separator: impl Into<String>,
    ) -> Self {
        let mut reader = Self::new(data, separator);
        reader.labels = Some(Box::new(labels));
        reader
    }

    /// Open a data file whose lines end with the label field.
    pub fn open(path: impl AsRef<Path>, separator: impl Into<String>) -> Result<Self> {
        let data = BufReader::new(File::open(path.as_ref())?);
        debug!(path = %path.as_ref().display(), "opened sample file");
        Ok(Self::new(data, separator))
    }

    /// Open a data file and a parallel label file.
    pub fn open_with_labels(
        data: impl AsRef<Path>,
        labels: impl AsRef<Path>,
        separator: impl Into<String>,
    ) -> Result<Self> {
        let data_file = BufReader::new(File::open(data.as_ref())?);
        let label_file = BufReader::new(File::open(labels.as_ref())?);
        debug!(
            data = %data.as_ref().display(),
            labels = %labels.as_ref().display(),
            "opened sample and label files"
        );
        Ok(Self::with_labels(data_file, label_file, separator))
    }

    /// Pull up to `n` samples, stopping early at end of stream.
    pub fn next_batch(&mut self, n: usize) -> Result<Vec<Sample>> {
        self.by_ref().take(n).collect()
    }

    /// Number of samples produced so far.
    #[must_use]
    pub fn samples_read(&self) -> u64 {
        self.read
    }

    fn read_sample(&mut self) -> Result<Option<Sample>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.data.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !buf.trim().is_empty() {
                break;
            }
        }
        let line = self.line;

        let fields: Vec<&str> = buf
            .trim_end_matches(['\n', '\r'])
            .split(self.separator.as_str())
            .collect();

        let (features, raw_label) = match self.labels.as_mut() {
            Some(labels) => {
                let mut label_buf = String::new();
                if labels.read_line(&mut label_buf)? == 0 {
                    return Err(StreamsError::MissingLabel { line });
                }
                (&fields[..], label_buf.trim().to_string())
            }
            None => {
                let (label, features) = fields
                    .split_last()
                    .ok_or(StreamsError::MissingLabel { line })?;
                (features, label.trim().to_string())
            }
        };

        let x = features
            .iter()
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| StreamsError::InvalidFeature {
                        line,
                        value: field.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        let y = self.resolve_label(&raw_label, line)?;
        let sample = Sample::labeled(x, y).with_time(self.read);
        self.read += 1;
        Ok(Some(sample))
    }

    fn resolve_label(&mut self, raw: &str, line: usize) -> Result<Label> {
        let mode = self.mode.get_or_insert_with(|| {
            if is_numeric(raw) {
                LabelMode::Numeric
            } else {
                debug!(label = raw, "non-numeric label, enumerating labels");
                LabelMode::Enumerated(HashMap::new())
            }
        });

        match mode {
            LabelMode::Numeric => raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(|value| value.trunc() as Label)
                .ok_or_else(|| StreamsError::InvalidLabel {
                    line,
                    value: raw.to_string(),
                }),
            LabelMode::Enumerated(names) => {
                let next = names.len() as Label;
                Ok(*names.entry(raw.to_string()).or_insert(next))
            }
        }
    }
}

impl Iterator for StreamsReader {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_sample() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Matches `-?\d+(\.\d+)?`.
fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}
