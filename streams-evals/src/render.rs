//! Fixed-width text rendering of the matrix for logs.
//!
//! ```text
//!          |CK     1|CK     2|PN     0| UNKNOWN|
//! |CK     1|       6|       1|       1|       0|
//! |CN     3|       0|       1|       5|       2|
//! ```
//!
//! Known columns follow the row order of their labels, novelty columns carry
//! their discovery index, and the unknown column comes last. Row labels are
//! tagged `CK` when also a known column and `CN` otherwise.

use std::fmt;

use crate::matrix::DynamicConfusionMatrix;
use crate::types::Label;

impl DynamicConfusionMatrix {
    /// Known labels sorted by the position of their row.
    fn known_labels_by_row(&self) -> Vec<Label> {
        let mut labels = self.known.labels().to_vec();
        labels.sort_by_key(|&label| self.rows.index_of(label).unwrap_or(usize::MAX));
        labels
    }
}

impl fmt::Display for DynamicConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known_columns = self.known_labels_by_row();

        write!(f, "{:9}", "")?;
        for label in &known_columns {
            write!(f, "|CK{label:6}")?;
        }
        for &pattern in self.novelty.labels() {
            let index = self.novelty.index_of(pattern).unwrap_or_default();
            write!(f, "|PN{index:6}")?;
        }
        writeln!(f, "| UNKNOWN|")?;

        for (row, &label) in self.rows.labels().iter().enumerate() {
            let tag = if self.is_known(label) { "CK" } else { "CN" };
            write!(f, "|{tag}{label:6}")?;

            for &column_label in &known_columns {
                let count = self
                    .known
                    .index_of(column_label)
                    .map_or(0, |column| self.known_cells[row][column]);
                write!(f, "|  {count:6}")?;
            }
            for &pattern in self.novelty.labels() {
                let count = self
                    .novelty
                    .index_of(pattern)
                    .map_or(0, |column| self.novelty_cells[row][column]);
                write!(f, "|  {count:6}")?;
            }
            writeln!(f, "|  {:6}|", self.unknown[row])?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits a rendered line into its `|`-separated fields.
    fn fields(line: &str) -> Vec<String> {
        line.trim_end_matches('|')
            .split('|')
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    fn parse_tagged(field: &str) -> (String, i64) {
        let (tag, value) = field.split_at(2);
        (tag.to_string(), value.trim().parse().unwrap())
    }

    #[test]
    fn empty_matrix_renders_header_only() {
        let rendered = DynamicConfusionMatrix::new().to_string();
        assert_eq!(rendered, "         | UNKNOWN|\n");
    }

    #[test]
    fn render_formats_fixed_width_cells() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1]);
        matrix.record_prediction(1, 1, false).unwrap();
        matrix.record_prediction(2, 40, true).unwrap();
        matrix.record_deferral(2);

        let rendered = matrix.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "         |CK     1|PN     0| UNKNOWN|");
        assert_eq!(lines[1], "|CK     1|       1|       0|       0|");
        assert_eq!(lines[2], "|CN     2|       0|       1|       1|");
    }

    #[test]
    fn known_columns_follow_row_order() {
        let mut matrix = DynamicConfusionMatrix::new();
        matrix.record_deferral(2);
        matrix.register_known(1);
        matrix.register_known(2);

        let rendered = matrix.to_string();
        let header = rendered.lines().next().unwrap();

        assert_eq!(header, "         |CK     2|CK     1| UNKNOWN|");
    }

    #[test]
    fn negative_unknown_counts_render() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([5]);
        matrix.resolve_deferred(5, 5, false).unwrap();

        let rendered = matrix.to_string();

        assert!(rendered.lines().nth(1).unwrap().ends_with("|      -1|"));
    }

    #[test]
    fn rendered_counts_parse_back_to_cells() {
        let mut matrix = DynamicConfusionMatrix::with_known_labels([1, 2]);
        let events = [
            (1, 1, false),
            (1, 2, false),
            (2, 2, false),
            (3, 77, true),
            (3, 77, true),
            (1, 88, true),
            (3, 2, false),
        ];
        for (real, predicted, novel) in events {
            matrix.record_prediction(real, predicted, novel).unwrap();
        }
        matrix.record_deferral(2);
        matrix.record_deferral(4);

        let rendered = matrix.to_string();
        let mut lines = rendered.lines();
        let header = fields(lines.next().unwrap());
        let known = matrix.known_labels().len();
        let novel = matrix.novelty_labels().len();
        assert_eq!(header.len(), known + novel + 1);

        let known_headers: Vec<Label> = header[..known]
            .iter()
            .map(|field| parse_tagged(field).1 as Label)
            .collect();
        let novelty_headers: Vec<usize> = header[known..known + novel]
            .iter()
            .map(|field| parse_tagged(field).1 as usize)
            .collect();
        assert_eq!(header[known + novel], " UNKNOWN");

        let mut rows_seen = 0;
        for line in lines {
            let cells = fields(line);
            let (tag, label) = parse_tagged(&cells[0]);
            let label = label as Label;
            assert_eq!(tag == "CK", matrix.is_known(label));

            for (offset, &column) in known_headers.iter().enumerate() {
                let value: u64 = cells[1 + offset].trim().parse().unwrap();
                assert_eq!(Some(value), matrix.known_count(label, column));
            }
            for (offset, &index) in novelty_headers.iter().enumerate() {
                let pattern = matrix.novelty_labels()[index];
                let value: u64 = cells[1 + known + offset].trim().parse().unwrap();
                assert_eq!(Some(value), matrix.novelty_count(label, pattern));
            }
            let unknown: i64 = cells[1 + known + novel].trim().parse().unwrap();
            assert_eq!(Some(unknown), matrix.unknown_count(label));
            rows_seen += 1;
        }

        assert_eq!(rows_seen, matrix.row_labels().len());
    }
}
