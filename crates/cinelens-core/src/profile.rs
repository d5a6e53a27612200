//! # Profile Module
//!
//! Column profiling for the dataset summary and head preview.
//!
//! A [`TableProfile`] is collected while a table is decoded, so the summary
//! reflects the raw CSV text and not the typed records: every column of the
//! header is present, including ones the typed decoder ignores.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// COLUMN KIND
// =============================================================================

/// Inferred storage kind of a column.
///
/// Kinds only widen while rows are observed: `Int64` -> `Float64` -> `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Int64,
    Float64,
    Object,
}

impl ColumnKind {
    /// Infer the narrowest kind of a single non-empty field.
    fn of_field(field: &str) -> Self {
        if field.parse::<i64>().is_ok() {
            Self::Int64
        } else if field.parse::<f64>().is_ok() {
            Self::Float64
        } else {
            Self::Object
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

// =============================================================================
// PROFILES
// =============================================================================

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
}

impl ColumnProfile {
    /// Number of empty fields in this column.
    #[must_use]
    pub fn null_count(&self, row_count: usize) -> usize {
        row_count.saturating_sub(self.non_null)
    }
}

/// Summary of one table: shape, column kinds, null counts and head rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProfile {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
    /// First rows exactly as read, one string per column.
    pub head: Vec<Vec<String>>,
}

impl TableProfile {
    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render the dataset summary block.
    #[must_use]
    pub fn summary_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} DataFrame Info:\n", capitalize(&self.name)));
        output.push_str(&format!(
            "RangeIndex: {} entries, 0 to {}\n",
            self.row_count,
            self.row_count.saturating_sub(1)
        ));
        output.push_str(&format!(
            "Data columns (total {} columns):\n",
            self.column_count()
        ));

        let name_width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        // Header cells share the widths of the value cells below them.
        let count_width = COUNT_WIDTH + NON_NULL_SUFFIX.len();
        output.push_str(&format!(
            " {:<3} {:<name_width$}  {:<count_width$}  {:>NULLS_WIDTH$}  Dtype\n",
            "#", "Column", "Non-Null Count", "Nulls"
        ));
        for (i, column) in self.columns.iter().enumerate() {
            output.push_str(&format!(
                " {:<3} {:<name_width$}  {:>COUNT_WIDTH$}{NON_NULL_SUFFIX}  {:>NULLS_WIDTH$}  {}\n",
                i,
                column.name,
                column.non_null,
                column.null_count(self.row_count),
                column.kind
            ));
        }

        let mut kinds = std::collections::BTreeMap::new();
        for column in &self.columns {
            *kinds.entry(column.kind).or_insert(0usize) += 1;
        }
        let dtypes = kinds
            .iter()
            .map(|(kind, n)| format!("{}({})", kind, n))
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!("dtypes: {}\n", dtypes));
        output
    }

    /// Render the head preview block.
    #[must_use]
    pub fn head_text(&self) -> String {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let index_width = self.head.len().saturating_sub(1).to_string().len();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, name)| {
                self.head
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|field| field.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(name.chars().count())
            })
            .collect();

        let mut output = format!("{} Head:\n", capitalize(&self.name));
        output.push_str(&" ".repeat(index_width));
        for (name, width) in headers.iter().zip(&widths) {
            output.push_str(&format!("  {:>width$}", name, width = *width));
        }
        output.push('\n');

        for (i, row) in self.head.iter().enumerate() {
            output.push_str(&format!("{:<index_width$}", i));
            for (col, width) in widths.iter().enumerate() {
                let field = row.get(col).map(String::as_str).unwrap_or("");
                output.push_str(&format!("  {:>width$}", field, width = *width));
            }
            output.push('\n');
        }
        output
    }
}

const COUNT_WIDTH: usize = 8;
const NON_NULL_SUFFIX: &str = " non-null";
const NULLS_WIDTH: usize = 5;

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// PROFILER
// =============================================================================

/// Incremental builder for a [`TableProfile`].
#[derive(Debug)]
pub(crate) struct Profiler {
    name: String,
    head_rows: usize,
    row_count: usize,
    names: Vec<String>,
    kinds: Vec<Option<ColumnKind>>,
    non_null: Vec<usize>,
    head: Vec<Vec<String>>,
}

impl Profiler {
    pub(crate) fn new(name: &str, headers: &csv::StringRecord, head_rows: usize) -> Self {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let width = names.len();
        Self {
            name: name.to_string(),
            head_rows,
            row_count: 0,
            names,
            kinds: vec![None; width],
            non_null: vec![0; width],
            head: Vec::with_capacity(head_rows),
        }
    }

    /// Fold one raw record into the profile.
    pub(crate) fn observe(&mut self, record: &csv::StringRecord) {
        for (col, field) in record.iter().enumerate().take(self.names.len()) {
            if field.is_empty() {
                continue;
            }
            self.non_null[col] += 1;
            let kind = ColumnKind::of_field(field);
            self.kinds[col] = Some(match self.kinds[col] {
                Some(seen) => seen.max(kind),
                None => kind,
            });
        }
        if self.head.len() < self.head_rows {
            self.head.push(record.iter().map(str::to_string).collect());
        }
        self.row_count += 1;
    }

    pub(crate) fn finish(self) -> TableProfile {
        let columns = self
            .names
            .into_iter()
            .zip(self.kinds)
            .zip(self.non_null)
            .map(|((name, kind), non_null)| ColumnProfile {
                name,
                kind: kind.unwrap_or(ColumnKind::Object),
                non_null,
            })
            .collect();
        TableProfile {
            name: self.name,
            row_count: self.row_count,
            columns,
            head: self.head,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
