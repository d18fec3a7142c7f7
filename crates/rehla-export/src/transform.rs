//! Declarative column transforms over a CSV buffer.
//!
//! Parsing and quoting are delegated to the `csv` crate, which round-trips
//! RFC-4180 quoting (quotes doubled inside quoted fields; fields containing
//! comma, quote, or newline quoted on output). The transformed buffer is
//! prefixed with a UTF-8 byte-order mark so spreadsheet software opens it
//! with the right encoding.

use std::fmt;

/// UTF-8 byte-order mark prepended to every transformed buffer.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export buffer is not valid CSV: {0}")]
    Malformed(String),
}

/// One data row, addressable by original (pre-rename) column name.
pub struct Row<'a> {
    headers: &'a [String],
    fields: &'a [String],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }
}

type DeriveFn = Box<dyn Fn(&Row) -> String + Send + Sync>;

/// A single column transform, applied in declaration order.
pub enum ColumnTransform {
    /// Rename a header (exact match); field values are untouched.
    Rename { from: String, to: String },
    /// Drop a column and its values.
    Drop { column: String },
    /// Append a new column computed from each row (rows are addressed by
    /// their original column names).
    Derive { name: String, derive: DeriveFn },
}

impl ColumnTransform {
    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        ColumnTransform::Rename {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn drop_column(column: impl Into<String>) -> Self {
        ColumnTransform::Drop {
            column: column.into(),
        }
    }

    pub fn derive(
        name: impl Into<String>,
        derive: impl Fn(&Row) -> String + Send + Sync + 'static,
    ) -> Self {
        ColumnTransform::Derive {
            name: name.into(),
            derive: Box::new(derive),
        }
    }
}

impl fmt::Debug for ColumnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTransform::Rename { from, to } => f
                .debug_struct("Rename")
                .field("from", from)
                .field("to", to)
                .finish(),
            ColumnTransform::Drop { column } => {
                f.debug_struct("Drop").field("column", column).finish()
            }
            ColumnTransform::Derive { name, .. } => {
                f.debug_struct("Derive").field("name", name).finish()
            }
        }
    }
}

/// Applies a transform list to a raw CSV buffer.
#[derive(Debug, Default)]
pub struct ExportTransformer {
    transforms: Vec<ColumnTransform>,
}

impl ExportTransformer {
    pub fn new(transforms: Vec<ColumnTransform>) -> Self {
        Self { transforms }
    }

    /// Identity transformer: re-encodes the buffer and adds the BOM.
    pub fn identity() -> Self {
        Self::new(Vec::new())
    }

    /// Transform `input` (UTF-8 CSV, with or without a leading BOM) into a
    /// BOM-prefixed CSV buffer with the transforms applied.
    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>, ExportError> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(input);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // Resolve the output shape once against the original headers.
        let mut kept_indices: Vec<usize> = (0..headers.len()).collect();
        let mut output_names: Vec<String> = headers.clone();
        let mut derived: Vec<(&str, &DeriveFn)> = Vec::new();

        for transform in &self.transforms {
            match transform {
                ColumnTransform::Rename { from, to } => {
                    for (pos, &idx) in kept_indices.iter().enumerate() {
                        if headers[idx] == *from {
                            output_names[pos] = to.clone();
                        }
                    }
                }
                ColumnTransform::Drop { column } => {
                    let mut pos = 0;
                    kept_indices.retain(|&idx| {
                        let keep = headers[idx] != *column;
                        if !keep {
                            output_names.remove(pos);
                        } else {
                            pos += 1;
                        }
                        keep
                    });
                }
                ColumnTransform::Derive { name, derive } => {
                    derived.push((name.as_str(), derive));
                }
            }
        }

        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header_row: Vec<&str> = output_names.iter().map(String::as_str).collect();
        header_row.extend(derived.iter().map(|(name, _)| *name));
        writer.write_record(&header_row)?;

        for record in reader.records() {
            let record = record?;
            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            let row = Row {
                headers: &headers,
                fields: &fields,
            };

            let mut out: Vec<String> = kept_indices
                .iter()
                .map(|&idx| fields.get(idx).cloned().unwrap_or_default())
                .collect();
            for (_, derive) in &derived {
                out.push(derive(&row));
            }
            writer.write_record(&out)?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| ExportError::Malformed(e.to_string()))?;

        let mut output = Vec::with_capacity(UTF8_BOM.len() + body.len());
        output.extend_from_slice(UTF8_BOM);
        output.extend_from_slice(&body);
        Ok(output)
    }
}
