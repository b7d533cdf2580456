//! Per-row columns given either as a single value or as one value per spike train.
use super::value::Value;
use crate::error::ThornsError;

/// A column value supplied at construction, either shared by all rows or given row by row.
#[derive(Debug, PartialEq, Clone)]
pub enum Broadcast<T> {
    /// A single value replicated to every row.
    Scalar(T),
    /// One value per row, bound positionally.
    PerRow(Vec<T>),
}

impl<T: Clone> Broadcast<T> {
    /// Expands the column to exactly `num_rows` values.
    /// Returns an error if a per-row column has the wrong length.
    pub fn expand(self, name: &str, num_rows: usize) -> Result<Vec<T>, ThornsError> {
        match self {
            Broadcast::Scalar(value) => Ok(vec![value; num_rows]),
            Broadcast::PerRow(values) => {
                if values.len() != num_rows {
                    return Err(ThornsError::IncompatibleLength {
                        column: name.to_string(),
                        expected: num_rows,
                        found: values.len(),
                    });
                }
                Ok(values)
            }
        }
    }
}

impl Broadcast<Value> {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Broadcast::Scalar(value.into())
    }

    pub fn per_row<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Broadcast::PerRow(values.into_iter().map(Into::into).collect())
    }
}

impl From<f64> for Broadcast<f64> {
    fn from(duration: f64) -> Self {
        Broadcast::Scalar(duration)
    }
}

impl From<Vec<f64>> for Broadcast<f64> {
    fn from(durations: Vec<f64>) -> Self {
        Broadcast::PerRow(durations)
    }
}

/// Named metadata columns, in the order they were supplied.
///
/// # Examples
///
/// ```
/// use rusty_thorns::spike_train::{Broadcast, Metadata};
///
/// let meta = Metadata::new()
///     .with("cf", Broadcast::per_row([1000, 2000]))
///     .with("anf_type", Broadcast::scalar("hsr"));
/// assert_eq!(meta.len(), 2);
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Metadata {
    columns: Vec<(String, Broadcast<Value>)>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Metadata { columns: vec![] }
    }

    /// Adds a column.
    pub fn with(mut self, name: impl Into<String>, column: Broadcast<Value>) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn into_columns(self) -> Vec<(String, Broadcast<Value>)> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_expand() {
        assert_eq!(
            Broadcast::scalar(50).expand("dbspl", 3),
            Ok(vec![Value::Int(50); 3])
        );
        assert_eq!(
            Broadcast::per_row(["a", "b"]).expand("label", 2),
            Ok(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(
            Broadcast::per_row([1, 2, 3]).expand("cf", 2),
            Err(ThornsError::IncompatibleLength {
                column: "cf".to_string(),
                expected: 2,
                found: 3
            })
        );
        // empty tables accept scalars
        assert_eq!(Broadcast::from(1.0).expand("duration", 0), Ok(vec![]));
    }
}
