//! The spike train table: one row per spike train, with its duration and metadata.
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use super::broadcast::{Broadcast, Metadata};
use super::value::Value;
use crate::error::ThornsError;

/// Name of the reserved column holding the spike times.
pub const SPIKES: &str = "spikes";
/// Name of the reserved column holding the recording durations.
pub const DURATION: &str = "duration";

/// A table of spike trains.
///
/// Each row holds a sorted sequence of spike times, the duration of the recording window and
/// one value for every metadata column. All spike times of a row lie in `[0, duration]`.
/// Row order is significant and preserved by every transformation unless stated otherwise.
///
/// Tables are never modified in place: every transformation returns a new table.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SpikeTrains {
    spikes: Vec<Vec<f64>>,
    #[serde(rename = "duration")]
    durations: Vec<f64>,
    meta: BTreeMap<String, Vec<Value>>,
}

impl SpikeTrains {
    /// Creates a table from sequences of (sorted) spike times.
    ///
    /// If no duration is provided, every row gets the largest spike time found across all
    /// sequences (0 if there are no spikes at all).
    /// Metadata columns are either broadcast or must have one value per sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_thorns::spike_train::{Broadcast, Metadata, SpikeTrains};
    ///
    /// let trains = SpikeTrains::from_sequences(
    ///     vec![vec![0.1, 0.4], vec![0.4, 0.5, 0.6]],
    ///     Some(1.0.into()),
    ///     Metadata::new().with("cf", Broadcast::per_row([1000, 2000])),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(trains.num_trains(), 2);
    /// assert_eq!(trains.durations(), &[1.0, 1.0]);
    /// ```
    pub fn from_sequences(
        sequences: Vec<Vec<f64>>,
        duration: Option<Broadcast<f64>>,
        meta: Metadata,
    ) -> Result<Self, ThornsError> {
        let num_trains = sequences.len();

        let durations = match duration {
            Some(duration) => duration.expand(DURATION, num_trains)?,
            None => {
                let max_spike = sequences
                    .iter()
                    .filter_map(|spikes| spikes.last())
                    .fold(0.0, |acc: f64, &t| acc.max(t));
                vec![max_spike; num_trains]
            }
        };

        let mut columns = BTreeMap::new();
        for (name, column) in meta.into_columns() {
            if name == SPIKES || name == DURATION {
                return Err(ThornsError::InvalidFormat(format!(
                    "{} is a reserved column and cannot be used as metadata",
                    name
                )));
            }
            if columns.contains_key(&name) {
                return Err(ThornsError::InvalidFormat(format!(
                    "metadata column {} is provided more than once",
                    name
                )));
            }
            let values = column.expand(&name, num_trains)?;
            columns.insert(name, values);
        }

        for (row, &duration) in durations.iter().enumerate() {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ThornsError::InvalidParameter(format!(
                    "duration of spike train {} must be finite and non-negative, got {}",
                    row, duration
                )));
            }
        }

        let trains = SpikeTrains {
            spikes: sequences,
            durations,
            meta: columns,
        };
        trains
            .validate()
            .map_err(|e| ThornsError::InvalidFormat(e.to_string()))?;
        Ok(trains)
    }

    /// Assembles a table from columns which are already row-aligned.
    pub(crate) fn from_parts(
        spikes: Vec<Vec<f64>>,
        durations: Vec<f64>,
        meta: BTreeMap<String, Vec<Value>>,
    ) -> Self {
        SpikeTrains {
            spikes,
            durations,
            meta,
        }
    }

    /// Creates a table without any spike train.
    pub fn new_empty() -> Self {
        SpikeTrains {
            spikes: vec![],
            durations: vec![],
            meta: BTreeMap::new(),
        }
    }

    /// Checks the table invariants: equal column lengths, finite non-negative durations,
    /// and sorted spike times bounded by the duration of their row.
    pub fn validate(&self) -> Result<(), ThornsError> {
        let num_trains = self.spikes.len();
        if self.durations.len() != num_trains {
            return Err(ThornsError::InvariantViolation(format!(
                "{} spike trains but {} durations",
                num_trains,
                self.durations.len()
            )));
        }
        if let Some((name, values)) = self
            .meta
            .iter()
            .find(|(_, values)| values.len() != num_trains)
        {
            return Err(ThornsError::InvariantViolation(format!(
                "{} spike trains but {} values in column {}",
                num_trains,
                values.len(),
                name
            )));
        }

        for (row, (spikes, &duration)) in self.spikes.iter().zip_eq(&self.durations).enumerate() {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ThornsError::InvariantViolation(format!(
                    "spike train {} has an invalid duration {}",
                    row, duration
                )));
            }
            if let Some(t) = spikes.iter().find(|t| !t.is_finite()) {
                return Err(ThornsError::InvariantViolation(format!(
                    "spike train {} has an invalid spike time {}",
                    row, t
                )));
            }
            if let Some((t1, t2)) = spikes.iter().tuple_windows().find(|(t1, t2)| t1 > t2) {
                return Err(ThornsError::InvariantViolation(format!(
                    "spike train {} is not sorted ({} before {})",
                    row, t1, t2
                )));
            }
            if let Some(t) = spikes.iter().find(|&&t| t < 0.0 || t > duration) {
                return Err(ThornsError::InvariantViolation(format!(
                    "spike train {} has a spike at {} outside of [0, {}]",
                    row, t, duration
                )));
            }
        }

        Ok(())
    }

    /// Returns a new table where the spikes of every row are sorted.
    /// Only needed after [`SpikeTrains::accumulate`], which concatenates spike trains as is.
    pub fn sort_spikes(&self) -> Self {
        let mut sorted = self.clone();
        for spikes in sorted.spikes.iter_mut() {
            spikes.sort_by(|a, b| a.total_cmp(b));
        }
        sorted
    }

    /// Returns the number of spike trains (rows).
    pub fn num_trains(&self) -> usize {
        self.spikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spikes.is_empty()
    }

    /// Returns the spike times of every row.
    pub fn spikes(&self) -> &[Vec<f64>] {
        &self.spikes[..]
    }

    /// Returns the spike times of a single row.
    pub fn get(&self, row: usize) -> Option<&[f64]> {
        self.spikes.get(row).map(|spikes| &spikes[..])
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations[..]
    }

    /// Returns the values of a metadata column.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.meta.get(name).map(|values| &values[..])
    }

    /// Returns the value of a metadata column at a given row.
    pub fn meta_value(&self, name: &str, row: usize) -> Option<&Value> {
        self.meta.get(name).and_then(|values| values.get(row))
    }

    /// Returns the names of the metadata columns, in alphabetical order.
    pub fn meta_names(&self) -> impl Iterator<Item = &str> {
        self.meta.keys().map(|name| name.as_str())
    }

    /// Returns the names of all the columns except the spikes, in alphabetical order.
    /// This is the default grouping key of [`SpikeTrains::accumulate`].
    pub fn key_names(&self) -> Vec<&str> {
        self.meta_names()
            .chain(std::iter::once(DURATION))
            .sorted()
            .collect()
    }

    /// Returns true if the table has a column with this name (reserved columns included).
    pub fn has_column(&self, name: &str) -> bool {
        name == SPIKES || name == DURATION || self.meta.contains_key(name)
    }

    /// Returns the value of a non-spikes column at a given row, durations included.
    pub(crate) fn key_value(&self, name: &str, row: usize) -> Result<Value, ThornsError> {
        match name {
            DURATION => Ok(Value::Float(self.durations[row])),
            SPIKES => Err(ThornsError::InvalidFormat(
                "spikes cannot be compared as a metadata value".to_string(),
            )),
            _ => self
                .meta_value(name, row)
                .cloned()
                .ok_or_else(|| ThornsError::UnknownColumn(name.to_string())),
        }
    }

    pub(crate) fn meta(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.meta
    }

    /// Returns a new table with only the given rows, in the given order.
    pub(crate) fn take_rows(&self, rows: &[usize]) -> Self {
        SpikeTrains {
            spikes: rows.iter().map(|&row| self.spikes[row].clone()).collect(),
            durations: rows.iter().map(|&row| self.durations[row]).collect(),
            meta: self
                .meta
                .iter()
                .map(|(name, values)| {
                    (
                        name.clone(),
                        rows.iter().map(|&row| values[row].clone()).collect(),
                    )
                })
                .collect(),
        }
    }
}
