//! Grouping of spike trains sharing the same metadata.
use std::collections::BTreeMap;

use itertools::Itertools;

use super::table::{SpikeTrains, DURATION, SPIKES};
use super::value::Value;
use crate::error::ThornsError;

/// The columns defining the groups of [`SpikeTrains::accumulate`].
///
/// Note that the duration is a column like any other: unless ignored, spike trains with
/// different durations end up in different groups.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum GroupBy {
    /// Every column except the spikes, durations included.
    #[default]
    All,
    /// Every column except the spikes and the given ones.
    Ignore(Vec<String>),
    /// Exactly the given columns, in the given order.
    Keep(Vec<String>),
}

impl GroupBy {
    /// Builds the grouping from optional `ignore` and `keep` lists, which are mutually exclusive.
    pub fn from_options(
        ignore: Option<Vec<String>>,
        keep: Option<Vec<String>>,
    ) -> Result<Self, ThornsError> {
        match (ignore, keep) {
            (Some(_), Some(_)) => Err(ThornsError::InvalidParameter(
                "ignore and keep cannot be used together".to_string(),
            )),
            (Some(ignore), None) => Ok(GroupBy::Ignore(ignore)),
            (None, Some(keep)) => Ok(GroupBy::Keep(keep)),
            (None, None) => Ok(GroupBy::All),
        }
    }

    /// Returns the names of the key columns for the given table.
    fn key_names(&self, trains: &SpikeTrains) -> Result<Vec<String>, ThornsError> {
        let check = |name: &String| -> Result<(), ThornsError> {
            if name == SPIKES {
                return Err(ThornsError::InvalidFormat(
                    "spike times cannot be used as a grouping key".to_string(),
                ));
            }
            if !trains.has_column(name) {
                return Err(ThornsError::UnknownColumn(name.clone()));
            }
            Ok(())
        };

        let check_unique = |names: &[String]| -> Result<(), ThornsError> {
            match names.iter().duplicates().next() {
                Some(name) => Err(ThornsError::InvalidFormat(format!(
                    "column {} is listed more than once",
                    name
                ))),
                None => Ok(()),
            }
        };

        match self {
            GroupBy::All => Ok(trains.key_names().into_iter().map(String::from).collect()),
            GroupBy::Ignore(ignore) => {
                check_unique(ignore.as_slice())?;
                ignore.iter().try_for_each(check)?;
                Ok(trains
                    .key_names()
                    .into_iter()
                    .filter(|name| !ignore.iter().any(|ignored| ignored == name))
                    .map(String::from)
                    .collect())
            }
            GroupBy::Keep(keep) => {
                check_unique(keep.as_slice())?;
                keep.iter().try_for_each(check)?;
                Ok(keep.clone())
            }
        }
    }
}

impl SpikeTrains {
    /// Concatenates the spike trains sharing the same key values.
    ///
    /// There is one output row per distinct key, sorted by key. The spikes of a group are the
    /// concatenation of the spikes of its members, in row order, and are *not* sorted again.
    /// Columns outside of the key are dropped. If the duration is not part of the key, a group
    /// lasts as long as its longest member.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_thorns::spike_train::{GroupBy, Metadata, SpikeTrains};
    ///
    /// let trains = SpikeTrains::from_sequences(
    ///     vec![vec![1.0, 3.0], vec![1.0, 2.0, 3.0]],
    ///     Some(3.0.into()),
    ///     Metadata::new(),
    /// )
    /// .unwrap();
    /// let accumulated = trains.accumulate(&GroupBy::All).unwrap();
    ///
    /// assert_eq!(accumulated.spikes(), &[vec![1.0, 3.0, 1.0, 2.0, 3.0]]);
    /// ```
    pub fn accumulate(&self, group_by: &GroupBy) -> Result<Self, ThornsError> {
        let keys = group_by.key_names(self)?;

        let mut groups: BTreeMap<Vec<Value>, Vec<usize>> = BTreeMap::new();
        for row in 0..self.num_trains() {
            let key = keys
                .iter()
                .map(|name| self.key_value(name, row))
                .collect::<Result<Vec<Value>, ThornsError>>()?;
            groups.entry(key).or_default().push(row);
        }

        let duration_pos = keys.iter().position(|name| name == DURATION);
        let mut spikes = Vec::with_capacity(groups.len());
        let mut durations = Vec::with_capacity(groups.len());
        let mut meta: BTreeMap<String, Vec<Value>> = keys
            .iter()
            .filter(|name| *name != DURATION)
            .map(|name| (name.clone(), Vec::with_capacity(groups.len())))
            .collect();

        for (key, rows) in groups {
            spikes.push(
                rows.iter()
                    .flat_map(|&row| self.spikes()[row].iter().copied())
                    .collect(),
            );
            durations.push(match duration_pos {
                Some(_) => self.durations()[rows[0]],
                None => rows
                    .iter()
                    .map(|&row| self.durations()[row])
                    .fold(0.0, f64::max),
            });
            for (name, value) in keys.iter().zip(key) {
                if let Some(values) = meta.get_mut(name) {
                    values.push(value);
                }
            }
        }

        Ok(SpikeTrains::from_parts(spikes, durations, meta))
    }
}
