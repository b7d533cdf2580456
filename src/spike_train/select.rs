//! Row selection based on metadata values.
use super::table::{SpikeTrains, SPIKES};
use super::value::Value;
use crate::error::ThornsError;

impl SpikeTrains {
    /// Returns the spike trains whose metadata match every `(column, value)` criterion.
    ///
    /// The relative order of the rows is preserved. If no row matches, the table is empty.
    /// The `duration` column can be used as a criterion, compared as a float value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_thorns::spike_train::{Broadcast, Metadata, SpikeTrains, Value};
    ///
    /// let trains = SpikeTrains::from_sequences(
    ///     vec![vec![0.1], vec![0.2], vec![0.3]],
    ///     Some(1.0.into()),
    ///     Metadata::new()
    ///         .with("cf", Broadcast::per_row([1000, 2000, 1000]))
    ///         .with("anf_type", Broadcast::per_row(["hsr", "hsr", "lsr"])),
    /// )
    /// .unwrap();
    ///
    /// let selected = trains
    ///     .select([("cf", Value::from(1000)), ("anf_type", Value::from("hsr"))])
    ///     .unwrap();
    /// assert_eq!(selected.spikes(), &[vec![0.1]]);
    /// ```
    pub fn select<'a, I>(&self, criteria: I) -> Result<Self, ThornsError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let criteria: Vec<(&str, Value)> = criteria.into_iter().collect();
        for (name, _) in criteria.iter() {
            if *name == SPIKES {
                return Err(ThornsError::InvalidFormat(
                    "spike times cannot be used as a selection criterion".to_string(),
                ));
            }
            if !self.has_column(name) {
                return Err(ThornsError::UnknownColumn(name.to_string()));
            }
        }

        let mut rows = Vec::with_capacity(self.num_trains());
        for row in 0..self.num_trains() {
            let mut matched = true;
            for (name, value) in criteria.iter() {
                if self.key_value(name, row)? != *value {
                    matched = false;
                    break;
                }
            }
            if matched {
                rows.push(row);
            }
        }

        Ok(self.take_rows(&rows))
    }
}
