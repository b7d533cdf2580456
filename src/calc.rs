//! Simple statistics over spike train tables.
use crate::error::ThornsError;
use crate::spike_train::SpikeTrains;

/// Returns the mean firing rate, i.e., the total number of spikes divided by the total
/// recording duration. Returns an error if the total duration is zero.
///
/// # Examples
///
/// ```
/// use rusty_thorns::calc::firing_rate;
/// use rusty_thorns::spike_train::{Metadata, SpikeTrains};
///
/// let trains = SpikeTrains::from_sequences(
///     vec![vec![0.1, 0.4], vec![0.4, 0.5, 0.6]],
///     Some(1.0.into()),
///     Metadata::new(),
/// )
/// .unwrap();
/// assert_eq!(firing_rate(&trains).unwrap(), 2.5);
/// ```
pub fn firing_rate(trains: &SpikeTrains) -> Result<f64, ThornsError> {
    let total_duration: f64 = trains.durations().iter().sum();
    if total_duration <= 0.0 {
        return Err(ThornsError::InvalidParameter(
            "firing rate is undefined for a zero total duration".to_string(),
        ));
    }
    Ok(num_spikes(trains) as f64 / total_duration)
}

/// Returns the longest duration of the table, or 0 for an empty table.
pub fn duration(trains: &SpikeTrains) -> f64 {
    trains.durations().iter().fold(0.0, |acc: f64, &d| acc.max(d))
}

/// Returns the total number of spikes.
pub fn num_spikes(trains: &SpikeTrains) -> usize {
    trains.spikes().iter().map(|spikes| spikes.len()).sum()
}

/// Returns every spike as a (time, trial) pair, trials numbered by row.
/// These are the points of a raster plot.
pub fn raster_points(trains: &SpikeTrains) -> Vec<(f64, usize)> {
    trains
        .spikes()
        .iter()
        .enumerate()
        .flat_map(|(trial, spikes)| spikes.iter().map(move |&t| (t, trial)))
        .collect()
}
