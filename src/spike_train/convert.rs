//! Conversion between spike train tables and binned signals sampled at a fixed rate.
use nalgebra::DMatrix;

use super::broadcast::{Broadcast, Metadata};
use super::table::SpikeTrains;
use crate::error::ThornsError;

impl SpikeTrains {
    /// Creates a table from a binned signal of shape (time bins x channels) sampled at `fs`.
    ///
    /// A bin `i` holding `n` counts becomes `n` spikes at time `i / fs`, i.e., the spike times
    /// are only resolved up to the bin width. Every row gets the duration `nrows / fs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::DMatrix;
    /// use rusty_thorns::spike_train::{Metadata, SpikeTrains};
    ///
    /// let signal = DMatrix::from_row_slice(4, 2, &[0, 1, 2, 0, 0, 0, 1, 1]);
    /// let trains = SpikeTrains::from_binned_matrix(&signal, 10.0, Metadata::new()).unwrap();
    ///
    /// assert_eq!(trains.spikes(), &[vec![0.1, 0.1, 0.3], vec![0.0, 0.3]]);
    /// assert_eq!(trains.durations(), &[0.4, 0.4]);
    /// ```
    pub fn from_binned_matrix(
        matrix: &DMatrix<u32>,
        fs: f64,
        meta: Metadata,
    ) -> Result<Self, ThornsError> {
        check_sampling_frequency(fs)?;

        let sequences = matrix
            .column_iter()
            .map(|counts| {
                counts
                    .iter()
                    .enumerate()
                    .flat_map(|(i, &n)| std::iter::repeat(i as f64 / fs).take(n as usize))
                    .collect()
            })
            .collect();

        let duration = matrix.nrows() as f64 / fs;
        SpikeTrains::from_sequences(sequences, Some(Broadcast::Scalar(duration)), meta)
    }

    /// Converts the table to a binned signal of shape (time bins x trains) sampled at `fs`.
    ///
    /// The number of bins is the smallest `n` with `n / fs` covering the longest duration.
    /// Bins are half-open `[i / fs, (i + 1) / fs)`, except the last one which is closed.
    pub fn to_binned_matrix(&self, fs: f64) -> Result<DMatrix<u32>, ThornsError> {
        check_sampling_frequency(fs)?;

        let max_duration = self.durations().iter().fold(0.0, |acc: f64, &d| acc.max(d));
        let num_bins = num_bins(max_duration, fs);

        let mut matrix = DMatrix::<u32>::zeros(num_bins, self.num_trains());
        for (col, spikes) in self.spikes().iter().enumerate() {
            for &t in spikes {
                if let Some(i) = bin_index(t, fs, num_bins) {
                    matrix[(i, col)] += 1;
                }
            }
        }
        Ok(matrix)
    }
}

fn check_sampling_frequency(fs: f64) -> Result<(), ThornsError> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(ThornsError::InvalidParameter(format!(
            "sampling frequency must be finite and positive, got {}",
            fs
        )));
    }
    Ok(())
}

/// Returns the smallest number of bins `n` such that `n / fs >= duration`.
fn num_bins(duration: f64, fs: f64) -> usize {
    let mut n = (duration * fs).ceil().max(0.0) as usize;
    // ceil(duration * fs) can be off by one after rounding
    while n > 0 && (n - 1) as f64 / fs >= duration {
        n -= 1;
    }
    while (n as f64 / fs) < duration {
        n += 1;
    }
    n
}

/// Returns the bin containing `t`, or None if `t` falls outside `[0, num_bins / fs]`.
fn bin_index(t: f64, fs: f64, num_bins: usize) -> Option<usize> {
    let edge = |i: usize| i as f64 / fs;

    if num_bins == 0 || t < 0.0 || t > edge(num_bins) {
        return None;
    }

    let mut i = ((t * fs).floor().max(0.0) as usize).min(num_bins - 1);
    // compare against the exact edges to undo rounding of t * fs
    while i > 0 && t < edge(i) {
        i -= 1;
    }
    while i + 1 < num_bins && t >= edge(i + 1) {
        i += 1;
    }
    Some(i)
}
