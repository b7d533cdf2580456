//! Folding of spike trains into consecutive periods.
use std::collections::BTreeMap;

use super::table::SpikeTrains;
use super::value::Value;
use crate::error::ThornsError;

impl SpikeTrains {
    /// Splits every spike train into `ceil(duration / period)` consecutive trains, one per period.
    ///
    /// The `i`-th segment keeps the spikes in `[i * period, (i + 1) * period)`, taken modulo the
    /// period. Every segment lasts one period, except a last incomplete one which lasts
    /// `duration mod period`. Segments of the same spike train are contiguous, in time order,
    /// and carry the metadata of their origin.
    ///
    /// Segments are delimited by the exact remainder `t % period`, not by the rounded products
    /// `i * period`: a spike belongs to segment `i` when `t - t % period` is `i` periods, and
    /// the number of segments is found the same way from the duration. For instance, with a
    /// duration of 1 and a period of 0.1, a spike at 1 lands at `1 % 0.1` in the last segment,
    /// which lasts `1 % 0.1` as well, even though `10.0 * 0.1 == 1.0` in floating point.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_thorns::spike_train::{Metadata, SpikeTrains};
    ///
    /// let trains =
    ///     SpikeTrains::from_sequences(vec![vec![1.0, 2.0, 3.0, 4.0, 8.0]], Some(9.0.into()), Metadata::new())
    ///         .unwrap();
    /// let folded = trains.fold(3.0).unwrap();
    ///
    /// assert_eq!(folded.spikes(), &[vec![1.0, 2.0], vec![0.0, 1.0], vec![2.0]]);
    /// assert_eq!(folded.durations(), &[3.0, 3.0, 3.0]);
    /// ```
    pub fn fold(&self, period: f64) -> Result<Self, ThornsError> {
        if !period.is_finite() || period <= 0.0 {
            return Err(ThornsError::InvalidParameter(format!(
                "period must be finite and positive, got {}",
                period
            )));
        }

        let mut spikes = vec![];
        let mut durations = vec![];
        let mut meta: BTreeMap<String, Vec<Value>> = self
            .meta()
            .keys()
            .map(|name| (name.clone(), vec![]))
            .collect();

        for (row, (times, &duration)) in self.spikes().iter().zip(self.durations()).enumerate() {
            let last_period = duration % period;
            let num_periods = period_index(duration, last_period, period)
                + usize::from(last_period > 0.0);

            let mut segments: Vec<Vec<f64>> = vec![vec![]; num_periods];
            for &t in times {
                let r = t % period;
                if let Some(segment) = segments.get_mut(period_index(t, r, period)) {
                    segment.push(r);
                }
            }
            spikes.extend(segments);

            durations.extend(std::iter::repeat(period).take(num_periods));
            if num_periods > 0 && last_period > 0.0 {
                if let Some(last) = durations.last_mut() {
                    *last = last_period;
                }
            }

            for (name, values) in meta.iter_mut() {
                let value = &self.meta()[name][row];
                values.extend(std::iter::repeat(value.clone()).take(num_periods));
            }
        }

        Ok(SpikeTrains::from_parts(spikes, durations, meta))
    }
}

/// Returns the index of the period containing `t`, given its remainder `r = t % period`.
/// The remainder is exact, so this agrees with it even where `t / period` rounds up.
fn period_index(t: f64, r: f64, period: f64) -> usize {
    ((t - r) / period).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spike_train::{Broadcast, Metadata};
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SEED: u64 = 42;

    #[test]
    fn test_fold_exact_multiple() {
        let trains = SpikeTrains::from_sequences(
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 3.0, 4.0, 5.0]],
            Some(9.0.into()),
            Metadata::new().with("trial", Broadcast::per_row([0, 1])),
        )
        .unwrap();
        let folded = trains.fold(3.0).unwrap();

        assert_eq!(
            folded.spikes(),
            &[
                vec![1.0, 2.0],
                vec![0.0, 1.0],
                vec![2.0],
                vec![2.0],
                vec![0.0, 1.0, 2.0],
                vec![]
            ]
        );
        assert_eq!(folded.durations(), &[3.0; 6]);
        assert_eq!(
            folded.column("trial").unwrap(),
            &[0i64, 0, 0, 1, 1, 1].map(Value::Int)
        );
        assert!(folded.validate().is_ok());
    }

    #[test]
    fn test_fold_truncated_last_period() {
        let trains =
            SpikeTrains::from_sequences(vec![vec![0.5, 2.0, 2.5]], Some(2.5.into()), Metadata::new())
                .unwrap();
        let folded = trains.fold(1.0).unwrap();

        assert_eq!(folded.spikes(), &[vec![0.5], vec![], vec![0.0, 0.5]]);
        assert_eq!(folded.durations(), &[1.0, 1.0, 0.5]);
        assert!(folded.validate().is_ok());
    }

    #[test]
    fn test_fold_drops_spike_at_period_boundary() {
        // a spike exactly at the end of the last full period belongs to no segment
        let trains =
            SpikeTrains::from_sequences(vec![vec![1.0, 2.0]], Some(2.0.into()), Metadata::new())
                .unwrap();
        let folded = trains.fold(1.0).unwrap();
        assert_eq!(folded.spikes(), &[vec![], vec![0.0]]);
    }

    #[test]
    fn test_fold_uses_exact_remainder() {
        let trains =
            SpikeTrains::from_sequences(vec![vec![0.35, 1.0]], Some(1.0.into()), Metadata::new())
                .unwrap();
        let folded = trains.fold(0.1).unwrap();

        assert_eq!(folded.num_trains(), 10);
        assert_eq!(folded.get(3), Some(&[0.35 % 0.1][..]));
        assert_eq!(folded.get(9), Some(&[1.0 % 0.1][..]));
        assert_eq!(folded.durations()[9], 1.0 % 0.1);
        assert!(folded.validate().is_ok());
    }

    #[test]
    fn test_fold_empty_duration() {
        let trains =
            SpikeTrains::from_sequences(vec![vec![], vec![]], None, Metadata::new()).unwrap();
        assert!(trains.fold(1.0).unwrap().is_empty());
    }

    #[test]
    fn test_fold_invalid_period() {
        let trains = SpikeTrains::from_sequences(vec![vec![]], Some(1.0.into()), Metadata::new())
            .unwrap();
        assert!(matches!(
            trains.fold(0.0),
            Err(ThornsError::InvalidParameter(_))
        ));
        assert!(matches!(
            trains.fold(-1.0),
            Err(ThornsError::InvalidParameter(_))
        ));
        assert!(matches!(
            trains.fold(f64::INFINITY),
            Err(ThornsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_fold_totality() {
        let mut rng = StdRng::seed_from_u64(SEED);

        for _ in 0..20 {
            let num_spikes = rng.gen_range(0..50);
            let spikes: Vec<f64> = (0..num_spikes)
                .map(|_| rng.gen_range(0..1000) as f64)
                .sorted_by(|a, b| a.total_cmp(b))
                .collect();
            let duration = 1000.0;
            let period = rng.gen_range(1..300) as f64;

            let trains = SpikeTrains::from_sequences(
                vec![spikes.clone()],
                Some(duration.into()),
                Metadata::new(),
            )
            .unwrap();
            let folded = trains.fold(period).unwrap();
            assert!(folded.validate().is_ok());

            let num_periods = (duration / period).ceil() as usize;
            assert_eq!(folded.num_trains(), num_periods);

            let unfolded: Vec<f64> = folded
                .spikes()
                .iter()
                .enumerate()
                .flat_map(|(i, times)| times.iter().map(move |t| t + i as f64 * period))
                .collect();
            let expected: Vec<f64> = spikes
                .into_iter()
                .filter(|&t| t < num_periods as f64 * period)
                .collect();
            assert_eq!(unfolded, expected);
        }
    }
}
