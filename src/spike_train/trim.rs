//! Restriction of spike trains to a time window.
use super::table::SpikeTrains;
use crate::error::ThornsError;

impl SpikeTrains {
    /// Keeps the spikes within `[start, stop]` and shifts them so that `start` becomes the new
    /// time origin. The new duration is `min(duration, stop) - start`.
    ///
    /// `start` defaults to 0 and `stop` to the duration of each row.
    /// Returns an error if the window is empty for any row, or if `start` lies after the end of
    /// a recording.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_thorns::spike_train::{Metadata, SpikeTrains};
    ///
    /// let trains =
    ///     SpikeTrains::from_sequences(vec![vec![0.1, 0.6, 0.9]], Some(1.0.into()), Metadata::new())
    ///         .unwrap();
    /// let trimmed = trains.trim(None, Some(0.5)).unwrap();
    ///
    /// assert_eq!(trimmed.spikes(), &[vec![0.1]]);
    /// assert_eq!(trimmed.durations(), &[0.5]);
    /// ```
    pub fn trim(&self, start: Option<f64>, stop: Option<f64>) -> Result<Self, ThornsError> {
        if let (Some(start), Some(stop)) = (start, stop) {
            if !(start < stop) {
                return Err(ThornsError::InvalidWindow { start, stop });
            }
        }

        let tmin = start.unwrap_or(0.0);
        if !tmin.is_finite() {
            return Err(ThornsError::InvalidParameter(format!(
                "window start must be finite, got {}",
                tmin
            )));
        }

        let mut spikes = Vec::with_capacity(self.num_trains());
        let mut durations = Vec::with_capacity(self.num_trains());
        for (times, &duration) in self.spikes().iter().zip(self.durations()) {
            let tmax = stop.unwrap_or(duration);
            if !(tmin < tmax) {
                return Err(ThornsError::InvalidWindow {
                    start: tmin,
                    stop: tmax,
                });
            }
            if tmin > duration {
                return Err(ThornsError::InvalidWindow {
                    start: tmin,
                    stop: duration,
                });
            }

            spikes.push(
                times
                    .iter()
                    .filter(|&&t| t >= tmin && t <= tmax)
                    .map(|t| t - tmin)
                    .collect(),
            );
            durations.push(duration.min(tmax) - tmin);
        }

        Ok(SpikeTrains::from_parts(
            spikes,
            durations,
            self.meta().clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spike_train::{Broadcast, Metadata, Value};
    use approx::assert_relative_eq;

    fn trains() -> SpikeTrains {
        SpikeTrains::from_sequences(
            vec![vec![0.1, 0.6, 0.9], vec![0.0, 0.5, 1.5]],
            Some(vec![1.0, 2.0].into()),
            Metadata::new().with("trial", Broadcast::per_row([0, 1])),
        )
        .unwrap()
    }

    #[test]
    fn test_trim_stop() {
        let trimmed = trains().trim(None, Some(0.5)).unwrap();
        assert_eq!(trimmed.spikes(), &[vec![0.1], vec![0.0, 0.5]]);
        assert_eq!(trimmed.durations(), &[0.5, 0.5]);
        assert_eq!(
            trimmed.column("trial"),
            Some(&[Value::Int(0), Value::Int(1)][..])
        );
        assert!(trimmed.validate().is_ok());
    }

    #[test]
    fn test_trim_start() {
        let trimmed = trains().trim(Some(0.5), None).unwrap();

        assert_eq!(trimmed.get(0).unwrap().len(), 2);
        assert_relative_eq!(trimmed.get(0).unwrap()[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(trimmed.get(0).unwrap()[1], 0.4, epsilon = 1e-12);
        assert_eq!(trimmed.get(1).unwrap(), &[0.0, 1.0]);
        assert_eq!(trimmed.durations(), &[0.5, 1.5]);
        assert!(trimmed.validate().is_ok());
    }

    #[test]
    fn test_trim_window_beyond_duration() {
        // a stop after the end of the recording does not extend the duration
        let trimmed = trains().trim(Some(0.5), Some(3.0)).unwrap();
        assert_eq!(trimmed.durations(), &[0.5, 1.5]);
    }

    #[test]
    fn test_trim_invalid_window() {
        assert_eq!(
            trains().trim(Some(0.5), Some(0.5)),
            Err(ThornsError::InvalidWindow {
                start: 0.5,
                stop: 0.5
            })
        );
        assert_eq!(
            trains().trim(Some(0.6), Some(0.5)),
            Err(ThornsError::InvalidWindow {
                start: 0.6,
                stop: 0.5
            })
        );
        // the start is after the end of the first recording
        assert_eq!(
            trains().trim(Some(1.5), None),
            Err(ThornsError::InvalidWindow {
                start: 1.5,
                stop: 1.0
            })
        );
        assert_eq!(
            trains().trim(Some(1.5), Some(1.8)),
            Err(ThornsError::InvalidWindow {
                start: 1.5,
                stop: 1.0
            })
        );
    }

    #[test]
    fn test_trim_idempotence() {
        let trimmed = trains().trim(Some(0.5), Some(1.0)).unwrap();
        let again = trimmed.trim(Some(0.0), Some(0.5)).unwrap();
        assert_eq!(again, trimmed);
    }
}
