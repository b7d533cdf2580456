//! Random spike train sampling.
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::ThornsError;
use crate::spike_train::{Broadcast, Metadata, SpikeTrains};

/// Samples independent homogeneous Poisson spike trains.
///
/// Every train lasts `duration` and carries its index in a `trial` metadata column.
///
/// # Examples
///
/// ```
/// use rusty_thorns::sampler::rand_poisson;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let trains = rand_poisson(10, 1.0, 100.0, &mut rng).unwrap();
///
/// assert_eq!(trains.num_trains(), 10);
/// assert!(trains.validate().is_ok());
/// ```
pub fn rand_poisson<R: Rng>(
    num_trains: usize,
    duration: f64,
    firing_rate: f64,
    rng: &mut R,
) -> Result<SpikeTrains, ThornsError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(ThornsError::InvalidParameter(
            "Invalid duration value: must be finite and non-negative".to_string(),
        ));
    }

    if !firing_rate.is_finite() || firing_rate < 0.0 {
        return Err(ThornsError::InvalidParameter(
            "Invalid firing rate value: must be finite and non-negative".to_string(),
        ));
    }

    let mut sequences: Vec<Vec<f64>> = vec![vec![]; num_trains];

    if firing_rate > 0.0 {
        let isi = Exp::new(firing_rate).map_err(|e| {
            ThornsError::InvalidParameter(format!("Invalid inter-spike interval distribution: {}", e))
        })?;

        for spikes in sequences.iter_mut() {
            let mut t = isi.sample(rng);
            while t <= duration {
                spikes.push(t);
                t += isi.sample(rng);
            }
        }
    }

    let trains = SpikeTrains::from_sequences(
        sequences,
        Some(Broadcast::Scalar(duration)),
        Metadata::new().with("trial", Broadcast::per_row(0..num_trains)),
    )?;

    log::info!(
        "{} spikes sampled over {} trains (expected number of spikes per train is {})",
        trains.spikes().iter().map(|spikes| spikes.len()).sum::<usize>(),
        trains.num_trains(),
        firing_rate * duration
    );

    Ok(trains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spike_train::Value;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SEED: u64 = 42;

    #[test]
    fn test_rand_poisson_invalid() {
        let mut rng = StdRng::seed_from_u64(SEED);

        assert_eq!(
            rand_poisson(10, -1.0, 10.0, &mut rng),
            Err(ThornsError::InvalidParameter(
                "Invalid duration value: must be finite and non-negative".to_string()
            ))
        );
        assert_eq!(
            rand_poisson(10, 1.0, -10.0, &mut rng),
            Err(ThornsError::InvalidParameter(
                "Invalid firing rate value: must be finite and non-negative".to_string()
            ))
        );
    }

    #[test]
    fn test_rand_poisson() {
        let mut rng = StdRng::seed_from_u64(SEED);

        let trains = rand_poisson(50, 2.0, 100.0, &mut rng).unwrap();
        assert_eq!(trains.num_trains(), 50);
        assert_eq!(trains.durations(), &[2.0; 50]);
        assert_eq!(trains.meta_value("trial", 7), Some(&Value::Int(7)));

        for spikes in trains.spikes() {
            assert!(spikes.iter().tuple_windows().all(|(t1, t2)| t1 <= t2));
            assert!(spikes.iter().all(|&t| (0.0..=2.0).contains(&t)));
        }

        // 10000 expected spikes, the standard deviation is 100
        let num_spikes: usize = trains.spikes().iter().map(|spikes| spikes.len()).sum();
        assert!((9500..10500).contains(&num_spikes));
    }

    #[test]
    fn test_rand_poisson_silent() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let trains = rand_poisson(5, 1.0, 0.0, &mut rng).unwrap();
        assert!(trains.spikes().iter().all(|spikes| spikes.is_empty()));
    }
}
