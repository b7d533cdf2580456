//! This crate provides tools for analyzing spike trains in Rust, e.g., the responses of auditory
//! nerve fibers produced by inner ear models.
//!
//! # Creating Spike Trains
//!
//! ## From Spike Times
//!
//! ```rust
//! use rusty_thorns::spike_train::{Broadcast, Metadata, SpikeTrains};
//!
//! // Two trials of the same fiber, recorded for 1 second each
//! let trains = SpikeTrains::from_sequences(
//!     vec![vec![0.1, 0.4], vec![0.4, 0.5, 0.6]],
//!     Some(1.0.into()),
//!     Metadata::new()
//!         .with("cf", Broadcast::scalar(1000))
//!         .with("trial", Broadcast::per_row([0, 1])),
//! )
//! .unwrap();
//!
//! assert_eq!(trains.num_trains(), 2);
//! ```
//!
//! ## From a Binned Signal
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use rusty_thorns::spike_train::{Metadata, SpikeTrains};
//!
//! // 3 time bins sampled at 1 kHz, 2 channels
//! let signal = DMatrix::from_row_slice(3, 2, &[0, 1, 2, 0, 0, 1]);
//! let trains = SpikeTrains::from_binned_matrix(&signal, 1000.0, Metadata::new()).unwrap();
//!
//! assert_eq!(trains.to_binned_matrix(1000.0).unwrap(), signal);
//! ```
//!
//! ## At Random
//!
//! ```rust
//! use rusty_thorns::sampler::rand_poisson;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let trains = rand_poisson(100, 1.0, 50.0, &mut rng).unwrap();
//!
//! assert_eq!(trains.num_trains(), 100);
//! ```
//!
//! # Transforming Spike Trains
//!
//! ```rust
//! use rusty_thorns::calc::firing_rate;
//! use rusty_thorns::spike_train::{Broadcast, GroupBy, Metadata, SpikeTrains, Value};
//!
//! let trains = SpikeTrains::from_sequences(
//!     vec![vec![0.05, 0.3, 1.2], vec![0.1, 0.9, 1.7], vec![0.5]],
//!     Some(2.0.into()),
//!     Metadata::new().with("cf", Broadcast::per_row([1000, 1000, 2000])),
//! )
//! .unwrap();
//!
//! // Keep the fibers at 1 kHz, drop the onset, and cut the responses in 0.5 s cycles
//! let cycles = trains
//!     .select([("cf", Value::from(1000))])
//!     .unwrap()
//!     .trim(Some(0.2), None)
//!     .unwrap()
//!     .fold(0.5)
//!     .unwrap();
//! assert_eq!(cycles.num_trains(), 8);
//!
//! // Pool all the cycles together
//! let pooled = cycles
//!     .accumulate(&GroupBy::Ignore(vec!["duration".to_string()]))
//!     .unwrap();
//! assert_eq!(pooled.num_trains(), 1);
//! assert!(firing_rate(&pooled).unwrap() > 0.0);
//! ```

pub mod calc;
pub mod error;
pub mod sampler;
pub mod spike_train;
