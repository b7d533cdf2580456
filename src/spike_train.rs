//! Module implementing tables of spike trains and their transformations.
//!
//! A [`SpikeTrains`] table holds one spike train per row, together with the duration of the
//! recording and arbitrary metadata (e.g., characteristic frequency, sound level, fiber type).
//! Tables are built from spike time sequences or from binned signals, and every transformation
//! returns a new table:
//!
//! - [`SpikeTrains::select`]: keep the rows matching metadata values,
//! - [`SpikeTrains::trim`]: restrict the spikes to a time window,
//! - [`SpikeTrains::fold`]: cut the spike trains into consecutive periods,
//! - [`SpikeTrains::accumulate`]: concatenate the spike trains sharing the same metadata,
//! - [`SpikeTrains::to_binned_matrix`]: count the spikes in bins of fixed width.
pub mod accumulate;
pub mod broadcast;
pub mod convert;
pub mod fold;
pub mod select;
pub mod table;
pub mod trim;
pub mod value;

pub use accumulate::GroupBy;
pub use broadcast::{Broadcast, Metadata};
pub use table::{SpikeTrains, DURATION, SPIKES};
pub use value::Value;
