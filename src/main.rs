use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use rusty_thorns::calc;
use rusty_thorns::error::ThornsError;
use rusty_thorns::sampler::rand_poisson;
use rusty_thorns::spike_train::{Broadcast, GroupBy, Metadata, SpikeTrains, Value};

/// Select, trim, fold and accumulate spike trains.
#[derive(Parser, Debug)]
struct Args {
    /// The input spike trains (JSON); if omitted, Poisson spike trains are sampled
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// The output file (JSON); defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// The seed used for spike train sampling
    #[arg(long, default_value = "0")]
    seed: u64,
    /// The number of sampled spike trains
    #[arg(short = 'N', long, default_value = "10")]
    num_trains: usize,
    /// The duration of the sampled spike trains
    #[arg(long, default_value = "1.0")]
    duration: f64,
    /// The firing rate of the sampled spike trains
    #[arg(long, default_value = "50.0")]
    firing_rate: f64,
    /// Selection criteria, as column=value (repeatable)
    #[arg(long)]
    select: Vec<String>,
    /// The start of the time window
    #[arg(long)]
    start: Option<f64>,
    /// The end of the time window
    #[arg(long)]
    stop: Option<f64>,
    /// The folding period
    #[arg(long)]
    period: Option<f64>,
    /// Concatenate the spike trains sharing the same metadata. Spikes are concatenated as is,
    /// so the output cannot be read back with --input unless --sort is given
    #[arg(long)]
    accumulate: bool,
    /// Sort the spikes of every output train
    #[arg(long)]
    sort: bool,
    /// Columns left out of the grouping key (repeatable)
    #[arg(long)]
    ignore: Vec<String>,
    /// Columns making up the grouping key (repeatable)
    #[arg(long)]
    keep: Vec<String>,
    /// Write the spike counts binned at this sampling frequency instead of the spike trains
    #[arg(long)]
    fs: Option<f64>,
    /// The log file; defaults to stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// The log level, must be one of: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Spike trains as read from a JSON file.
#[derive(Deserialize, Debug)]
struct TrainsFile {
    spikes: Vec<Vec<f64>>,
    duration: Option<DurationField>,
    #[serde(default)]
    meta: BTreeMap<String, MetaField>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum DurationField {
    Scalar(f64),
    PerRow(Vec<f64>),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum MetaField {
    Scalar(Value),
    PerRow(Vec<Value>),
}

impl TrainsFile {
    fn into_spike_trains(self) -> Result<SpikeTrains, ThornsError> {
        let duration = self.duration.map(|duration| match duration {
            DurationField::Scalar(d) => Broadcast::Scalar(d),
            DurationField::PerRow(ds) => Broadcast::PerRow(ds),
        });
        let meta = self
            .meta
            .into_iter()
            .fold(Metadata::new(), |meta, (name, field)| match field {
                MetaField::Scalar(value) => meta.with(name, Broadcast::Scalar(value)),
                MetaField::PerRow(values) => meta.with(name, Broadcast::PerRow(values)),
            });
        SpikeTrains::from_sequences(self.spikes, duration, meta)
    }
}

/// Parses a `column=value` criterion. Values are read as booleans, integers, floats, or text.
fn parse_criterion(criterion: &str) -> Result<(String, Value), ThornsError> {
    let (name, value) = criterion.split_once('=').ok_or_else(|| {
        ThornsError::InvalidFormat(format!(
            "selection criterion {} must be of the form column=value",
            criterion
        ))
    })?;

    let value = if let Ok(b) = value.parse::<bool>() {
        Value::Bool(b)
    } else if let Ok(i) = value.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(x) = value.parse::<f64>() {
        Value::Float(x)
    } else {
        Value::Text(value.to_string())
    };

    Ok((name.to_string(), value))
}

fn init_logging(args: &Args) -> Result<(), ThornsError> {
    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|e| ThornsError::InvalidParameter(format!("{}: {}", e, args.log_level)))?;
    let pattern = "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}";
    let appender: Box<dyn log4rs::append::Append> = match &args.log_file {
        Some(path) => Box::new(
            FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(pattern)))
                .build(path)
                .map_err(|e| ThornsError::IOError(e.to_string()))?,
        ),
        None => Box::new(
            ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new(pattern)))
                .target(Target::Stderr)
                .build(),
        ),
    };

    let config = Config::builder()
        .appender(Appender::builder().build("main", appender))
        .build(Root::builder().appender("main").build(level))
        .map_err(|e| ThornsError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| ThornsError::IOError(e.to_string()))?;
    Ok(())
}

fn load_spike_trains(args: &Args) -> Result<SpikeTrains, ThornsError> {
    match &args.input {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            let file: TrainsFile = serde_json::from_reader(reader)?;
            let trains = file.into_spike_trains()?;
            log::info!(
                "{} spike trains loaded from {}",
                trains.num_trains(),
                path.display()
            );
            Ok(trains)
        }
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            rand_poisson(args.num_trains, args.duration, args.firing_rate, &mut rng)
        }
    }
}

fn transform(args: &Args, mut trains: SpikeTrains) -> Result<SpikeTrains, ThornsError> {
    if !args.select.is_empty() {
        let criteria = args
            .select
            .iter()
            .map(|criterion| parse_criterion(criterion))
            .collect::<Result<Vec<_>, _>>()?;
        trains = trains.select(criteria.iter().map(|(name, value)| (name.as_str(), value.clone())))?;
        log::info!("Selection: done! {} spike trains left", trains.num_trains());
    }

    if args.start.is_some() || args.stop.is_some() {
        trains = trains.trim(args.start, args.stop)?;
        log::info!("Trimming: done!");
    }

    if let Some(period) = args.period {
        trains = trains.fold(period)?;
        log::info!("Folding: done! {} spike trains", trains.num_trains());
    }

    let ignore = (!args.ignore.is_empty()).then(|| args.ignore.clone());
    let keep = (!args.keep.is_empty()).then(|| args.keep.clone());
    if args.accumulate || ignore.is_some() || keep.is_some() {
        let group_by = GroupBy::from_options(ignore, keep)?;
        trains = trains.accumulate(&group_by)?;
        log::info!("Accumulation: done! {} groups", trains.num_trains());
    }

    if args.sort {
        trains = trains.sort_spikes();
    }

    Ok(trains)
}

fn main() -> Result<(), ThornsError> {
    let args = Args::parse();
    init_logging(&args)?;
    log::debug!("{:?}", args);

    let trains = transform(&args, load_spike_trains(&args)?)?;

    match calc::firing_rate(&trains) {
        Ok(rate) => log::info!(
            "{} spikes over {} spike trains, mean firing rate {:.3}",
            calc::num_spikes(&trains),
            trains.num_trains(),
            rate
        ),
        Err(e) => log::warn!("{}", e),
    }

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = BufWriter::new(writer);

    match args.fs {
        Some(fs) => {
            let signal = trains.to_binned_matrix(fs)?;
            let rows: Vec<Vec<u32>> = signal
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect();
            serde_json::to_writer(&mut writer, &rows)?;
        }
        None => serde_json::to_writer(&mut writer, &trains)?,
    }
    writeln!(writer)?;
    writer.flush()?;

    log::info!("Output: done!");
    Ok(())
}
