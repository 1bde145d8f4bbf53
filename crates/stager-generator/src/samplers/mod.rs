//! Distribution samplers.
//!
//! Samplers borrow the generator and never reseed it. Each unit draw reads
//! exactly one `next_u32`, so any `RngCore` works, but only `Mulberry32`
//! reproduces reference output.

pub mod categorical;
pub mod numeric;
pub mod timestamp;

pub use categorical::{pick, pick_distinct, skewed_index, weighted_index, weighted_pick};
pub use numeric::{bell_curve, decimal_range, int_range, long_tail, positive_i64, round_to};
pub use timestamp::{timestamp_between, timestamp_range, year_start, Timestamp};

use crate::pool::SharedPools;
use rand::RngCore;
use serde_json::Value;
use stager_core::{SamplerConfig, TimestampFormat};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Draw a float in [0.0, 1.0).
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / TWO_POW_32
}

/// Bernoulli trial: true with probability `p`.
pub fn chance<R: RngCore + ?Sized>(p: f64, rng: &mut R) -> bool {
    unit(rng) < p
}

/// Sample one field value from its configuration.
pub fn sample_value<R: RngCore + ?Sized>(
    config: &SamplerConfig,
    index: u64,
    pools: &SharedPools,
    rng: &mut R,
) -> Value {
    match config {
        SamplerConfig::Pick { values } => pick(values, rng).clone(),

        SamplerConfig::WeightedPick { values, weights } => {
            weighted_pick(values, weights, rng).clone()
        }

        SamplerConfig::IntRange { min, max } => Value::from(int_range(*min, *max, rng)),

        SamplerConfig::DecimalRange {
            min,
            max,
            precision,
        } => Value::from(decimal_range(*min, *max, *precision, rng)),

        SamplerConfig::TimestampRange {
            start_year,
            end_year,
            format,
        } => {
            let ts = timestamp_range(*start_year, *end_year, rng);
            match format {
                TimestampFormat::Iso8601 => Value::from(ts.to_rfc3339()),
                TimestampFormat::Unix => Value::from(ts.unix()),
                TimestampFormat::Date => Value::from(ts.date()),
                TimestampFormat::DateTime => Value::from(ts.datetime()),
            }
        }

        SamplerConfig::LongTail { tiers } => Value::from(long_tail(tiers, rng)),

        SamplerConfig::BellCurve {
            mean,
            stddev,
            min,
            max,
            precision,
        } => {
            let value = bell_curve(*mean, *stddev, *min, *max, rng);
            match precision {
                Some(p) => Value::from(round_to(value, *p)),
                None => Value::from(value),
            }
        }

        SamplerConfig::Chance { probability } => Value::Bool(chance(*probability, rng)),

        SamplerConfig::Sequence { start } => Value::from(start.wrapping_add(index as i64)),

        SamplerConfig::Pattern { pattern } => {
            Value::String(pattern.replace("{index}", &index.to_string()))
        }

        SamplerConfig::PoolRef { table, skew } => {
            Value::String(pools.require(table).pick_skewed(*skew, rng).clone())
        }
    }
}
