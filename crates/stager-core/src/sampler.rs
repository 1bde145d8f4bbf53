//! Sampler configuration.
//!
//! Each variant names one distribution sampler and carries only the
//! parameters that sampler needs. Configs are used by YAML-defined tables;
//! the built-in synthesizers call the samplers directly.

use serde::{Deserialize, Serialize};

/// One tier of a long-tail distribution.
///
/// `upto` is the cumulative probability bound of the tier: a draw `u` lands
/// in the first tier with `u < upto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongTailTier {
    pub upto: f64,
    pub min: i64,
    pub max: i64,
}

/// Vote/view style volume: 70% small, 20% medium, 8% large, 2% huge.
pub const VOTE_TIERS: [LongTailTier; 4] = [
    LongTailTier {
        upto: 0.70,
        min: 5,
        max: 100,
    },
    LongTailTier {
        upto: 0.90,
        min: 101,
        max: 1_000,
    },
    LongTailTier {
        upto: 0.98,
        min: 1_001,
        max: 10_000,
    },
    LongTailTier {
        upto: 1.00,
        min: 10_001,
        max: 2_500_000,
    },
];

/// Years a `timestamp_range` may span; chrono cannot represent dates
/// much beyond these.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = -262_000..=262_000;

/// Most decimal places a sampler may round to.
pub const MAX_PRECISION: u32 = 15;

fn check_tiers(tiers: &[LongTailTier]) -> Result<(), String> {
    if tiers.is_empty() {
        return Err("long_tail requires at least one tier".to_string());
    }
    if let Some(tier) = tiers.iter().find(|t| t.min > t.max) {
        return Err(format!(
            "long_tail tier min {} exceeds max {}",
            tier.min, tier.max
        ));
    }
    let bounded = |upto: f64| upto.is_finite() && upto > 0.0;
    let increasing = tiers.windows(2).all(|w| w[0].upto < w[1].upto);
    if !increasing || tiers.iter().any(|t| !bounded(t.upto)) {
        return Err("long_tail tier bounds must be positive and strictly increasing".to_string());
    }
    Ok(())
}

fn check_precision(sampler: &str, precision: u32) -> Result<(), String> {
    if precision > MAX_PRECISION {
        Err(format!("{sampler} precision {precision} exceeds {MAX_PRECISION}"))
    } else {
        Ok(())
    }
}

fn default_vote_tiers() -> Vec<LongTailTier> {
    VOTE_TIERS.to_vec()
}

fn default_precision() -> u32 {
    2
}

fn default_skew() -> f64 {
    1.0
}

/// How a sampled timestamp is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2013-07-15T10:22:31+00:00`
    #[default]
    Iso8601,
    /// Unix seconds as an integer
    Unix,
    /// `2013-07-15`
    Date,
    /// `2013-07-15 10:22:31`
    DateTime,
}

/// Sampler configuration for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplerConfig {
    /// Uniform choice from a list
    Pick { values: Vec<serde_json::Value> },

    /// Weighted choice; weights need not sum to 1
    WeightedPick {
        values: Vec<serde_json::Value>,
        weights: Vec<f64>,
    },

    /// Integer in `[min, max]`
    IntRange { min: i64, max: i64 },

    /// Decimal in `[min, max]` rounded to `precision` places
    DecimalRange {
        min: f64,
        max: f64,
        #[serde(default = "default_precision")]
        precision: u32,
    },

    /// Timestamp between Jan 1 of `start_year` and the end of `end_year`
    TimestampRange {
        start_year: i32,
        end_year: i32,
        #[serde(default)]
        format: TimestampFormat,
    },

    /// Power-law style volume
    LongTail {
        #[serde(default = "default_vote_tiers")]
        tiers: Vec<LongTailTier>,
    },

    /// Gaussian score clamped to `[min, max]`
    BellCurve {
        mean: f64,
        stddev: f64,
        min: f64,
        max: f64,
        #[serde(default)]
        precision: Option<u32>,
    },

    /// Bernoulli trial
    Chance { probability: f64 },

    /// `start + index`
    Sequence {
        #[serde(default)]
        start: i64,
    },

    /// Pattern with an `{index}` placeholder
    Pattern { pattern: String },

    /// Identifier drawn from an already generated parent table
    PoolRef {
        table: String,
        #[serde(default = "default_skew")]
        skew: f64,
    },
}

impl SamplerConfig {
    /// Parent table this sampler reads from, if any.
    pub fn parent_table(&self) -> Option<&str> {
        match self {
            SamplerConfig::PoolRef { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Check shape parameters that serde cannot enforce.
    pub fn check(&self) -> Result<(), String> {
        match self {
            SamplerConfig::Pick { values } if values.is_empty() => {
                Err("pick requires at least one value".to_string())
            }
            SamplerConfig::WeightedPick { values, weights } => {
                if values.is_empty() {
                    Err("weighted_pick requires at least one value".to_string())
                } else if values.len() != weights.len() {
                    Err(format!(
                        "weighted_pick has {} values but {} weights",
                        values.len(),
                        weights.len()
                    ))
                } else if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
                    Err("weighted_pick weights must be non-negative with a positive sum".to_string())
                } else {
                    Ok(())
                }
            }
            SamplerConfig::IntRange { min, max } if min > max => {
                Err(format!("int_range min {min} exceeds max {max}"))
            }
            SamplerConfig::DecimalRange { min, max, .. } if min > max => {
                Err(format!("decimal_range min {min} exceeds max {max}"))
            }
            SamplerConfig::DecimalRange { precision, .. } => {
                check_precision("decimal_range", *precision)
            }
            SamplerConfig::TimestampRange {
                start_year,
                end_year,
                ..
            } => {
                if let Some(year) = [*start_year, *end_year]
                    .into_iter()
                    .find(|y| !YEAR_RANGE.contains(y))
                {
                    Err(format!(
                        "timestamp_range year {year} outside {}..={}",
                        YEAR_RANGE.start(),
                        YEAR_RANGE.end()
                    ))
                } else if start_year > end_year {
                    Err(format!(
                        "timestamp_range start_year {start_year} exceeds end_year {end_year}"
                    ))
                } else {
                    Ok(())
                }
            }
            SamplerConfig::LongTail { tiers } => check_tiers(tiers),
            SamplerConfig::BellCurve { min, max, stddev, .. } if min > max || *stddev < 0.0 => {
                Err("bell_curve requires min <= max and a non-negative stddev".to_string())
            }
            SamplerConfig::BellCurve {
                precision: Some(precision),
                ..
            } => check_precision("bell_curve", *precision),
            SamplerConfig::Chance { probability } if !(0.0..=1.0).contains(probability) => {
                Err(format!("chance probability {probability} outside [0, 1]"))
            }
            SamplerConfig::PoolRef { skew, .. } if *skew <= 0.0 => {
                Err("pool_ref skew must be positive".to_string())
            }
            _ => Ok(()),
        }
    }
}
