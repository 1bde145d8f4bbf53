//! IMDb-style titles, people and user ratings.
//!
//! `titles` is the parent table. `people.knownForTitles` and
//! `ratings.tconst` are drawn from the titles pool with a popularity skew,
//! so they only ever reference titles that were already generated.

use super::words::{
    FIRST_NAMES, GENRES, LAST_NAMES, PROFESSIONS, TITLE_CONNECTORS, TITLE_TYPES,
    TITLE_TYPE_WEIGHTS, TITLE_WORDS,
};
use super::Synthesizer;
use crate::pool::{pool_size, IdPool};
use crate::samplers::{
    bell_curve, chance, decimal_range, int_range, long_tail, pick, pick_distinct, round_to,
    timestamp_range, weighted_index,
};
use rand::RngCore;
use serde::Serialize;
use std::sync::Arc;
use stager_core::VOTE_TIERS;

const LATEST_YEAR: i64 = 2024;

/// Skew for foreign-key picks; earlier titles are more popular.
const TITLE_POPULARITY_SKEW: f64 = 2.0;

// ============================================================================
// Titles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub tconst: String,
    pub title_type: String,
    pub primary_title: String,
    pub original_title: String,
    pub is_adult: bool,
    pub start_year: i64,
    pub end_year: Option<i64>,
    pub runtime_minutes: Option<i64>,
    pub genres: Vec<String>,
}

/// Title ids are `tt` + 7 digits of `index + 1`.
pub fn title_id(index: u64) -> String {
    format!("tt{:07}", index + 1)
}

/// Parent table synthesizer; stateless.
#[derive(Debug, Clone, Default)]
pub struct TitleSynthesizer;

impl TitleSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

fn title_text<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let words = int_range(1, 4, rng) as usize;
    let mut parts: Vec<&str> = pick_distinct(TITLE_WORDS, words, rng)
        .into_iter()
        .copied()
        .collect();
    if parts.len() >= 2 && chance(0.3, rng) {
        parts.insert(1, *pick(TITLE_CONNECTORS, rng));
        parts.insert(0, "The");
    }
    parts.join(" ")
}

/// Runtime distribution per title type; `None` where runtime is not tracked.
fn runtime<R: RngCore + ?Sized>(title_type: &str, rng: &mut R) -> Option<i64> {
    let (mean, stddev, min, max) = match title_type {
        "movie" => (100.0, 20.0, 45.0, 240.0),
        "short" => (12.0, 6.0, 1.0, 40.0),
        "tvEpisode" => (42.0, 12.0, 10.0, 90.0),
        "tvSeries" => (45.0, 10.0, 20.0, 70.0),
        "videoGame" => return None,
        _ => (90.0, 25.0, 30.0, 200.0),
    };
    Some(bell_curve(mean, stddev, min, max, rng).round() as i64)
}

impl Synthesizer for TitleSynthesizer {
    type Record = Title;

    fn synthesize<R: RngCore + ?Sized>(&self, index: u64, rng: &mut R) -> Title {
        let title_type = TITLE_TYPES[weighted_index(TITLE_TYPE_WEIGHTS, rng)];
        let primary_title = title_text(rng);
        let original_title = if chance(0.85, rng) {
            primary_title.clone()
        } else {
            title_text(rng)
        };
        let is_adult = chance(0.02, rng);
        let start_year = bell_curve(2000.0, 18.0, 1894.0, LATEST_YEAR as f64, rng).round() as i64;
        let end_year = if title_type == "tvSeries" && chance(0.6, rng) {
            Some((start_year + int_range(0, 12, rng)).min(LATEST_YEAR))
        } else {
            None
        };
        let runtime_minutes = runtime(title_type, rng);
        let genre_count = int_range(1, 3, rng) as usize;
        let genres = pick_distinct(GENRES, genre_count, rng)
            .into_iter()
            .map(|g| g.to_string())
            .collect();

        Title {
            tconst: title_id(index),
            title_type: title_type.to_string(),
            primary_title,
            original_title,
            is_adult,
            start_year,
            end_year,
            runtime_minutes,
            genres,
        }
    }

    fn record_id(&self, record: &Title) -> Option<String> {
        Some(record.tconst.clone())
    }
}

// ============================================================================
// People
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub nconst: String,
    pub primary_name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub primary_profession: Vec<String>,
    pub known_for_titles: Vec<String>,
}

/// Child of `titles`.
#[derive(Debug, Clone)]
pub struct PersonSynthesizer {
    titles: Arc<IdPool>,
}

impl PersonSynthesizer {
    pub fn new(titles: Arc<IdPool>) -> Self {
        Self { titles }
    }
}

impl Synthesizer for PersonSynthesizer {
    type Record = Person;

    fn synthesize<R: RngCore + ?Sized>(&self, index: u64, rng: &mut R) -> Person {
        let primary_name = format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng));
        let birth_year = chance(0.7, rng).then(|| int_range(1900, 2005, rng));
        let death_year = match birth_year {
            Some(born) if chance(0.12, rng) => {
                Some((born + int_range(25, 95, rng)).min(LATEST_YEAR))
            }
            _ => None,
        };
        let profession_count = int_range(1, 3, rng) as usize;
        let primary_profession = pick_distinct(PROFESSIONS, profession_count, rng)
            .into_iter()
            .map(|p| p.to_string())
            .collect();

        let known_count = int_range(1, 4, rng) as usize;
        let mut known_for_titles: Vec<String> = Vec::with_capacity(known_count);
        for _ in 0..known_count {
            let id = self.titles.pick_skewed(TITLE_POPULARITY_SKEW, rng);
            if !known_for_titles.contains(id) {
                known_for_titles.push(id.clone());
            }
        }

        Person {
            nconst: format!("nm{:07}", index + 1),
            primary_name,
            birth_year,
            death_year,
            primary_profession,
            known_for_titles,
        }
    }

    fn record_id(&self, record: &Person) -> Option<String> {
        Some(record.nconst.clone())
    }
}

// ============================================================================
// Ratings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating_id: u64,
    pub tconst: String,
    pub user_id: i64,
    pub rating: f64,
    pub helpful_votes: i64,
    pub rated_at: String,
}

/// Child of `titles`; users cluster over a per-run pool.
#[derive(Debug, Clone)]
pub struct RatingSynthesizer {
    titles: Arc<IdPool>,
    users: IdPool<i64>,
}

impl RatingSynthesizer {
    /// Draws the user pool (`max(100, count / 10)` ids) from `rng`.
    pub fn new<R: RngCore + ?Sized>(count: u64, titles: Arc<IdPool>, rng: &mut R) -> Self {
        let users = IdPool::generate("ratings.users", pool_size(count), rng, |r| {
            int_range(1, 99_999_999, r)
        });
        Self { titles, users }
    }

    pub fn users(&self) -> &IdPool<i64> {
        &self.users
    }
}

impl Synthesizer for RatingSynthesizer {
    type Record = Rating;

    fn synthesize<R: RngCore + ?Sized>(&self, index: u64, rng: &mut R) -> Rating {
        let tconst = self.titles.pick_skewed(TITLE_POPULARITY_SKEW, rng).clone();
        let user_id = *self.users.pick(rng);
        // Mostly favourable scores with a thin low tail; 10% uniform noise.
        let rating = if chance(0.9, rng) {
            round_to(bell_curve(6.8, 1.6, 1.0, 10.0, rng), 1)
        } else {
            decimal_range(1.0, 10.0, 1, rng)
        };
        let helpful_votes = long_tail(&VOTE_TIERS, rng);
        let rated_at = timestamp_range(2005, LATEST_YEAR as i32, rng).to_rfc3339();

        Rating {
            rating_id: index + 1,
            tconst,
            user_id,
            rating,
            helpful_votes,
            rated_at,
        }
    }

    fn record_id(&self, record: &Rating) -> Option<String> {
        Some(record.rating_id.to_string())
    }
}
