//! Record synthesizers, one per dataset shape.
//!
//! A synthesizer is built once per table run (drawing any per-run pools
//! from the table's generator first) and is afterwards a pure function of
//! `(index, generator position)`.

pub mod clickbench;
pub mod fields;
pub mod imdb;
pub mod words;

pub use clickbench::{DeviceMode, Hit, HitSynthesizer};
pub use fields::FieldSynthesizer;
pub use imdb::{Person, PersonSynthesizer, Rating, RatingSynthesizer, Title, TitleSynthesizer};

use rand::RngCore;
use serde::Serialize;

/// Builds one record per index.
pub trait Synthesizer {
    type Record: Serialize;

    /// Produce record `index`, advancing `rng`.
    fn synthesize<R: RngCore + ?Sized>(&self, index: u64, rng: &mut R) -> Self::Record;

    /// Identifier child tables may reference.
    fn record_id(&self, record: &Self::Record) -> Option<String>;
}
