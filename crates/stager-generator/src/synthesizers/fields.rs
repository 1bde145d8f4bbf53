//! Catalog-defined tables: one sampler per field.

use super::Synthesizer;
use crate::pool::SharedPools;
use crate::samplers::sample_value;
use rand::RngCore;
use serde_json::{Map, Value};
use stager_core::FieldSpec;

pub struct FieldSynthesizer {
    id_field: Option<String>,
    fields: Vec<FieldSpec>,
    pools: SharedPools,
}

impl FieldSynthesizer {
    /// `pools` must hold every table named by a `pool_ref` sampler.
    pub fn new(id_field: Option<String>, fields: Vec<FieldSpec>, pools: SharedPools) -> Self {
        Self {
            id_field,
            fields,
            pools,
        }
    }
}

impl Synthesizer for FieldSynthesizer {
    type Record = Map<String, Value>;

    fn synthesize<R: RngCore + ?Sized>(&self, index: u64, rng: &mut R) -> Self::Record {
        let mut record = Map::new();
        for field in &self.fields {
            let value = sample_value(&field.sampler, index, &self.pools, rng);
            record.insert(field.name.clone(), value);
        }
        record
    }

    fn record_id(&self, record: &Self::Record) -> Option<String> {
        let value = record.get(self.id_field.as_deref()?)?;
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
