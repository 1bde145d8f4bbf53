//! Whole-table generation into a JSON Lines buffer.

use crate::pool::{IdPool, SharedPools};
use crate::rng::Mulberry32;
use crate::synthesizers::{
    FieldSynthesizer, HitSynthesizer, PersonSynthesizer, RatingSynthesizer, Synthesizer,
    TitleSynthesizer,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use stager_core::{SynthesizerKind, TableSpec};
use tracing::{debug, info};

const PROGRESS_INTERVAL: u64 = 100_000;

/// Error type for table generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A record could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing to the output buffer failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output of one table run.
#[derive(Debug)]
pub struct GeneratedTable {
    pub name: String,
    pub records: u64,
    /// One JSON object per line, newline-terminated
    pub bytes: Vec<u8>,
    /// Ids child tables may reference; `None` if the table exposes none
    pub ids: Option<IdPool>,
}

/// Generate `count` records for `table`.
///
/// The table's generator is seeded with `table.seed` and used in record
/// order, so the same spec, count and parent pools always produce the same
/// bytes. `pools` must already contain every parent the table names.
pub fn generate_table(
    table: &TableSpec,
    count: u64,
    pools: &SharedPools,
) -> Result<GeneratedTable, GeneratorError> {
    let started = Instant::now();
    let mut rng = Mulberry32::new(table.seed);
    let mut out = Vec::new();
    let collect_ids = table.synthesizer.provides_ids();

    let ids = match &table.synthesizer {
        SynthesizerKind::ClickbenchHits => {
            let synth = HitSynthesizer::new(count, &mut rng);
            write_records(&table.name, &synth, count, collect_ids, &mut rng, &mut out)?
        }
        SynthesizerKind::ImdbTitles => {
            let synth = TitleSynthesizer::new();
            write_records(&table.name, &synth, count, collect_ids, &mut rng, &mut out)?
        }
        SynthesizerKind::ImdbPeople { titles } => {
            let synth = PersonSynthesizer::new(Arc::clone(pools.require(titles)));
            write_records(&table.name, &synth, count, collect_ids, &mut rng, &mut out)?
        }
        SynthesizerKind::ImdbRatings { titles } => {
            let synth = RatingSynthesizer::new(count, Arc::clone(pools.require(titles)), &mut rng);
            write_records(&table.name, &synth, count, collect_ids, &mut rng, &mut out)?
        }
        SynthesizerKind::Fields { id_field, fields } => {
            let parents = table.parents();
            let synth =
                FieldSynthesizer::new(id_field.clone(), fields.clone(), pools.subset(&parents));
            write_records(&table.name, &synth, count, collect_ids, &mut rng, &mut out)?
        }
    };

    info!(
        "Generated {} records for table '{}' ({} bytes) in {:?}",
        count,
        table.name,
        out.len(),
        started.elapsed()
    );

    Ok(GeneratedTable {
        name: table.name.clone(),
        records: count,
        bytes: out,
        ids: ids.map(|ids| IdPool::new(table.name.clone(), ids)),
    })
}

fn write_records<S, W>(
    table: &str,
    synth: &S,
    count: u64,
    collect_ids: bool,
    rng: &mut Mulberry32,
    out: &mut W,
) -> Result<Option<Vec<String>>, GeneratorError>
where
    S: Synthesizer,
    W: Write,
{
    let mut ids = collect_ids.then(|| Vec::with_capacity(count as usize));

    for index in 0..count {
        let record = synth.synthesize(index, rng);
        if let Some(ids) = ids.as_mut() {
            if let Some(id) = synth.record_id(&record) {
                ids.push(id);
            }
        }
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            debug!("Table '{table}': {} of {count} records", index + 1);
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use stager_core::{Catalog, SizeTier};
    use std::collections::HashSet;

    fn lines(table: &GeneratedTable) -> Vec<Value> {
        std::str::from_utf8(&table.bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_hits_are_reproducible() {
        let catalog = Catalog::builtin();
        let resolved = catalog.resolve("clickbench", "1mb").unwrap();
        let hits = &resolved.tables[0];

        let first = generate_table(&hits.spec, hits.count, &SharedPools::default()).unwrap();
        let second = generate_table(&hits.spec, hits.count, &SharedPools::default()).unwrap();

        assert_eq!(first.records, 2_000);
        assert_eq!(first.bytes, second.bytes);
        assert!(first.bytes.ends_with(b"\n"));

        let rows = lines(&first);
        assert_eq!(rows.len(), 2_000);
        let users: HashSet<i64> = rows
            .iter()
            .map(|row| row["UserID"].as_i64().unwrap())
            .collect();
        assert!(users.len() <= 200);
    }

    #[test]
    fn test_imdb_children_reference_titles() {
        let catalog = Catalog::builtin();
        let resolved = catalog.resolve("imdb", "1mb").unwrap();
        let mut pools = SharedPools::default();

        let titles = &resolved.tables[0];
        assert_eq!(titles.spec.name, "titles");
        let generated = generate_table(&titles.spec, titles.count, &pools).unwrap();
        let pool = generated.ids.expect("titles expose ids");
        assert_eq!(pool.len() as u64, titles.count);
        let known: HashSet<String> = pool.ids().iter().cloned().collect();
        pools.insert("titles", Arc::new(pool));

        for child in &resolved.tables[1..] {
            let generated = generate_table(&child.spec, child.count, &pools).unwrap();
            assert_eq!(generated.records, child.count);
            for row in lines(&generated) {
                match child.spec.name.as_str() {
                    "people" => {
                        for id in row["knownForTitles"].as_array().unwrap() {
                            assert!(known.contains(id.as_str().unwrap()));
                        }
                    }
                    "ratings" => {
                        assert!(known.contains(row["tconst"].as_str().unwrap()));
                    }
                    other => panic!("unexpected table {other}"),
                }
            }
        }
    }

    #[test]
    fn test_fields_table_from_yaml() {
        let yaml = r#"
datasets:
  - id: shop
    tables:
      - name: customers
        seed: 7
        synthesizer:
          kind: fields
          id_field: id
          fields:
            - name: id
              sampler: { type: pattern, pattern: "c-{index}" }
            - name: tier
              sampler: { type: weighted_pick, values: [gold, basic], weights: [0.2, 0.8] }
        counts: { 1mb: 50 }
      - name: orders
        seed: 8
        synthesizer:
          kind: fields
          fields:
            - name: customer
              sampler: { type: pool_ref, table: customers, skew: 1.5 }
            - name: total
              sampler: { type: decimal_range, min: 1.0, max: 500.0 }
        counts: { 1mb: 200 }
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        let resolved = catalog.resolve("shop", "1mb").unwrap();
        let mut pools = SharedPools::default();

        let customers = generate_table(&resolved.tables[0].spec, 50, &pools).unwrap();
        let pool = customers.ids.unwrap();
        assert_eq!(pool.ids()[3], "c-3");
        pools.insert("customers", Arc::new(pool));

        let orders = generate_table(&resolved.tables[1].spec, 200, &pools).unwrap();
        assert!(orders.ids.is_none());
        for row in lines(&orders) {
            let customer = row["customer"].as_str().unwrap();
            assert!(customer.starts_with("c-"));
            let total = row["total"].as_f64().unwrap();
            assert!((1.0..=500.0).contains(&total));
        }
    }

    #[test]
    fn test_zero_count_produces_empty_buffer() {
        let catalog = Catalog::builtin();
        let resolved = catalog.resolve("imdb", "1mb").unwrap();
        let titles = generate_table(&resolved.tables[0].spec, 0, &SharedPools::default()).unwrap();
        assert!(titles.bytes.is_empty());
        assert_eq!(titles.records, 0);
    }

    #[test]
    #[should_panic(expected = "generation invariant violated")]
    fn test_child_without_parent_panics() {
        let catalog = Catalog::builtin();
        let resolved = catalog.resolve("imdb", "1mb").unwrap();
        let people = &resolved.tables[1];
        let _ = generate_table(&people.spec, people.count, &SharedPools::default());
    }

    #[test]
    fn test_size_tier_scales_counts() {
        let catalog = Catalog::builtin();
        let small = catalog.resolve("clickbench", "1mb").unwrap();
        let larger = catalog.resolve("clickbench", SizeTier::Mb10.as_str()).unwrap();
        assert_eq!(larger.tables[0].count, small.tables[0].count * 10);
    }
}
