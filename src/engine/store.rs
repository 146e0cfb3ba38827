use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::collections::avl::AvlTree;
use crate::collections::dynarray::DynArray;
use crate::collections::graph::Graph;
use crate::collections::hashmap::ChainedMap;
use crate::collections::heap::{MaxHeap, MinHeap};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::record::{Metric, Record};
use crate::engine::keys::{PeKey, RoeKey};
use crate::engine::similarity;

/// Lookup keys are trimmed and ASCII-uppercased so "  apple " and
/// "APPLE" address the same entry.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Ascending in-place sort of record references by a metric.
pub fn sort_by_metric(records: &mut [&Record], metric: Metric) {
    records.sort_by(|a, b| metric.value(a).total_cmp(&metric.value(b)));
}

/// Owns the canonical record arena and every derived index.
///
/// All indices hold arena positions, never record data; they are rebuilt
/// wholesale on `load`/`reload` and queries are read-only. Empty <->
/// Loaded are the only states.
pub struct IndexEngine {
    pub(crate) config: Config,
    pub(crate) records: DynArray<Record>,
    pub(crate) by_name: ChainedMap<String, usize>,
    pub(crate) sectors: ChainedMap<String, DynArray<usize>>,
    pub(crate) by_pe: AvlTree<PeKey>,
    pub(crate) low_pe: MinHeap<PeKey>,
    pub(crate) high_roe: MaxHeap<RoeKey>,
    pub(crate) similarity: Graph<usize>,
    pub(crate) loaded_at: Option<DateTime<Utc>>,
}

impl IndexEngine {
    pub fn new(config: Config) -> Self {
        IndexEngine {
            records: DynArray::new(),
            by_name: ChainedMap::new(),
            sectors: ChainedMap::new(),
            by_pe: AvlTree::new(),
            low_pe: MinHeap::new(),
            high_roe: MaxHeap::new(),
            similarity: Graph::new(false),
            loaded_at: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Ingest a finalized record sequence and rebuild every index.
    ///
    /// The ingestion collaborator has already validated the records;
    /// anything still flagged invalid is excluded from indexing. The
    /// similarity pass is O(n^2) over the arena and dominates load cost.
    pub fn load(&mut self, records: Vec<Record>) -> Result<()> {
        self.clear();
        for record in records {
            if !record.valid {
                debug!(company = %record.company_name, "skipping invalid record");
                continue;
            }
            self.index_record(record);
        }
        self.similarity =
            similarity::build_graph(&self.records, self.config.similarity_threshold)?;
        self.loaded_at = Some(Utc::now());
        info!(
            records = self.records.len(),
            sectors = self.sectors.len(),
            similarity_edges = self.similarity.edge_count(),
            "indices rebuilt"
        );
        Ok(())
    }

    /// Clear then reingest: Loaded -> Loaded with fresh indices.
    pub fn reload(&mut self, records: Vec<Record>) -> Result<()> {
        self.load(records)
    }

    /// Drop every index and the record arena: back to Empty.
    pub fn clear(&mut self) {
        self.records = DynArray::new();
        self.by_name = ChainedMap::new();
        self.sectors = ChainedMap::new();
        self.by_pe = AvlTree::new();
        self.low_pe = MinHeap::new();
        self.high_roe = MaxHeap::new();
        self.similarity = Graph::new(false);
        self.loaded_at = None;
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        let key = normalize_key(name);
        self.by_name.get(&key).map(|&index| &self.records[index])
    }

    /// Every record of a sector, via the sector index.
    pub fn filter_by_sector(&self, sector: &str) -> Vec<&Record> {
        let key = normalize_key(sector);
        match self.sectors.get(&key) {
            Some(indices) => indices.iter().map(|&index| &self.records[index]).collect(),
            None => Vec::new(),
        }
    }

    /// Records with P/E in `[min, max]`, ascending by P/E.
    pub fn records_in_pe_range(&self, min: f64, max: f64) -> Vec<&Record> {
        let mut out: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| record.pe >= min && record.pe <= max)
            .collect();
        sort_by_metric(&mut out, Metric::Pe);
        out
    }

    /// All records in ascending P/E order, straight off the AVL walk.
    pub fn pe_ordered(&self) -> Vec<&Record> {
        self.by_pe
            .iter()
            .map(|key| &self.records[key.record])
            .collect()
    }

    /// Top `n` by ROE, descending, equal ROE in ascending name order.
    /// Drains a snapshot of the heap; the canonical index is untouched.
    pub fn top_n_roe(&self, n: usize) -> Vec<&Record> {
        let mut snapshot = self.high_roe.clone();
        let mut out = Vec::new();
        while out.len() < n {
            match snapshot.pop() {
                Some(key) => out.push(&self.records[key.record]),
                None => break,
            }
        }
        out
    }

    /// Lowest `n` by P/E, ascending, ties in ascending name order.
    pub fn lowest_n_pe(&self, n: usize) -> Vec<&Record> {
        let mut snapshot = self.low_pe.clone();
        let mut out = Vec::new();
        while out.len() < n {
            match snapshot.pop() {
                Some(key) => out.push(&self.records[key.record]),
                None => break,
            }
        }
        out
    }

    fn index_record(&mut self, record: Record) {
        let index = self.records.len();
        let name_key = normalize_key(&record.company_name);
        let sector_key = normalize_key(&record.sector);
        let pe_key = PeKey::new(record.pe, record.company_name.clone(), index);
        let roe_key = RoeKey::new(record.roe, record.company_name.clone(), index);

        self.by_name.insert(name_key, index);
        self.sectors.entry_or_default(sector_key).push(index);
        self.by_pe.insert(pe_key.clone());
        self.low_pe.push(pe_key);
        self.high_roe.push(roe_key);
        self.records.push(record);
    }
}

impl Default for IndexEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal valid record for index tests.
    pub(crate) fn record(name: &str, sector: &str, year: i32, pe: f64, roe: f64) -> Record {
        let mut r = Record {
            company_name: name.to_string(),
            sector: sector.to_string(),
            year,
            price: 100.0,
            pe,
            roe,
            latest_eps: 5.0,
            book_value: 40.0,
            equity_to_asset: 0.5,
            last_dividend: 1.0,
            expected_growth: 4.0,
            ..Record::default()
        };
        r.validate();
        r.compute_derived();
        r
    }

    pub(crate) fn loaded_engine() -> IndexEngine {
        let mut engine = IndexEngine::default();
        engine
            .load(vec![
                record("Alpha", "Tech", 2022, 10.0, 5.0),
                record("Beta", "Tech", 2022, 10.0, 8.0),
                record("Cryo", "Energy", 2022, 5.0, 2.0),
            ])
            .unwrap();
        engine
    }

    #[test]
    fn find_by_name_is_normalized() {
        let engine = loaded_engine();
        assert!(engine.find_by_name("alpha").is_some());
        assert!(engine.find_by_name("  ALPHA  ").is_some());
        assert!(engine.find_by_name("unknown").is_none());
    }

    #[test]
    fn filter_by_sector_uses_index() {
        let engine = loaded_engine();
        let tech = engine.filter_by_sector(" tech ");
        assert_eq!(tech.len(), 2);
        assert!(engine.filter_by_sector("Utilities").is_empty());
    }

    #[test]
    fn ranking_example_from_worked_case() {
        // {A: PE=10, ROE=5}, {B: PE=10, ROE=8}, {C: PE=5, ROE=2}
        let engine = loaded_engine();
        let top_roe: Vec<&str> = engine
            .top_n_roe(2)
            .iter()
            .map(|r| r.company_name.as_str())
            .collect();
        assert_eq!(top_roe, vec!["Beta", "Alpha"]);

        let in_order: Vec<&str> = engine
            .pe_ordered()
            .iter()
            .map(|r| r.company_name.as_str())
            .collect();
        assert_eq!(in_order, vec!["Cryo", "Alpha", "Beta"]);
    }

    #[test]
    fn lowest_pe_breaks_ties_by_name() {
        let engine = loaded_engine();
        let lowest: Vec<&str> = engine
            .lowest_n_pe(3)
            .iter()
            .map(|r| r.company_name.as_str())
            .collect();
        assert_eq!(lowest, vec!["Cryo", "Alpha", "Beta"]);
        // asking for more than exists returns everything
        assert_eq!(engine.lowest_n_pe(10).len(), 3);
    }

    #[test]
    fn pe_range_is_sorted_and_inclusive() {
        let engine = loaded_engine();
        let in_range: Vec<&str> = engine
            .records_in_pe_range(5.0, 10.0)
            .iter()
            .map(|r| r.company_name.as_str())
            .collect();
        assert_eq!(in_range, vec!["Cryo", "Alpha", "Beta"]);
        assert!(engine.records_in_pe_range(11.0, 20.0).is_empty());
    }

    #[test]
    fn reload_rebuilds_identical_indices() {
        let mut engine = loaded_engine();
        let first_top: Vec<String> = engine
            .lowest_n_pe(5)
            .iter()
            .map(|r| r.company_name.clone())
            .collect();
        let first_tech = engine.filter_by_sector("Tech").len();

        engine
            .reload(vec![
                record("Alpha", "Tech", 2022, 10.0, 5.0),
                record("Beta", "Tech", 2022, 10.0, 8.0),
                record("Cryo", "Energy", 2022, 5.0, 2.0),
            ])
            .unwrap();

        let second_top: Vec<String> = engine
            .lowest_n_pe(5)
            .iter()
            .map(|r| r.company_name.clone())
            .collect();
        assert_eq!(first_top, second_top);
        assert_eq!(engine.filter_by_sector("Tech").len(), first_tech);
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut engine = loaded_engine();
        engine.clear();
        assert!(engine.is_empty());
        assert_eq!(engine.record_count(), 0);
        assert!(engine.find_by_name("Alpha").is_none());
        assert!(engine.top_n_roe(3).is_empty());
    }

    #[test]
    fn invalid_records_are_excluded() {
        let mut engine = IndexEngine::default();
        let mut bad = record("Ghost", "Tech", 2022, 10.0, 5.0);
        bad.valid = false;
        engine
            .load(vec![bad, record("Solid", "Tech", 2022, 8.0, 4.0)])
            .unwrap();
        assert_eq!(engine.record_count(), 1);
        assert!(engine.find_by_name("Ghost").is_none());
    }

    #[test]
    fn sort_by_metric_orders_ascending() {
        let engine = loaded_engine();
        let mut refs: Vec<&Record> = engine.records().iter().collect();
        sort_by_metric(&mut refs, Metric::Roe);
        let roes: Vec<f64> = refs.iter().map(|r| r.roe).collect();
        assert_eq!(roes, vec![2.0, 5.0, 8.0]);
    }
}
