use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::store::{normalize_key, IndexEngine};

/// Aggregates for one sector. All averages are 0.0 for an empty sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorStats {
    pub count: usize,
    pub avg_pe: f64,
    pub avg_roe: f64,
    pub avg_dividend_yield: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl SectorStats {
    fn empty() -> Self {
        SectorStats {
            count: 0,
            avg_pe: 0.0,
            avg_roe: 0.0,
            avg_dividend_yield: 0.0,
            min_price: 0.0,
            max_price: 0.0,
        }
    }
}

/// Where one record sits against its sector average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    BelowAverage,
    AboveAverage,
}

impl Standing {
    fn of(value: f64, average: f64) -> Self {
        if value < average {
            Standing::BelowAverage
        } else {
            Standing::AboveAverage
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorComparison {
    pub pe: Standing,
    pub roe: Standing,
    pub dividend_yield: Standing,
}

/// Index-level counters for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub record_count: usize,
    pub sector_count: usize,
    pub similarity_edges: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl IndexEngine {
    /// Linear scan over the arena keyed by normalized sector name.
    pub fn sector_stats(&self, sector: &str) -> SectorStats {
        let key = normalize_key(sector);
        let mut stats = SectorStats::empty();
        let mut sum_pe = 0.0;
        let mut sum_roe = 0.0;
        let mut sum_dividend = 0.0;
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;

        for record in self.records.iter() {
            if normalize_key(&record.sector) != key {
                continue;
            }
            sum_pe += record.pe;
            sum_roe += record.roe;
            sum_dividend += record.dividend_yield;
            min_price = min_price.min(record.price);
            max_price = max_price.max(record.price);
            stats.count += 1;
        }

        if stats.count > 0 {
            let count = stats.count as f64;
            stats.avg_pe = sum_pe / count;
            stats.avg_roe = sum_roe / count;
            stats.avg_dividend_yield = sum_dividend / count;
            stats.min_price = min_price;
            stats.max_price = max_price;
        }
        stats
    }

    /// A record's P/E, ROE and dividend yield against its sector average.
    /// `None` when the company is unknown.
    pub fn sector_comparison(&self, name: &str) -> Option<SectorComparison> {
        let record = self.find_by_name(name)?;
        let stats = self.sector_stats(&record.sector);
        if stats.count == 0 {
            return None;
        }
        Some(SectorComparison {
            pe: Standing::of(record.pe, stats.avg_pe),
            roe: Standing::of(record.roe, stats.avg_roe),
            dividend_yield: Standing::of(record.dividend_yield, stats.avg_dividend_yield),
        })
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            record_count: self.records.len(),
            sector_count: self.sectors.len(),
            similarity_edges: self.similarity.edge_count(),
            loaded_at: self.loaded_at,
        }
    }

    /// Distinct normalized sector keys currently indexed.
    pub fn sector_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sectors.iter().map(|(key, _)| key.clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::tests::{loaded_engine, record};

    #[test]
    fn sector_stats_aggregates() {
        let mut engine = IndexEngine::default();
        engine
            .load(vec![
                record("Alpha", "Tech", 2022, 10.0, 5.0),
                record("Beta", "Tech", 2022, 20.0, 15.0),
            ])
            .unwrap();
        let stats = engine.sector_stats("tech");
        assert_eq!(stats.count, 2);
        assert!((stats.avg_pe - 15.0).abs() < 1e-9);
        assert!((stats.avg_roe - 10.0).abs() < 1e-9);
        assert_eq!(stats.min_price, 100.0);
        assert_eq!(stats.max_price, 100.0);
    }

    #[test]
    fn empty_sector_has_zero_averages() {
        let engine = loaded_engine();
        let stats = engine.sector_stats("Energy-Nonexistent");
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_pe, 0.0);
        assert_eq!(stats.avg_roe, 0.0);
        assert_eq!(stats.avg_dividend_yield, 0.0);
        assert_eq!(stats.min_price, 0.0);
        assert_eq!(stats.max_price, 0.0);
    }

    #[test]
    fn sector_comparison_classifies_against_average() {
        let mut engine = IndexEngine::default();
        engine
            .load(vec![
                record("Cheap", "Tech", 2022, 10.0, 20.0),
                record("Pricey", "Tech", 2022, 30.0, 4.0),
            ])
            .unwrap();
        let cheap = engine.sector_comparison("Cheap").unwrap();
        assert_eq!(cheap.pe, Standing::BelowAverage);
        assert_eq!(cheap.roe, Standing::AboveAverage);

        assert!(engine.sector_comparison("Nobody").is_none());
    }

    #[test]
    fn engine_stats_counts() {
        let engine = loaded_engine();
        let stats = engine.stats();
        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.sector_count, 2);
        assert!(stats.loaded_at.is_some());
        assert_eq!(engine.sector_names(), vec!["ENERGY", "TECH"]);
    }
}
