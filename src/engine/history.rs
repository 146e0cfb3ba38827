use serde::{Deserialize, Serialize};

use crate::core::record::{Record, Trend};
use crate::engine::store::{normalize_key, IndexEngine};

/// Multi-year price behavior of one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    pub company: String,
    pub sector: String,
    pub first_year: i32,
    pub last_year: i32,
    pub points: usize,
    pub first_price: f64,
    pub last_price: f64,
    /// Compound annual growth rate over the full span.
    pub cagr: f64,
    pub avg_yoy_return: f64,
    /// Population standard deviation of year-over-year returns.
    pub volatility: f64,
    pub best_year_return: f64,
    pub worst_year_return: f64,
    pub avg_dividend_yield: f64,
    pub trend: Trend,
}

impl IndexEngine {
    /// Every record of `name`'s company, ascending by fiscal year.
    pub fn company_history(&self, name: &str) -> Vec<&Record> {
        let key = normalize_key(name);
        let mut series: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| normalize_key(&record.company_name) == key)
            .collect();
        series.sort_by_key(|record| record.year);
        series
    }

    /// Return/volatility profile over the company's year series. `None`
    /// for an unknown company.
    pub fn history_stats(&self, name: &str) -> Option<HistoryStats> {
        let series = self.company_history(name);
        let (first, latest) = (series.first()?, series.last()?);

        let span = latest.year - first.year;
        let cagr = if span > 0 && first.price > 0.0 && latest.price > 0.0 {
            (latest.price / first.price).powf(1.0 / span as f64) - 1.0
        } else {
            0.0
        };

        let returns: Vec<f64> = series
            .windows(2)
            .filter(|pair| pair[0].price > 0.0)
            .map(|pair| (pair[1].price - pair[0].price) / pair[0].price)
            .collect();
        let (avg_yoy_return, volatility, best, worst) = if returns.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let mean = returns.iter().sum::<f64>() / returns.len() as f64;
            let mean_sq = returns.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64;
            let variance = (mean_sq - mean * mean).max(0.0);
            let best = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let worst = returns.iter().copied().fold(f64::INFINITY, f64::min);
            (mean, variance.sqrt(), best, worst)
        };

        let avg_dividend_yield =
            series.iter().map(|r| r.dividend_yield).sum::<f64>() / series.len() as f64;

        Some(HistoryStats {
            company: latest.company_name.clone(),
            sector: latest.sector.clone(),
            first_year: first.year,
            last_year: latest.year,
            points: series.len(),
            first_price: first.price,
            last_price: latest.price,
            cagr,
            avg_yoy_return,
            volatility,
            best_year_return: best,
            worst_year_return: worst,
            avg_dividend_yield,
            trend: latest.trend(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::tests::record;

    fn engine_with_series(prices: &[f64]) -> IndexEngine {
        let mut records = Vec::new();
        for (offset, &price) in prices.iter().enumerate() {
            let mut r = record("Acme", "Tech", 2020 + offset as i32, 10.0, 5.0);
            r.price = price;
            r.compute_derived();
            records.push(r);
        }
        let mut engine = IndexEngine::default();
        engine.load(records).unwrap();
        engine
    }

    #[test]
    fn history_is_sorted_by_year() {
        let mut engine = IndexEngine::default();
        engine
            .load(vec![
                record("Acme", "Tech", 2024, 10.0, 5.0),
                record("Acme", "Tech", 2022, 10.0, 5.0),
                record("Other", "Tech", 2023, 10.0, 5.0),
                record("Acme", "Tech", 2023, 10.0, 5.0),
            ])
            .unwrap();
        let years: Vec<i32> = engine.company_history("acme").iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);
        assert!(engine.company_history("missing").is_empty());
    }

    #[test]
    fn cagr_matches_closed_form() {
        // 100 -> 121 over two years is 10% per year.
        let engine = engine_with_series(&[100.0, 110.0, 121.0]);
        let stats = engine.history_stats("Acme").unwrap();
        assert!((stats.cagr - 0.10).abs() < 1e-9);
        assert_eq!(stats.first_year, 2020);
        assert_eq!(stats.last_year, 2022);
        assert_eq!(stats.points, 3);
    }

    #[test]
    fn constant_returns_have_zero_volatility() {
        let engine = engine_with_series(&[100.0, 110.0, 121.0]);
        let stats = engine.history_stats("Acme").unwrap();
        assert!((stats.avg_yoy_return - 0.10).abs() < 1e-9);
        assert!(stats.volatility.abs() < 1e-9);
        assert!((stats.best_year_return - 0.10).abs() < 1e-9);
        assert!((stats.worst_year_return - 0.10).abs() < 1e-9);
    }

    #[test]
    fn mixed_returns_spread() {
        // +50% then -50%: mean 0, volatility 0.5.
        let engine = engine_with_series(&[100.0, 150.0, 75.0]);
        let stats = engine.history_stats("Acme").unwrap();
        assert!(stats.avg_yoy_return.abs() < 1e-9);
        assert!((stats.volatility - 0.5).abs() < 1e-9);
        assert!((stats.best_year_return - 0.5).abs() < 1e-9);
        assert!((stats.worst_year_return + 0.5).abs() < 1e-9);
    }

    #[test]
    fn single_point_history() {
        let engine = engine_with_series(&[100.0]);
        let stats = engine.history_stats("Acme").unwrap();
        assert_eq!(stats.points, 1);
        assert_eq!(stats.cagr, 0.0);
        assert_eq!(stats.volatility, 0.0);
        assert!(engine.history_stats("Ghost").is_none());
    }
}
