use serde::{Deserialize, Serialize};

use crate::collections::heap::MaxHeap;
use crate::core::record::Record;
use crate::engine::keys::ScoreKey;
use crate::engine::store::IndexEngine;

/// Scoring profile selecting how the four component scores are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    GrowthFocus,
    ValueFocus,
    IncomeFocus,
    Balanced,
}

/// Weight vector over (value, growth, health, dividend); sums to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub value: f64,
    pub growth: f64,
    pub health: f64,
    pub dividend: f64,
}

impl Strategy {
    pub fn weights(&self) -> Weights {
        match self {
            Strategy::GrowthFocus => Weights {
                value: 0.10,
                growth: 0.50,
                health: 0.20,
                dividend: 0.20,
            },
            Strategy::ValueFocus => Weights {
                value: 0.50,
                growth: 0.15,
                health: 0.20,
                dividend: 0.15,
            },
            Strategy::IncomeFocus => Weights {
                value: 0.20,
                growth: 0.10,
                health: 0.20,
                dividend: 0.50,
            },
            Strategy::Balanced => Weights {
                value: 0.25,
                growth: 0.25,
                health: 0.25,
                dividend: 0.25,
            },
        }
    }
}

/// Weighted composite score for one record.
///
/// A non-positive P/E contributes zero value score instead of an inverted
/// or infinite one; a non-positive price zeroes the dividend component.
pub fn score(record: &Record, weights: &Weights) -> f64 {
    let value = if record.pe > 0.0 { 1.0 / record.pe } else { 0.0 };
    let growth = record.expected_growth;
    let health = 0.5 * record.roe + 0.5 * record.equity_to_asset;
    let dividend = if record.price > 0.0 {
        record.dividend_yield
    } else {
        0.0
    };
    weights.value * value
        + weights.growth * growth
        + weights.health * health
        + weights.dividend * dividend
}

/// A scored record out of `recommend`, best first.
#[derive(Debug, Clone)]
pub struct Recommendation<'a> {
    pub score: f64,
    pub record: &'a Record,
}

impl IndexEngine {
    /// Top `n` records under the strategy's weights, descending score,
    /// equal scores in ascending company-name order.
    pub fn recommend(&self, strategy: Strategy, n: usize) -> Vec<Recommendation<'_>> {
        let weights = strategy.weights();
        let mut heap = MaxHeap::new();
        for (index, record) in self.records.iter().enumerate() {
            heap.push(ScoreKey::new(
                score(record, &weights),
                record.company_name.clone(),
                index,
            ));
        }
        let mut out = Vec::new();
        while out.len() < n {
            match heap.pop() {
                Some(key) => out.push(Recommendation {
                    score: key.score,
                    record: &self.records[key.record],
                }),
                None => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::tests::record;

    #[test]
    fn weights_sum_to_one() {
        for strategy in [
            Strategy::GrowthFocus,
            Strategy::ValueFocus,
            Strategy::IncomeFocus,
            Strategy::Balanced,
        ] {
            let w = strategy.weights();
            assert!((w.value + w.growth + w.health + w.dividend - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn non_positive_pe_contributes_zero_value() {
        let mut negative = record("Loss Corp", "Tech", 2022, 0.0, 10.0);
        negative.pe = 0.0;
        let zeroed = score(&negative, &Strategy::ValueFocus.weights());
        let mut positive = negative.clone();
        positive.pe = 10.0;
        let valued = score(&positive, &Strategy::ValueFocus.weights());
        assert!(valued > zeroed);
        assert!(zeroed.is_finite());
    }

    #[test]
    fn balanced_score_composition() {
        let r = record("Acme", "Tech", 2022, 10.0, 8.0);
        // value 1/10, growth 4, health 0.5*8 + 0.5*0.5, dividend 1%
        let expected = 0.25 * 0.1 + 0.25 * 4.0 + 0.25 * 4.25 + 0.25 * 1.0;
        assert!((score(&r, &Strategy::Balanced.weights()) - expected).abs() < 1e-9);
    }

    #[test]
    fn recommend_orders_descending_with_name_ties_ascending() {
        let mut engine = IndexEngine::default();
        // Identical fundamentals -> identical scores; order must fall back
        // to ascending company name.
        engine
            .load(vec![
                record("Zeta", "Tech", 2022, 10.0, 5.0),
                record("Alpha", "Tech", 2022, 10.0, 5.0),
                record("Mid", "Tech", 2022, 10.0, 9.0),
            ])
            .unwrap();
        let picks = engine.recommend(Strategy::Balanced, 3);
        let names: Vec<&str> = picks.iter().map(|p| p.record.company_name.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
        assert!(picks[0].score >= picks[1].score);
        assert_eq!(picks[1].score, picks[2].score);
    }

    #[test]
    fn recommend_caps_at_n() {
        let mut engine = IndexEngine::default();
        engine
            .load(vec![
                record("A", "Tech", 2022, 10.0, 5.0),
                record("B", "Tech", 2022, 12.0, 6.0),
                record("C", "Tech", 2022, 14.0, 7.0),
            ])
            .unwrap();
        assert_eq!(engine.recommend(Strategy::GrowthFocus, 2).len(), 2);
        assert_eq!(engine.recommend(Strategy::GrowthFocus, 9).len(), 3);
        assert!(engine.recommend(Strategy::GrowthFocus, 0).is_empty());
    }
}
