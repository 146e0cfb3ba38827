use std::cmp::Ordering;

/// Ranking handle for the P/E tree and min-heap: metric copy + company
/// name + arena position. Ordering is P/E ascending, name ascending on
/// ties, record position last, so `Ord`-equality coincides with handle
/// identity and equal-metric records never collapse in the tree.
#[derive(Debug, Clone)]
pub struct PeKey {
    pub pe: f64,
    pub name: String,
    pub record: usize,
}

impl PeKey {
    pub fn new(pe: f64, name: String, record: usize) -> Self {
        PeKey { pe, name, record }
    }
}

impl PartialEq for PeKey {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for PeKey {}

impl Ord for PeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pe
            .total_cmp(&other.pe)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.record.cmp(&other.record))
    }
}

impl PartialOrd for PeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranking handle for the ROE max-heap. The name comparison is inverted:
/// a max-heap drains greatest-first, so on equal ROE the lexicographically
/// smaller name must compare greater to pop in ascending-name order.
#[derive(Debug, Clone)]
pub struct RoeKey {
    pub roe: f64,
    pub name: String,
    pub record: usize,
}

impl RoeKey {
    pub fn new(roe: f64, name: String, record: usize) -> Self {
        RoeKey { roe, name, record }
    }
}

impl PartialEq for RoeKey {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for RoeKey {}

impl Ord for RoeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.roe
            .total_cmp(&other.roe)
            .then_with(|| other.name.cmp(&self.name))
            .then_with(|| other.record.cmp(&self.record))
    }
}

impl PartialOrd for RoeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Recommendation-score handle, max-heap ordered like [`RoeKey`].
#[derive(Debug, Clone)]
pub struct ScoreKey {
    pub score: f64,
    pub name: String,
    pub record: usize,
}

impl ScoreKey {
    pub fn new(score: f64, name: String, record: usize) -> Self {
        ScoreKey {
            score,
            name,
            record,
        }
    }
}

impl PartialEq for ScoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for ScoreKey {}

impl Ord for ScoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.name.cmp(&self.name))
            .then_with(|| other.record.cmp(&self.record))
    }
}

impl PartialOrd for ScoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
