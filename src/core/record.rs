use serde::{Deserialize, Serialize};

/// One company/year row of stock fundamentals.
///
/// Raw fields come from the ingestion layer; the four derived metrics are
/// computed once after validation and the record is immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub company_name: String,
    pub sector: String,
    pub year: i32,
    pub price: f64,
    pub latest_eps: f64,
    pub eps_last_quarter: f64,
    pub last_annual_eps: f64,
    pub pe: f64,
    pub expected_pe: f64,
    pub expected_growth: f64,
    pub peg: f64,
    pub book_value: f64,
    pub expected_book_value: f64,
    pub pb: f64,
    pub expected_pb: f64,
    pub roe: f64,
    pub expected_roe: f64,
    pub equity_to_asset: f64,
    pub roa: f64,
    pub last_dividend: f64,
    pub expected_dividend: f64,

    // Derived after validation.
    pub dividend_yield: f64,
    pub peg_ratio: f64,
    pub book_value_growth: f64,
    pub asset_return: f64,

    pub valid: bool,
}

impl Record {
    /// Compute the derived metrics. Zero denominators yield zero, not NaN.
    pub fn compute_derived(&mut self) {
        self.dividend_yield = if self.price > 0.0 && self.last_dividend != 0.0 {
            (self.last_dividend / self.price) * 100.0
        } else {
            0.0
        };
        self.peg_ratio = if self.expected_growth != 0.0 {
            self.pe / self.expected_growth
        } else {
            0.0
        };
        self.book_value_growth = if self.book_value != 0.0 {
            (self.expected_book_value - self.book_value) / self.book_value
        } else {
            0.0
        };
        self.asset_return = self.roe * self.equity_to_asset;
    }

    /// Field-level sanity bounds. Sets the `valid` flag instead of failing.
    pub fn validate(&mut self) {
        self.valid = self.price > 0.0
            && (0.0..=2000.0).contains(&self.pe)
            && (-100.0..=100.0).contains(&self.roe)
            && !self.company_name.is_empty()
            && !self.sector.is_empty();
    }

    /// Qualitative outlook from expected-vs-current fundamentals.
    pub fn trend(&self) -> Trend {
        let mut score = 0;
        if self.expected_roe > self.roe {
            score += 1;
        } else if self.expected_roe < self.roe {
            score -= 1;
        }
        if self.expected_pe < self.pe {
            score += 1;
        } else if self.expected_pe > self.pe {
            score -= 1;
        }
        if self.expected_growth > 0.0 {
            score += 1;
        }
        if score >= 2 {
            Trend::Improving
        } else if score <= -1 {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Numeric metrics addressable by sort and range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    LatestEps,
    Pe,
    BookValue,
    Roe,
    LastDividend,
    Price,
    ExpectedGrowth,
    DividendYield,
}

impl Metric {
    pub fn value(&self, record: &Record) -> f64 {
        match self {
            Metric::LatestEps => record.latest_eps,
            Metric::Pe => record.pe,
            Metric::BookValue => record.book_value,
            Metric::Roe => record.roe,
            Metric::LastDividend => record.last_dividend,
            Metric::Price => record.price,
            Metric::ExpectedGrowth => record.expected_growth,
            Metric::DividendYield => record.dividend_yield,
        }
    }
}
