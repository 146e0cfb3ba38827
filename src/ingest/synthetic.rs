use rand::Rng;

use crate::core::config::Config;
use crate::core::record::Record;

/// Annual drift applied per year of horizon.
const ANNUAL_DRIFT: f64 = 0.03;
/// Uniform noise half-widths per metric family.
const PRICE_NOISE: f64 = 0.05;
const EPS_NOISE: f64 = 0.04;
const PE_NOISE: f64 = 0.03;

/// Synthetic yearly variants of a base record.
///
/// Each year out to the configured horizon gets a drifted copy: the
/// price, earnings and valuation families are scaled by their own noisy
/// growth factor, `equity_to_asset` stays fixed. Variants are
/// re-validated and re-derived; ones that fall outside the sanity bounds
/// are dropped.
pub fn expand_history<R: Rng>(base: &Record, config: &Config, rng: &mut R) -> Vec<Record> {
    let mut out = Vec::with_capacity(config.synthetic_years as usize);
    for offset in 1..=config.synthetic_years {
        let drift = 1.0 + ANNUAL_DRIFT * offset as f64;
        let price_factor = drift + rng.gen_range(-PRICE_NOISE..PRICE_NOISE);
        let eps_factor = drift + rng.gen_range(-EPS_NOISE..EPS_NOISE);
        let pe_factor = drift + rng.gen_range(-PE_NOISE..PE_NOISE);

        let mut variant = base.clone();
        variant.year = base.year + offset as i32;

        variant.price = base.price * price_factor;
        variant.book_value = base.book_value * price_factor;
        variant.expected_book_value = base.expected_book_value * price_factor;
        variant.last_dividend = base.last_dividend * price_factor;
        variant.expected_dividend = base.expected_dividend * price_factor;

        variant.latest_eps = base.latest_eps * eps_factor;
        variant.eps_last_quarter = base.eps_last_quarter * eps_factor;
        variant.last_annual_eps = base.last_annual_eps * eps_factor;
        variant.expected_growth = base.expected_growth * eps_factor;
        variant.roe = base.roe * eps_factor;
        variant.expected_roe = base.expected_roe * eps_factor;
        variant.roa = base.roa * eps_factor;

        variant.pe = base.pe * pe_factor;
        variant.expected_pe = base.expected_pe * pe_factor;
        variant.peg = base.peg * pe_factor;
        variant.pb = base.pb * pe_factor;
        variant.expected_pb = base.expected_pb * pe_factor;

        variant.validate();
        if !variant.valid {
            continue;
        }
        variant.compute_derived();
        out.push(variant);
    }
    out
}
