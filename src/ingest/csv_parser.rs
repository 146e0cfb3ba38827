use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rand::Rng;
use tracing::warn;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::record::Record;
use crate::ingest::synthetic;

/// A fundamentals row needs the price/sector/name columns plus the 17
/// metric columns.
const MIN_COLUMNS: usize = 21;

/// Parse a fundamentals CSV file into validated records with derived
/// metrics and synthetic history applied.
pub fn load_csv(path: &Path, config: &Config) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    parse_records(file, config, &mut rand::thread_rng())
}

/// Parse fundamentals rows from any reader.
///
/// Malformed or short rows are skipped with a warning, unparseable
/// numeric tokens fall back to zero (and usually fail validation), and
/// every surviving base row is expanded into its synthetic year series.
pub fn parse_records<R: Read, G: Rng>(
    reader: R,
    config: &Config,
    rng: &mut G,
) -> Result<Vec<Record>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, parsed) in csv_reader.records().enumerate() {
        let columns = match parsed {
            Ok(columns) => columns,
            Err(err) => {
                warn!(row, %err, "skipping unreadable row");
                continue;
            }
        };
        if columns.len() < MIN_COLUMNS {
            warn!(row, columns = columns.len(), "skipping short row");
            continue;
        }

        let mut record = Record {
            price: parse_number(columns.get(1)),
            sector: field(columns.get(2)),
            company_name: field(columns.get(3)),
            year: config.base_year,
            latest_eps: parse_number(columns.get(4)),
            eps_last_quarter: parse_number(columns.get(5)),
            last_annual_eps: parse_number(columns.get(6)),
            pe: parse_number(columns.get(7)),
            expected_pe: parse_number(columns.get(8)),
            expected_growth: parse_number(columns.get(9)),
            peg: parse_number(columns.get(10)),
            book_value: parse_number(columns.get(11)),
            expected_book_value: parse_number(columns.get(12)),
            pb: parse_number(columns.get(13)),
            expected_pb: parse_number(columns.get(14)),
            roe: parse_number(columns.get(15)),
            expected_roe: parse_number(columns.get(16)),
            equity_to_asset: parse_number(columns.get(17)),
            roa: parse_number(columns.get(18)),
            last_dividend: parse_number(columns.get(19)),
            expected_dividend: parse_number(columns.get(20)),
            ..Record::default()
        };
        record.validate();
        if !record.valid {
            warn!(row, company = %record.company_name, "skipping row that failed validation");
            continue;
        }
        record.compute_derived();

        let variants = synthetic::expand_history(&record, config, rng);
        records.push(record);
        records.extend(variants);
    }
    Ok(records)
}

fn field(token: Option<&str>) -> String {
    token.unwrap_or("").trim().to_string()
}

/// Numeric token with optional embedded thousands separators. Anything
/// unparseable becomes 0.0, matching the lenient source format.
fn parse_number(token: Option<&str>) -> f64 {
    let cleaned: String = token
        .unwrap_or("")
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}
