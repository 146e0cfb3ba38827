#[derive(Debug, Clone)]
pub struct Config {
    /// Fiscal year assigned to base CSV rows.
    pub base_year: i32,
    /// Synthetic yearly variants generated per base record on ingest.
    pub synthetic_years: u32,
    /// Euclidean distance below which two records are linked in the
    /// similarity graph (strict `<`).
    pub similarity_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_year: 2022,
            synthetic_years: 10,
            similarity_threshold: 0.3,
        }
    }
}
