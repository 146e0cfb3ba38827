use serde::{Deserialize, Serialize};

use crate::collections::hashmap::ChainedMap;
use crate::core::error::{Error, ErrorKind, Result};
use crate::engine::store::{normalize_key, IndexEngine};

/// Fitted line `price = intercept + slope * year`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    fn flat(level: f64) -> Self {
        LinearFit {
            slope: 0.0,
            intercept: level,
        }
    }
}

/// Closed-form OLS on the single-variable normal equations.
///
/// `SingularMatrix` for degenerate designs (fewer than two points, or
/// zero variance in `xs`); `DimensionMismatch` for unequal input lengths.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(Error::new(
            ErrorKind::DimensionMismatch,
            format!("{} predictors vs {} responses", xs.len(), ys.len()),
        ));
    }
    if xs.len() < 2 {
        return Err(Error::new(
            ErrorKind::SingularMatrix,
            format!("{} points cannot determine a line", xs.len()),
        ));
    }
    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(Error::new(
            ErrorKind::SingularMatrix,
            "zero variance in predictor".to_string(),
        ));
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Ok(LinearFit { slope, intercept })
}

/// OLS fit with the documented degenerate-design fallback: a singular
/// design becomes a flat line at the mean response instead of an error.
pub fn fit_or_flat(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    match fit_line(xs, ys) {
        Ok(fit) => Ok(fit),
        Err(err) if err.kind == ErrorKind::SingularMatrix => {
            let level = if ys.is_empty() {
                0.0
            } else {
                ys.iter().sum::<f64>() / ys.len() as f64
            };
            Ok(LinearFit::flat(level))
        }
        Err(err) => Err(err),
    }
}

/// In-sample fit quality over all fitted points. Not a held-out split:
/// the diagnostics describe how well the lines reproduce the data they
/// were fitted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub r2: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub points: usize,
}

impl FitDiagnostics {
    fn empty() -> Self {
        FitDiagnostics {
            r2: 0.0,
            mse: 0.0,
            rmse: 0.0,
            mae: 0.0,
            points: 0,
        }
    }
}

pub fn diagnostics(truths: &[f64], predictions: &[f64]) -> Result<FitDiagnostics> {
    if truths.len() != predictions.len() {
        return Err(Error::new(
            ErrorKind::DimensionMismatch,
            format!("{} truths vs {} predictions", truths.len(), predictions.len()),
        ));
    }
    if truths.is_empty() {
        return Ok(FitDiagnostics::empty());
    }
    let n = truths.len() as f64;
    let mean = truths.iter().sum::<f64>() / n;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_sum = 0.0;
    for (truth, prediction) in truths.iter().zip(predictions) {
        let err = truth - prediction;
        ss_res += err * err;
        abs_sum += err.abs();
        let spread = truth - mean;
        ss_tot += spread * spread;
    }
    let r2 = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };
    let mse = ss_res / n;
    Ok(FitDiagnostics {
        r2,
        mse,
        rmse: mse.sqrt(),
        mae: abs_sum / n,
        points: truths.len(),
    })
}

/// Next-year price prediction for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyForecast {
    pub company: String,
    pub predicted_year: i32,
    pub predicted_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub forecasts: Vec<CompanyForecast>,
    pub diagnostics: FitDiagnostics,
}

impl IndexEngine {
    /// Fit the company's year/price series and predict the year after its
    /// last record. `None` for an unknown company.
    pub fn forecast_next_year(&self, name: &str) -> Option<CompanyForecast> {
        let series = self.company_history(name);
        let latest = series.last()?;
        let xs: Vec<f64> = series.iter().map(|r| r.year as f64).collect();
        let ys: Vec<f64> = series.iter().map(|r| r.price).collect();
        let fit = fit_or_flat(&xs, &ys).ok()?;
        Some(CompanyForecast {
            company: latest.company_name.clone(),
            predicted_year: latest.year + 1,
            predicted_price: fit.predict((latest.year + 1) as f64),
        })
    }

    /// Per-company fits for the whole arena plus aggregate in-sample
    /// diagnostics over the union of fitted points.
    pub fn forecast_all(&self) -> Result<ForecastReport> {
        let mut seen: ChainedMap<String, ()> = ChainedMap::new();
        let mut forecasts = Vec::new();
        let mut truths = Vec::new();
        let mut predictions = Vec::new();

        for record in self.records.iter() {
            let key = normalize_key(&record.company_name);
            if seen.contains(&key) {
                continue;
            }
            seen.insert(key, ());

            let series = self.company_history(&record.company_name);
            let xs: Vec<f64> = series.iter().map(|r| r.year as f64).collect();
            let ys: Vec<f64> = series.iter().map(|r| r.price).collect();
            let fit = fit_or_flat(&xs, &ys)?;
            for (x, y) in xs.iter().zip(&ys) {
                truths.push(*y);
                predictions.push(fit.predict(*x));
            }
            let Some(latest) = series.last() else {
                continue;
            };
            forecasts.push(CompanyForecast {
                company: latest.company_name.clone(),
                predicted_year: latest.year + 1,
                predicted_price: fit.predict((latest.year + 1) as f64),
            });
        }

        Ok(ForecastReport {
            forecasts,
            diagnostics: diagnostics(&truths, &predictions)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::tests::record;

    fn series_engine(points: &[(i32, f64)]) -> IndexEngine {
        let mut records = Vec::new();
        for &(year, price) in points {
            let mut r = record("Acme", "Tech", year, 10.0, 5.0);
            r.price = price;
            r.compute_derived();
            records.push(r);
        }
        let mut engine = IndexEngine::default();
        engine.load(records).unwrap();
        engine
    }

    #[test]
    fn exact_linear_series_is_recovered() {
        let fit = fit_line(&[2020.0, 2021.0, 2022.0], &[100.0, 110.0, 120.0]).unwrap();
        assert!((fit.slope - 10.0).abs() < 1e-6);
        assert!((fit.predict(2023.0) - 130.0).abs() < 1e-6);
    }

    #[test]
    fn singular_designs_are_reported() {
        assert_eq!(
            fit_line(&[2020.0], &[5.0]).unwrap_err().kind,
            ErrorKind::SingularMatrix
        );
        assert_eq!(
            fit_line(&[2020.0, 2020.0], &[5.0, 15.0]).unwrap_err().kind,
            ErrorKind::SingularMatrix
        );
        assert_eq!(
            fit_line(&[1.0, 2.0], &[5.0]).unwrap_err().kind,
            ErrorKind::DimensionMismatch
        );
    }

    #[test]
    fn fallback_is_flat_at_mean() {
        let fit = fit_or_flat(&[2020.0, 2020.0], &[10.0, 30.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert!((fit.predict(2021.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_next_year_extends_the_line() {
        let engine = series_engine(&[(2020, 100.0), (2021, 110.0), (2022, 120.0)]);
        let forecast = engine.forecast_next_year("Acme").unwrap();
        assert_eq!(forecast.predicted_year, 2023);
        assert!((forecast.predicted_price - 130.0).abs() < 1e-6);
        assert!(engine.forecast_next_year("Ghost").is_none());
    }

    #[test]
    fn single_point_company_forecasts_flat() {
        let engine = series_engine(&[(2022, 75.0)]);
        let forecast = engine.forecast_next_year("Acme").unwrap();
        assert_eq!(forecast.predicted_year, 2023);
        assert!((forecast.predicted_price - 75.0).abs() < 1e-9);
    }

    #[test]
    fn report_diagnostics_for_perfect_fit() {
        let mut records = Vec::new();
        for (year, price) in [(2020, 100.0), (2021, 110.0), (2022, 120.0)] {
            let mut r = record("Linear", "Tech", year, 10.0, 5.0);
            r.price = price;
            records.push(r);
        }
        for (year, price) in [(2020, 50.0), (2021, 60.0)] {
            let mut r = record("Other", "Tech", year, 12.0, 4.0);
            r.price = price;
            records.push(r);
        }
        let mut engine = IndexEngine::default();
        engine.load(records).unwrap();

        let report = engine.forecast_all().unwrap();
        assert_eq!(report.forecasts.len(), 2);
        assert_eq!(report.diagnostics.points, 5);
        assert!((report.diagnostics.r2 - 1.0).abs() < 1e-9);
        assert!(report.diagnostics.rmse < 1e-6);
        assert!(report.diagnostics.mae < 1e-6);
    }

    #[test]
    fn empty_engine_reports_empty_diagnostics() {
        let engine = IndexEngine::default();
        let report = engine.forecast_all().unwrap();
        assert!(report.forecasts.is_empty());
        assert_eq!(report.diagnostics.points, 0);
        assert_eq!(report.diagnostics.r2, 0.0);
    }

    #[test]
    fn diagnostics_flag_mismatched_lengths() {
        assert_eq!(
            diagnostics(&[1.0, 2.0], &[1.0]).unwrap_err().kind,
            ErrorKind::DimensionMismatch
        );
    }

    #[test]
    fn constant_series_has_unit_r2() {
        // Zero total variance: the flat fit explains everything.
        let d = diagnostics(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(d.r2, 1.0);
    }
}
