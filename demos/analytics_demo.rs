/// Complete equidex API demo
///
/// Demonstrates the full query surface over a small fundamentals CSV:
/// - lookup and sector filtering
/// - heap-backed rankings and recommendations
/// - similarity neighborhoods
/// - history stats and next-year forecasts
/// - collaborator-side CSV re-export of one company's history

use equidex::core::config::Config;
use equidex::engine::recommend::Strategy;
use equidex::engine::store::IndexEngine;
use equidex::ingest::csv_parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE_CSV: &str = "\
id,price,sector,company,latest_eps,eps_last_quarter,last_annual_eps,pe,expected_pe,expected_growth,peg,book_value,expected_book_value,pb,expected_pb,roe,expected_roe,equity_to_asset,roa,last_dividend,expected_dividend
1,182.50,Technology,Aurora Semiconductors,6.1,1.6,5.8,29.9,27.0,9.5,3.1,42.0,47.0,4.3,4.1,21.0,23.0,0.62,13.0,0.9,1.0
2,94.20,Technology,Corefield Systems,4.0,1.0,3.7,23.6,22.5,7.0,3.4,31.0,33.5,3.0,2.9,17.5,18.0,0.58,10.1,0.6,0.7
3,61.80,Energy,Deepwell Resources,5.2,1.4,5.0,11.9,11.0,3.5,3.4,55.0,56.5,1.1,1.1,12.0,11.5,0.45,5.4,2.4,2.5
4,47.35,Energy,Gulf Basin Partners,4.4,1.1,4.2,10.8,10.5,2.8,3.9,48.0,49.0,1.0,1.0,10.5,10.0,0.41,4.3,2.9,3.0
5,128.90,Financials,Meridian Trust,9.8,2.5,9.4,13.2,12.8,5.0,2.6,88.0,92.0,1.5,1.4,14.8,15.5,0.12,1.8,3.6,3.8
6,73.10,Utilities,Northlake Power,3.4,0.9,3.3,21.5,20.9,3.2,6.7,39.0,40.0,1.9,1.8,9.8,9.9,0.33,3.2,3.1,3.2
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("\n=== equidex analytics demo ===\n");

    // Ingest: parse, validate, derive, expand synthetic history.
    let config = Config::default();
    let mut rng = StdRng::seed_from_u64(2022);
    let records = csv_parser::parse_records(SAMPLE_CSV.as_bytes(), &config, &mut rng)?;
    println!("ingested {} records (incl. synthetic years)", records.len());

    let mut engine = IndexEngine::new(config);
    engine.load(records)?;
    let stats = engine.stats();
    println!(
        "indexed {} records across {} sectors, {} similarity edges\n",
        stats.record_count, stats.sector_count, stats.similarity_edges
    );

    // Lookup + sector queries.
    if let Some(record) = engine.find_by_name("aurora semiconductors") {
        println!(
            "lookup: {} ({}) price {:.2} P/E {:.1}",
            record.company_name, record.sector, record.price, record.pe
        );
    }
    let energy = engine.sector_stats("Energy");
    println!(
        "Energy sector: {} records, avg P/E {:.2}, avg ROE {:.2}, price range {:.2}-{:.2}\n",
        energy.count, energy.avg_pe, energy.avg_roe, energy.min_price, energy.max_price
    );

    // Rankings off the heap snapshots.
    println!("top 3 by ROE:");
    for record in engine.top_n_roe(3) {
        println!("  {:<24} ROE {:>6.2}", record.company_name, record.roe);
    }
    println!("cheapest 3 by P/E:");
    for record in engine.lowest_n_pe(3) {
        println!("  {:<24} P/E {:>6.2}", record.company_name, record.pe);
    }

    // Strategy-weighted recommendations.
    println!("\nincome-strategy picks:");
    for pick in engine.recommend(Strategy::IncomeFocus, 3) {
        println!("  {:<24} score {:>7.3}", pick.record.company_name, pick.score);
    }

    // Similarity neighborhood of record 0.
    println!("\nnearest to record 0:");
    for (distance, record) in engine.similar(0, 3) {
        println!("  {:<24} distance {:>7.3}", record.company_name, distance);
    }

    // History + forecast for one company.
    if let Some(history) = engine.history_stats("Meridian Trust") {
        println!(
            "\nMeridian Trust {}-{}: CAGR {:.1}%, volatility {:.1}%, avg yield {:.2}%",
            history.first_year,
            history.last_year,
            history.cagr * 100.0,
            history.volatility * 100.0,
            history.avg_dividend_yield
        );
    }
    if let Some(forecast) = engine.forecast_next_year("Meridian Trust") {
        println!(
            "forecast {}: {:.2}",
            forecast.predicted_year, forecast.predicted_price
        );
    }

    let report = engine.forecast_all()?;
    println!(
        "\nfit diagnostics over {} points: R2 {:.3}, RMSE {:.3}, MAE {:.3}",
        report.diagnostics.points,
        report.diagnostics.r2,
        report.diagnostics.rmse,
        report.diagnostics.mae
    );
    println!(
        "report as JSON: {} bytes",
        serde_json::to_string(&report)?.len()
    );

    // Collaborator-side export: one company's history plus the forecast.
    export_history(&engine, "Meridian Trust", "company_history.csv")?;
    println!("wrote company_history.csv");

    Ok(())
}

/// The CSV re-export lives outside the core on purpose: it consumes
/// query results like any other collaborator.
fn export_history(
    engine: &IndexEngine,
    company: &str,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["year", "price", "kind"])?;
    for record in engine.company_history(company) {
        writer.write_record([
            record.year.to_string(),
            format!("{:.2}", record.price),
            "actual".to_string(),
        ])?;
    }
    if let Some(forecast) = engine.forecast_next_year(company) {
        writer.write_record([
            forecast.predicted_year.to_string(),
            format!("{:.2}", forecast.predicted_price),
            "predicted".to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
