use csv::WriterBuilder;
use std::io::Write;

use super::{ComparisonResult, UnitComparison};
use crate::error::Result;

/// Write the comparison table as CSV: one column per unit, one row per metric.
pub fn write_csv<W: Write>(w: W, result: &ComparisonResult) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(w);

    let mut header = vec!["metric".to_string()];
    header.extend(result.units.iter().map(|u| u.name.clone()));
    wtr.write_record(&header)?;

    for (label, cell) in rows() {
        let mut record = vec![label.to_string()];
        record.extend(result.units.iter().map(cell));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

type Cell = fn(&UnitComparison) -> String;

fn rows() -> [(&'static str, Cell); 20] {
    [
        ("total area (m²)", |u| number(u.metrics.total_area)),
        ("built area (m²)", |u| number(u.metrics.built_area)),
        ("sale price", |u| number(u.metrics.sale_price)),
        ("cost price", |u| number(u.metrics.cost_price)),
        ("price per m²", |u| number(u.metrics.price_per_area)),
        ("bedrooms", |u| u.metrics.bedrooms.to_string()),
        ("suites", |u| u.metrics.suites.to_string()),
        ("bathrooms", |u| u.metrics.bathrooms.to_string()),
        ("parking spaces", |u| u.metrics.parking_spaces.to_string()),
        ("upper floor", |u| yes_no(u.metrics.features.upper_floor)),
        ("basement", |u| yes_no(u.metrics.features.basement)),
        ("gourmet area", |u| yes_no(u.metrics.features.gourmet)),
        ("barbecue", |u| yes_no(u.metrics.features.barbecue)),
        ("pool", |u| yes_no(u.metrics.features.pool)),
        ("wine cellar", |u| yes_no(u.metrics.features.wine_cellar)),
        ("office", |u| yes_no(u.metrics.features.office)),
        ("library", |u| yes_no(u.metrics.features.library)),
        ("garden", |u| yes_no(u.metrics.features.garden)),
        ("deck", |u| yes_no(u.metrics.features.deck)),
        ("score", |u| u.score.to_string()),
    ]
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}
