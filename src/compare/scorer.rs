use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::metrics::UnitMetrics;
use crate::config::ComparableUnit;
use crate::error::{CondoError, Result};

pub const MIN_UNITS: usize = 2;
pub const MAX_UNITS: usize = 4;

const AREA_WEIGHT: f64 = 20.0;
const BEDROOM_WEIGHT: f64 = 15.0;
const SUITE_WEIGHT: f64 = 10.0;
const COST_WEIGHT: f64 = 25.0;

/// Metrics that can be flagged as best in the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalArea,
    BuiltArea,
    Bedrooms,
    Suites,
    ParkingSpaces,
    PricePerArea,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::TotalArea,
        Metric::BuiltArea,
        Metric::Bedrooms,
        Metric::Suites,
        Metric::ParkingSpaces,
        Metric::PricePerArea,
    ];

    pub fn lower_is_better(self) -> bool {
        matches!(self, Metric::PricePerArea)
    }

    /// The unit's value for this metric, if it is eligible (present and positive)
    pub fn value(self, metrics: &UnitMetrics) -> Option<f64> {
        let value = match self {
            Metric::TotalArea => metrics.total_area,
            Metric::BuiltArea => metrics.built_area,
            Metric::Bedrooms => Some(f64::from(metrics.bedrooms)),
            Metric::Suites => Some(f64::from(metrics.suites)),
            Metric::ParkingSpaces => Some(f64::from(metrics.parking_spaces)),
            Metric::PricePerArea => metrics.price_per_area,
        };
        value.filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalArea => "total area",
            Metric::BuiltArea => "built area",
            Metric::Bedrooms => "bedrooms",
            Metric::Suites => "suites",
            Metric::ParkingSpaces => "parking spaces",
            Metric::PricePerArea => "price per m²",
        }
    }

    /// Extremum over the eligible values; `None` when no unit qualifies
    fn extremum(self, group: &[UnitMetrics]) -> Option<f64> {
        let values = group.iter().filter_map(|m| self.value(m));
        if self.lower_is_better() {
            values.reduce(f64::min)
        } else {
            values.reduce(f64::max)
        }
    }

    /// Winning value for the group. A metric needs at least two eligible
    /// values to have a winner.
    fn best(self, group: &[UnitMetrics]) -> Option<f64> {
        let eligible = group.iter().filter(|m| self.value(m).is_some()).count();
        if eligible < 2 {
            return None;
        }
        self.extremum(group)
    }
}

/// Result of comparing one unit against the rest of the group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitComparison {
    pub unit_id: String,
    pub name: String,
    pub metrics: UnitMetrics,
    pub score: u8,
    pub best_in: Vec<Metric>,
    pub best_overall: bool,
}

impl UnitComparison {
    pub fn is_best(&self, metric: Metric) -> bool {
        self.best_in.contains(&metric)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub units: Vec<UnitComparison>,
    /// Winning value per metric; metrics with fewer than two eligible
    /// values are absent
    pub best_values: BTreeMap<Metric, f64>,
}

impl ComparisonResult {
    /// Units sharing the top score (ties are kept)
    pub fn winners(&self) -> impl Iterator<Item = &UnitComparison> {
        self.units.iter().filter(|u| u.best_overall)
    }
}

/// Score 2 to 4 units side by side.
///
/// The caller's units are only read. The result is rebuilt from scratch on
/// every call.
pub fn compare(units: &[ComparableUnit]) -> Result<ComparisonResult> {
    if !(MIN_UNITS..=MAX_UNITS).contains(&units.len()) {
        return Err(CondoError::ComparisonSize(units.len()));
    }

    let group: Vec<UnitMetrics> = units.iter().map(UnitMetrics::of).collect();
    let best_values: BTreeMap<Metric, f64> = Metric::ALL
        .into_iter()
        .filter_map(|metric| metric.best(&group).map(|best| (metric, best)))
        .collect();
    let extremes: BTreeMap<Metric, f64> = Metric::ALL
        .into_iter()
        .filter_map(|metric| metric.extremum(&group).map(|value| (metric, value)))
        .collect();

    let mut comparisons: Vec<UnitComparison> = units
        .iter()
        .zip(group)
        .map(|(unit, metrics)| {
            let best_in = Metric::ALL
                .into_iter()
                .filter(|metric| {
                    let best = best_values.get(metric).copied();
                    best.is_some_and(|b| b != 0.0) && metric.value(&metrics) == best
                })
                .collect();
            let score = score(&metrics, &extremes);
            UnitComparison {
                unit_id: unit.id.clone(),
                name: unit.name.clone(),
                metrics,
                score,
                best_in,
                best_overall: false,
            }
        })
        .collect();

    if let Some(top) = comparisons.iter().map(|c| c.score).max() {
        for comparison in comparisons.iter_mut() {
            comparison.best_overall = comparison.score == top;
        }
    }

    debug!(
        units = comparisons.len(),
        scores = ?comparisons.iter().map(|c| c.score).collect::<Vec<_>>(),
        "compared units"
    );

    Ok(ComparisonResult {
        units: comparisons,
        best_values,
    })
}

/// Weighted total against the group extremes. A lone eligible value is still
/// its own reference point here, even though it wins no flag.
fn score(metrics: &UnitMetrics, best: &BTreeMap<Metric, f64>) -> u8 {
    let ratio = |value: Option<f64>, group_best: Option<f64>| match (value, group_best) {
        (Some(v), Some(b)) if b > 0.0 => v / b,
        _ => 0.0,
    };

    let area = ratio(metrics.total_area, best.get(&Metric::TotalArea).copied()) * AREA_WEIGHT;
    let bedrooms = ratio(
        Some(f64::from(metrics.bedrooms)),
        best.get(&Metric::Bedrooms).copied(),
    ) * BEDROOM_WEIGHT;
    let best_suites = best.get(&Metric::Suites).copied().unwrap_or(0.0).max(1.0);
    let suites = f64::from(metrics.suites) / best_suites * SUITE_WEIGHT;
    let features = f64::from(metrics.features.points());
    // Cheapest price per m² over this unit's price per m².
    let cost = match (best.get(&Metric::PricePerArea), metrics.price_per_area) {
        (Some(min), Some(own)) if *min > 0.0 && own > 0.0 => min / own * COST_WEIGHT,
        _ => 0.0,
    };

    let total = area + bedrooms + suites + features + cost;
    total.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FloorDetails, GroundFloor, OutdoorArea, Room, UpperFloor};

    fn unit(id: &str, total: f64, built: f64, price: f64) -> ComparableUnit {
        ComparableUnit {
            id: id.to_string(),
            name: id.to_uppercase(),
            total_area: Some(total),
            built_area: Some(built),
            sale_price: Some(price),
            ..Default::default()
        }
    }

    fn rooms(count: usize, suites: usize) -> Vec<Room> {
        (0..count)
            .map(|i| Room {
                name: format!("room {}", i + 1),
                is_suite: i < suites,
            })
            .collect()
    }

    #[test]
    fn flags_area_and_price_winners() {
        let a = unit("a", 200.0, 150.0, 300000.0);
        let b = unit("b", 150.0, 150.0, 250000.0);
        let result = compare(&[a, b]).unwrap();

        let (a, b) = (&result.units[0], &result.units[1]);
        assert!(a.is_best(Metric::TotalArea));
        assert!(!b.is_best(Metric::TotalArea));
        assert!(b.is_best(Metric::PricePerArea));
        assert!(!a.is_best(Metric::PricePerArea));
        // Equal built area: both share the flag.
        assert!(a.is_best(Metric::BuiltArea) && b.is_best(Metric::BuiltArea));
    }

    #[test]
    fn strict_winner_is_the_only_flagged_unit() {
        let mut a = unit("a", 100.0, 80.0, 100000.0);
        let mut b = unit("b", 100.0, 80.0, 100000.0);
        let c = unit("c", 100.0, 80.0, 100000.0);
        a.parking_spaces = Some(3);
        b.parking_spaces = Some(2);

        let result = compare(&[a, b, c]).unwrap();
        let flagged: Vec<_> = result
            .units
            .iter()
            .filter(|u| u.is_best(Metric::ParkingSpaces))
            .map(|u| u.unit_id.as_str())
            .collect();
        assert_eq!(flagged, vec!["a"]);
    }

    #[test]
    fn zero_and_missing_values_never_win() {
        let mut a = unit("a", 100.0, 80.0, 100000.0);
        let mut b = unit("b", 100.0, 80.0, 100000.0);
        a.total_area = None;
        b.total_area = Some(0.0);
        a.sale_price = None;

        let result = compare(&[a, b]).unwrap();
        assert!(!result.best_values.contains_key(&Metric::TotalArea));
        assert!(!result.best_values.contains_key(&Metric::Bedrooms));
        for comparison in &result.units {
            assert!(!comparison.is_best(Metric::TotalArea));
            assert!(!comparison.is_best(Metric::Bedrooms));
            assert!(!comparison.is_best(Metric::Suites));
        }
        // Only b has a price per m², which is not enough for a winner.
        assert!(!result.best_values.contains_key(&Metric::PricePerArea));
        assert!(!result.units[1].is_best(Metric::PricePerArea));
    }

    #[test]
    fn single_eligible_value_has_no_winner() {
        let a = unit("a", 100.0, 80.0, 100000.0);
        let mut b = unit("b", 100.0, 80.0, 100000.0);
        b.total_area = None;

        let result = compare(&[a, b]).unwrap();
        assert!(!result.best_values.contains_key(&Metric::TotalArea));
        assert!(result.units.iter().all(|u| !u.is_best(Metric::TotalArea)));
        // The lone area still counts toward a's score: area 20 + cost 25.
        assert_eq!(result.units[0].score, 45);
        assert_eq!(result.units[1].score, 25);
    }

    #[test]
    fn non_finite_values_are_ineligible() {
        let a = unit("a", f64::INFINITY, 80.0, 100000.0);
        let b = unit("b", 100.0, 80.0, 100000.0);
        let c = unit("c", 50.0, 80.0, 100000.0);

        let result = compare(&[a, b, c]).unwrap();
        assert_eq!(result.best_values.get(&Metric::TotalArea), Some(&100.0));
        assert!(!result.units[0].is_best(Metric::TotalArea));
        assert!(result.units[1].is_best(Metric::TotalArea));
        // a loses the area component instead of scoring NaN: cost 25 only.
        assert_eq!(result.units[0].score, 25);
    }

    #[test]
    fn score_adds_weighted_components() {
        let mut a = unit("a", 200.0, 100.0, 200000.0);
        a.floors = FloorDetails {
            ground: Some(GroundFloor {
                rooms: rooms(2, 1),
                office: true,
                ..Default::default()
            }),
            upper: Some(UpperFloor {
                rooms: rooms(2, 1),
                ..Default::default()
            }),
            outdoor: Some(OutdoorArea {
                pool: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut b = unit("b", 100.0, 100.0, 400000.0);
        b.floors.ground = Some(GroundFloor {
            rooms: rooms(2, 0),
            ..Default::default()
        });

        let result = compare(&[a, b]).unwrap();
        // a: area 20 + bedrooms 15 + suites 10 + features (5 upper + 5 pool + 3 office) + cost 25
        assert_eq!(result.units[0].score, 83);
        // b: area 10 + bedrooms 7.5 + suites 0 + features 0 + cost 12.5 = 30
        assert_eq!(result.units[1].score, 30);
        assert!(result.units[0].best_overall);
        assert!(!result.units[1].best_overall);
    }

    #[test]
    fn suites_divide_by_at_least_one() {
        let a = unit("a", 100.0, 100.0, 100000.0);
        let b = unit("b", 100.0, 100.0, 100000.0);
        let result = compare(&[a, b]).unwrap();
        // area 20 + cost 25; no rooms anywhere.
        assert_eq!(result.units[0].score, 45);
    }

    #[test]
    fn ties_share_best_overall() {
        let a = unit("a", 120.0, 90.0, 180000.0);
        let b = unit("b", 120.0, 90.0, 180000.0);
        let result = compare(&[a, b]).unwrap();
        assert_eq!(result.winners().count(), 2);
    }

    #[test]
    fn group_size_is_checked() {
        let a = unit("a", 1.0, 1.0, 1.0);
        assert!(matches!(
            compare(std::slice::from_ref(&a)),
            Err(CondoError::ComparisonSize(1))
        ));
        let five = vec![a; 5];
        assert!(matches!(compare(&five), Err(CondoError::ComparisonSize(5))));
    }

    #[test]
    fn comparing_twice_gives_the_same_result() {
        let units = [
            unit("a", 200.0, 150.0, 300000.0),
            unit("b", 150.0, 150.0, 250000.0),
            unit("c", 180.0, 120.0, 260000.0),
        ];
        assert_eq!(compare(&units).unwrap(), compare(&units).unwrap());
    }
}
