use serde::Serialize;

use crate::config::ComparableUnit;

/// Values read off a unit for comparison. Nothing here is stored on the unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitMetrics {
    pub total_area: Option<f64>,
    pub built_area: Option<f64>,
    pub parking_spaces: u32,
    pub sale_price: Option<f64>,
    pub cost_price: Option<f64>,
    /// Sale price over built area, when both are positive
    pub price_per_area: Option<f64>,
    pub bedrooms: u32,
    pub suites: u32,
    pub bathrooms: f64,
    pub features: Features,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Features {
    pub upper_floor: bool,
    pub basement: bool,
    pub gourmet: bool,
    pub barbecue: bool,
    pub pool: bool,
    pub wine_cellar: bool,
    pub climate_controlled_cellar: bool,
    pub office: bool,
    pub library: bool,
    pub garden: bool,
    pub deck: bool,
}

impl Features {
    /// Fixed awards for special features: upper floor, basement, gourmet area
    /// and pool are worth 5 each, an office 3 and a library 2.
    pub fn points(&self) -> u32 {
        let awards: [(bool, u32); 6] = [
            (self.upper_floor, 5),
            (self.basement, 5),
            (self.gourmet, 5),
            (self.pool, 5),
            (self.office, 3),
            (self.library, 2),
        ];
        awards
            .into_iter()
            .filter_map(|(present, points)| present.then_some(points))
            .sum()
    }
}

impl UnitMetrics {
    pub fn of(unit: &ComparableUnit) -> Self {
        let floors = &unit.floors;
        let ground = floors.ground.as_ref();
        let upper = floors.upper.as_ref();

        let rooms = ground
            .map(|g| g.rooms.iter())
            .into_iter()
            .flatten()
            .chain(upper.map(|u| u.rooms.iter()).into_iter().flatten());

        let (bedrooms, suites) = rooms.fold((0, 0), |(all, suites), room| {
            (all + 1, suites + u32::from(room.is_suite))
        });

        let social =
            ground.map_or(0, |g| g.social_bathrooms) + upper.map_or(0, |u| u.social_bathrooms);
        let half = if ground.is_some_and(|g| g.half_bath) { 0.5 } else { 0.0 };
        let bathrooms = f64::from(social + suites) + half;

        let gourmet = ground.and_then(|g| g.gourmet.as_ref());
        let cellar = floors.basement.as_ref().and_then(|b| b.wine_cellar.as_ref());
        let outdoor = floors.outdoor.as_ref();

        let features = Features {
            upper_floor: upper.is_some(),
            basement: floors.basement.is_some(),
            gourmet: gourmet.is_some(),
            barbecue: gourmet.is_some_and(|g| g.barbecue),
            pool: outdoor.is_some_and(|o| o.pool),
            wine_cellar: cellar.is_some(),
            climate_controlled_cellar: cellar.is_some_and(|c| c.climate_controlled),
            office: ground.is_some_and(|g| g.office),
            library: upper.is_some_and(|u| u.library),
            garden: outdoor.is_some_and(|o| o.garden),
            deck: outdoor.is_some_and(|o| o.deck),
        };

        let built_area = positive(unit.built_area);
        let sale_price = positive(unit.sale_price);
        let price_per_area = match (sale_price, built_area) {
            (Some(price), Some(area)) => Some(price / area),
            _ => None,
        };

        Self {
            total_area: positive(unit.total_area),
            built_area,
            parking_spaces: unit.parking_spaces.unwrap_or(0),
            sale_price,
            cost_price: positive(unit.cost_price),
            price_per_area,
            bedrooms,
            suites,
            bathrooms,
            features,
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Basement, FloorDetails, GourmetArea, GroundFloor, OutdoorArea, Room, UpperFloor,
        WineCellar,
    };

    fn room(is_suite: bool) -> Room {
        Room {
            name: String::new(),
            is_suite,
        }
    }

    #[test]
    fn counts_rooms_and_bathrooms_across_floors() {
        let unit = ComparableUnit {
            floors: FloorDetails {
                ground: Some(GroundFloor {
                    rooms: vec![room(false), room(true)],
                    social_bathrooms: 1,
                    half_bath: true,
                    ..Default::default()
                }),
                upper: Some(UpperFloor {
                    rooms: vec![room(true), room(true), room(false)],
                    social_bathrooms: 2,
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let metrics = UnitMetrics::of(&unit);
        assert_eq!(metrics.bedrooms, 5);
        assert_eq!(metrics.suites, 3);
        assert_eq!(metrics.bathrooms, 1.0 + 2.0 + 3.0 + 0.5);
        assert!(metrics.features.upper_floor);
        assert!(!metrics.features.basement);
    }

    #[test]
    fn missing_branches_read_as_absent() {
        let metrics = UnitMetrics::of(&ComparableUnit::default());
        assert_eq!(metrics.bedrooms, 0);
        assert_eq!(metrics.bathrooms, 0.0);
        assert_eq!(metrics.features, Features::default());
        assert_eq!(metrics.features.points(), 0);
        assert!(metrics.price_per_area.is_none());
    }

    #[test]
    fn nested_features_are_detected() {
        let unit = ComparableUnit {
            floors: FloorDetails {
                ground: Some(GroundFloor {
                    office: true,
                    gourmet: Some(GourmetArea { barbecue: true }),
                    ..Default::default()
                }),
                upper: Some(UpperFloor {
                    library: true,
                    ..Default::default()
                }),
                basement: Some(Basement {
                    wine_cellar: Some(WineCellar {
                        climate_controlled: false,
                    }),
                }),
                outdoor: Some(OutdoorArea {
                    pool: true,
                    garden: false,
                    deck: true,
                }),
            },
            ..Default::default()
        };

        let features = UnitMetrics::of(&unit).features;
        assert!(features.gourmet && features.barbecue);
        assert!(features.wine_cellar && !features.climate_controlled_cellar);
        assert!(features.pool && features.deck && !features.garden);
        assert_eq!(features.points(), 25);
    }

    #[test]
    fn price_per_area_needs_positive_inputs() {
        let mut unit = ComparableUnit {
            built_area: Some(150.0),
            sale_price: Some(300000.0),
            ..Default::default()
        };
        assert_eq!(UnitMetrics::of(&unit).price_per_area, Some(2000.0));

        unit.built_area = Some(0.0);
        assert_eq!(UnitMetrics::of(&unit).price_per_area, None);
        assert_eq!(UnitMetrics::of(&unit).built_area, None);

        unit.built_area = Some(f64::INFINITY);
        assert_eq!(UnitMetrics::of(&unit).built_area, None);
        assert_eq!(UnitMetrics::of(&unit).price_per_area, None);
    }
}
