use serde::{Deserialize, Serialize};

/// A property unit as described in units.toml.
///
/// Numeric attributes are optional: a missing or non-positive value means the
/// unit does not take part in the comparison for that metric.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ComparableUnit {
    /// Table name in units.toml; filled in by the loader.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub total_area: Option<f64>,
    #[serde(default)]
    pub built_area: Option<f64>,
    #[serde(default)]
    pub parking_spaces: Option<u32>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub floors: FloorDetails,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Apartment,
    #[default]
    House,
    Lot,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Apartment => write!(f, "apartment"),
            UnitKind::House => write!(f, "house"),
            UnitKind::Lot => write!(f, "lot"),
        }
    }
}

/// Per-floor breakdown. Every branch is optional; an absent branch means the
/// unit simply does not have that floor or area.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FloorDetails {
    #[serde(default)]
    pub ground: Option<GroundFloor>,
    #[serde(default)]
    pub upper: Option<UpperFloor>,
    #[serde(default)]
    pub basement: Option<Basement>,
    #[serde(default)]
    pub outdoor: Option<OutdoorArea>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GroundFloor {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub social_bathrooms: u32,
    #[serde(default)]
    pub half_bath: bool,
    #[serde(default)]
    pub office: bool,
    #[serde(default)]
    pub gourmet: Option<GourmetArea>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct UpperFloor {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub social_bathrooms: u32,
    #[serde(default)]
    pub library: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Basement {
    #[serde(default)]
    pub wine_cellar: Option<WineCellar>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OutdoorArea {
    #[serde(default)]
    pub pool: bool,
    #[serde(default)]
    pub garden: bool,
    #[serde(default)]
    pub deck: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct GourmetArea {
    #[serde(default)]
    pub barbecue: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct WineCellar {
    #[serde(default)]
    pub climate_controlled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Room {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_suite: bool,
}
