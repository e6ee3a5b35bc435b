mod settings;
mod unit;

pub use settings::{Company, Config, CurrencySettings, LoggingSettings, ScheduleDefaults};
pub use unit::{
    Basement, ComparableUnit, FloorDetails, GourmetArea, GroundFloor, OutdoorArea, Room,
    UnitKind, UpperFloor, WineCellar,
};

use crate::error::{CondoError, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (XDG config dir, or ~/.condo/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "condo") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        CondoError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".condo"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Directory holding the entity store files
pub fn data_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("data")
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(CondoError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| CondoError::ConfigParse { path, source: e })
}

/// Load units.toml keyed by unit id, with each unit's `id` filled in
pub fn load_units(config_dir: &Path) -> Result<BTreeMap<String, ComparableUnit>> {
    let path = config_dir.join("units.toml");
    if !path.exists() {
        return Err(CondoError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    let mut units: BTreeMap<String, ComparableUnit> =
        toml::from_str(&content).map_err(|e| CondoError::ConfigParse { path, source: e })?;
    for (id, unit) in units.iter_mut() {
        unit.id = id.clone();
    }
    debug!(count = units.len(), "loaded unit catalog");
    Ok(units)
}

/// Pick the requested units out of the catalog, in the order given
pub fn select_units(
    catalog: &BTreeMap<String, ComparableUnit>,
    ids: &[String],
) -> Result<Vec<ComparableUnit>> {
    ids.iter()
        .map(|id| {
            catalog
                .get(id)
                .cloned()
                .ok_or_else(|| CondoError::UnitNotFound(id.clone()))
        })
        .collect()
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Condominium Administration"
# tax_id = "12.345.678/0001-90"   # optional

[currency]
symbol = "R$"

[schedule]
due_day = 10              # default day of month for installments
reserve_fund_pct = 2.0    # percent of each installment
common_fund_pct = 1.0
admin_fee_pct = 10.0
day_overflow = "roll"     # "roll" (31st of a short month moves into the next) or "clamp"

[logging]
level = "warn"            # overridden by RUST_LOG or -v
"#;

/// Template content for units.toml
pub const UNITS_TEMPLATE: &str = r#"# Define the units you want to compare. The table name (e.g., [casa-a]) is
# used as the unit identifier in the compare command.
#
# Example:
#   condo compare casa-a casa-b

[casa-a]
name = "Casa A"
kind = "house"
total_area = 200.0
built_area = 150.0
parking_spaces = 2
sale_price = 300000.0

[casa-a.floors.ground]
social_bathrooms = 1
half_bath = true
office = true
rooms = [{ name = "Quarto 1" }, { name = "Suite 1", is_suite = true }]

[casa-a.floors.ground.gourmet]
barbecue = true

[casa-a.floors.outdoor]
pool = true
garden = true

[casa-b]
name = "Casa B"
kind = "house"
total_area = 150.0
built_area = 150.0
parking_spaces = 1
sale_price = 250000.0

[casa-b.floors.ground]
social_bathrooms = 1
rooms = [{ name = "Quarto 1" }]

[casa-b.floors.upper]
social_bathrooms = 1
library = true
rooms = [{ name = "Suite 1", is_suite = true }, { name = "Suite 2", is_suite = true }]

[casa-b.floors.basement.wine_cellar]
climate_controlled = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DayOverflow;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn config_template_parses() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.currency.symbol, "R$");
        assert_eq!(config.schedule.due_day, 10);
        assert_eq!(config.schedule.reserve_fund_pct, dec!(2));
        assert_eq!(config.schedule.admin_fee_pct, dec!(10));
        assert_eq!(config.schedule.day_overflow, DayOverflow::Roll);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[company]\nname = \"Acme\"\n").unwrap();
        assert_eq!(config.currency.symbol, "R$");
        assert_eq!(config.schedule.due_day, 10);
        assert_eq!(config.schedule.admin_fee_pct, dec!(0));
    }

    #[test]
    fn units_template_loads_with_ids() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("units.toml"), UNITS_TEMPLATE).unwrap();

        let units = load_units(dir.path()).unwrap();
        let casa_a = &units["casa-a"];
        assert_eq!(casa_a.id, "casa-a");
        assert_eq!(casa_a.total_area, Some(200.0));
        let ground = casa_a.floors.ground.as_ref().unwrap();
        assert_eq!(ground.rooms.len(), 2);
        assert!(ground.gourmet.as_ref().unwrap().barbecue);

        let casa_b = &units["casa-b"];
        assert!(casa_b.floors.basement.is_some());
        assert!(casa_b.floors.ground.as_ref().unwrap().gourmet.is_none());
    }

    #[test]
    fn select_units_keeps_requested_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("units.toml"), UNITS_TEMPLATE).unwrap();
        let catalog = load_units(dir.path()).unwrap();

        let picked = select_units(&catalog, &["casa-b".into(), "casa-a".into()]).unwrap();
        assert_eq!(picked[0].id, "casa-b");
        assert_eq!(picked[1].id, "casa-a");

        assert!(matches!(
            select_units(&catalog, &["casa-z".into()]),
            Err(CondoError::UnitNotFound(id)) if id == "casa-z"
        ));
    }

    #[test]
    fn missing_units_file_is_reported() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_units(dir.path()),
            Err(CondoError::ConfigFileNotFound(_))
        ));
    }
}
