//! Economy configuration: bounds, costs, generation ranges and the component catalog.
//!
//! [`EconomyConfig::default`] is the built-in game. YAML documents may override
//! any subset of fields; omitted fields keep their defaults.

use crate::crew::{MAX_MORALE, MAX_SKILL};
use crate::resources::{ResourceBounds, ResourceKind, Resources};
use crate::ship::{ComponentCategory, ComponentSpec, ShipStats};
use crate::state::{validate_state, GameState, InvariantViolation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Longest accepted tick interval or notification lifetime: one day.
pub const MAX_INTERVAL_MS: u64 = 86_400_000;

/// Inclusive integer range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedRange {
    pub min: u32,
    pub max: u32,
}

impl ClosedRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Action costs. Every cost is a full resource bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Costs {
    pub train_crew: Resources,
    pub boost_morale: Resources,
    pub recruit_crew: Resources,
    pub explore_system: Resources,
    pub establish_colony: Resources,
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            train_crew: Resources::single(ResourceKind::Credits, Decimal::from(100)),
            boost_morale: Resources::single(ResourceKind::Credits, Decimal::from(50)),
            recruit_crew: Resources::single(ResourceKind::Credits, Decimal::from(200)),
            explore_system: Resources::single(ResourceKind::Energy, Decimal::from(50)),
            establish_colony: Resources::from_units(500, 0, 200, 0, 0),
        }
    }
}

/// Ranges for randomly generated recruits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewGeneration {
    pub skill: ClosedRange,
    pub morale: ClosedRange,
    pub age: ClosedRange,
}

impl Default for CrewGeneration {
    fn default() -> Self {
        Self {
            skill: ClosedRange::new(1, 5),
            morale: ClosedRange::new(60, 90),
            age: ClosedRange::new(20, 45),
        }
    }
}

/// Ranges for planets produced by a survey.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetGeneration {
    pub count: ClosedRange,
    pub resource_tags: ClosedRange,
}

impl Default for PlanetGeneration {
    fn default() -> Self {
        Self {
            count: ClosedRange::new(1, 3),
            resource_tags: ClosedRange::new(1, 2),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub bounds: ResourceBounds,
    pub costs: Costs,
    /// Morale added to every crew member by a boost.
    pub morale_boost: u8,
    /// Units moved by one trade.
    pub trade_quantity: Decimal,
    /// Per-tick generation added for each matching tag of a new colony.
    pub colony_rate_increment: Decimal,
    /// Heirs must be strictly younger than this.
    pub heir_max_age: u8,
    pub crew_generation: CrewGeneration,
    pub planet_generation: PlanetGeneration,
    pub starting_resources: Resources,
    pub generation_rates: Resources,
    pub tick_interval_ms: u64,
    pub notification_ttl_ms: u64,
    pub rng_seed: u64,
    pub catalog: Vec<ComponentSpec>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            bounds: ResourceBounds::default(),
            costs: Costs::default(),
            morale_boost: 10,
            trade_quantity: Decimal::from(10),
            colony_rate_increment: Decimal::ONE,
            heir_max_age: 40,
            crew_generation: CrewGeneration::default(),
            planet_generation: PlanetGeneration::default(),
            starting_resources: Resources::from_units(1000, 100, 50, 100, 10),
            generation_rates: Resources::from_units(10, 5, 2, 3, 1),
            tick_interval_ms: 3000,
            notification_ttl_ms: 5000,
            rng_seed: 42,
            catalog: default_catalog(),
        }
    }
}

/// Configuration rejected by [`EconomyConfig::validate`] or the YAML loader.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("range {0} has min greater than max")]
    InvertedRange(&'static str),
    #[error("range {0} exceeds its allowed limits")]
    RangeOutOfLimits(&'static str),
    #[error("bounds for {0} have min greater than max")]
    InvertedBound(ResourceKind),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("generation rate for {0} must not be negative")]
    NegativeRate(ResourceKind),
    #[error("starting {0} is outside its bounds")]
    StartOutOfBounds(ResourceKind),
    #[error("{0} exceeds the one-day limit")]
    IntervalTooLong(&'static str),
    #[error("opening position is invalid: {0}")]
    InvalidOpening(#[from] InvariantViolation),
    #[error("component catalog is empty")]
    EmptyCatalog,
    #[error("duplicate catalog entry: {0} {1}")]
    DuplicateComponent(ComponentCategory, String),
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EconomyConfig {
    /// Parse a YAML document and validate the result.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: EconomyConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ResourceKind::ALL {
            let b = self.bounds.get(kind);
            if b.min > b.max {
                return Err(ConfigError::InvertedBound(kind));
            }
        }
        let crew = &self.crew_generation;
        check_range("crew_generation.skill", crew.skill, 0, MAX_SKILL as u32)?;
        check_range("crew_generation.morale", crew.morale, 0, MAX_MORALE as u32)?;
        check_range("crew_generation.age", crew.age, 0, u8::MAX as u32)?;
        let planets = &self.planet_generation;
        check_range("planet_generation.count", planets.count, 1, 26)?;
        check_range("planet_generation.resource_tags", planets.resource_tags, 1, 16)?;
        if self.trade_quantity <= Decimal::ZERO {
            return Err(ConfigError::NonPositive("trade_quantity"));
        }
        if self.colony_rate_increment < Decimal::ZERO {
            return Err(ConfigError::Negative("colony_rate_increment"));
        }
        for (kind, rate) in self.generation_rates.iter() {
            if rate < Decimal::ZERO {
                return Err(ConfigError::NegativeRate(kind));
            }
        }
        for (kind, amount) in self.starting_resources.iter() {
            if !self.bounds.get(kind).contains(amount) {
                return Err(ConfigError::StartOutOfBounds(kind));
            }
        }
        check_interval("tick_interval_ms", self.tick_interval_ms)?;
        check_interval("notification_ttl_ms", self.notification_ttl_ms)?;
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = BTreeSet::new();
        for spec in &self.catalog {
            if !seen.insert((spec.category as u8, spec.name.as_str())) {
                return Err(ConfigError::DuplicateComponent(spec.category, spec.name.clone()));
            }
        }
        validate_state(&GameState::new_game(self), &self.bounds)?;
        Ok(())
    }

    /// Catalog lookup by category and name.
    pub fn component(&self, category: ComponentCategory, name: &str) -> Option<&ComponentSpec> {
        self.catalog
            .iter()
            .find(|c| c.category == category && c.name == name)
    }
}

fn check_interval(field: &'static str, ms: u64) -> Result<(), ConfigError> {
    if ms == 0 {
        return Err(ConfigError::NonPositive(field));
    }
    if ms > MAX_INTERVAL_MS {
        return Err(ConfigError::IntervalTooLong(field));
    }
    Ok(())
}

fn check_range(
    field: &'static str,
    r: ClosedRange,
    lo: u32,
    hi: u32,
) -> Result<(), ConfigError> {
    if r.min > r.max {
        return Err(ConfigError::InvertedRange(field));
    }
    if r.min < lo || r.max > hi {
        return Err(ConfigError::RangeOutOfLimits(field));
    }
    Ok(())
}

fn component(
    category: ComponentCategory,
    name: &str,
    cost: Resources,
    stats: ShipStats,
) -> ComponentSpec {
    ComponentSpec {
        category,
        name: name.to_string(),
        cost,
        stats,
    }
}

fn stats(speed: u32, cargo: u32, combat: u32, research: u32, crew_capacity: u32) -> ShipStats {
    ShipStats {
        speed,
        cargo,
        combat,
        research,
        crew_capacity,
    }
}

/// The built-in shipyard.
pub fn default_catalog() -> Vec<ComponentSpec> {
    use ComponentCategory::*;
    vec![
        component(
            Hull,
            "Scout",
            Resources::from_units(2000, 0, 200, 0, 0),
            stats(12, 80, 4, 4, 4),
        ),
        component(
            Hull,
            "Explorer",
            Resources::from_units(3000, 0, 300, 0, 0),
            stats(10, 100, 5, 5, 6),
        ),
        component(
            Hull,
            "Frigate",
            Resources::from_units(6000, 0, 800, 0, 0),
            stats(8, 150, 15, 6, 10),
        ),
        component(
            Hull,
            "Ark",
            Resources::from_units(15000, 0, 2000, 0, 100),
            stats(5, 400, 5, 10, 20),
        ),
        component(
            Engine,
            "Fusion Drive",
            Resources::from_units(1500, 100, 0, 0, 0),
            stats(5, 0, 0, 0, 0),
        ),
        component(
            Engine,
            "Warp Coil",
            Resources::from_units(5000, 500, 0, 0, 50),
            stats(12, 0, 0, 0, 0),
        ),
        component(
            Cargo,
            "Expanded Hold",
            Resources::from_units(800, 0, 150, 0, 0),
            stats(0, 100, 0, 0, 0),
        ),
        component(
            Cargo,
            "Bulk Bay",
            Resources::from_units(2500, 0, 600, 0, 0),
            stats(0, 300, 0, 0, 0),
        ),
        component(
            Weapons,
            "Railgun",
            Resources::from_units(1200, 0, 200, 0, 0),
            stats(0, 0, 8, 0, 0),
        ),
        component(
            Weapons,
            "Plasma Lance",
            Resources::from_units(3000, 300, 0, 0, 0),
            stats(0, 0, 15, 0, 0),
        ),
        component(
            Research,
            "Sensor Array",
            Resources::from_units(1000, 100, 0, 0, 0),
            stats(0, 0, 0, 5, 0),
        ),
        component(
            Research,
            "Quantum Lab",
            Resources::from_units(4000, 0, 0, 0, 50),
            stats(0, 0, 0, 12, 0),
        ),
        component(
            Quarters,
            "Bunk Module",
            Resources::from_units(600, 0, 0, 100, 0),
            stats(0, 0, 0, 0, 2),
        ),
        component(
            Quarters,
            "Habitat Ring",
            Resources::from_units(3500, 0, 500, 300, 0),
            stats(0, 0, 0, 0, 6),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EconomyConfig::default().validate().unwrap();
    }

    #[test]
    fn yaml_overrides_subset() {
        let cfg = EconomyConfig::from_yaml_str(
            "morale_boost: 25\nrng_seed: 7\nplanet_generation:\n  count: { min: 2, max: 2 }\n",
        )
        .unwrap();
        assert_eq!(cfg.morale_boost, 25);
        assert_eq!(cfg.rng_seed, 7);
        assert_eq!(cfg.planet_generation.count, ClosedRange::new(2, 2));
        assert_eq!(cfg.planet_generation.resource_tags, ClosedRange::new(1, 2));
        assert_eq!(cfg.tick_interval_ms, 3000);
        assert!(!cfg.catalog.is_empty());
    }

    #[test]
    fn inverted_range_rejected() {
        let mut cfg = EconomyConfig::default();
        cfg.crew_generation.age = ClosedRange::new(50, 20);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedRange("crew_generation.age"))
        ));
    }

    #[test]
    fn skill_range_beyond_max_rejected() {
        let mut cfg = EconomyConfig::default();
        cfg.crew_generation.skill = ClosedRange::new(1, 11);
        assert!(matches!(cfg.validate(), Err(ConfigError::RangeOutOfLimits(_))));
    }

    #[test]
    fn duplicate_component_rejected() {
        let mut cfg = EconomyConfig::default();
        let dup = cfg.catalog[0].clone();
        cfg.catalog.push(dup);
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicateComponent(..))));
    }

    #[test]
    fn empty_catalog_rejected() {
        let err = EconomyConfig::from_yaml_str("catalog: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCatalog));
    }

    #[test]
    fn negative_generation_rate_rejected() {
        let yaml = "generation_rates: { credits: -5 }\n";
        let err = EconomyConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeRate(ResourceKind::Credits)));
    }

    #[test]
    fn negative_colony_increment_rejected() {
        let mut cfg = EconomyConfig::default();
        cfg.colony_rate_increment = Decimal::from(-1);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Negative("colony_rate_increment"))
        ));
    }

    #[test]
    fn starting_resources_must_fit_bounds() {
        let yaml = "starting_resources: { credits: 5000000 }\n";
        let err = EconomyConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::StartOutOfBounds(ResourceKind::Credits)));

        let mut cfg = EconomyConfig::default();
        cfg.bounds.food.min = Decimal::from(500);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::StartOutOfBounds(ResourceKind::Food))
        ));
    }

    #[test]
    fn intervals_are_capped() {
        let mut cfg = EconomyConfig::default();
        cfg.notification_ttl_ms = u64::MAX;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::IntervalTooLong("notification_ttl_ms"))
        ));
        cfg.notification_ttl_ms = MAX_INTERVAL_MS;
        cfg.tick_interval_ms = MAX_INTERVAL_MS + 1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::IntervalTooLong("tick_interval_ms"))
        ));
        cfg.tick_interval_ms = MAX_INTERVAL_MS;
        cfg.validate().unwrap();
    }

    #[test]
    fn component_lookup_by_category_and_name() {
        let cfg = EconomyConfig::default();
        assert!(cfg.component(ComponentCategory::Engine, "Fusion Drive").is_some());
        assert!(cfg.component(ComponentCategory::Hull, "Fusion Drive").is_none());
    }
}
