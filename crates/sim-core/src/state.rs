//! The full game snapshot and its invariants.

use crate::config::EconomyConfig;
use crate::crew::{CrewId, CrewMember, CrewRole, Skills, MAX_MORALE, MAX_SKILL};
use crate::galaxy::{Coordinates, Planet, PlanetResource, PlanetType, StarSystem, SystemStatus};
use crate::legacy::Legacy;
use crate::market::{Market, MarketEntry, Trend};
use crate::resources::{ResourceBounds, ResourceKind, Resources};
use crate::ship::{Ship, ShipComponents, ShipStats};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Everything the economy owns. Notifications are not part of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub resources: Resources,
    /// Per-tick passive generation.
    pub generation_rates: Resources,
    pub ship: Ship,
    pub crew: Vec<CrewMember>,
    pub systems: Vec<StarSystem>,
    #[serde(default)]
    pub selected_system: Option<String>,
    pub market: Market,
    pub legacy: Legacy,
    /// Generation ticks applied so far.
    #[serde(default)]
    pub ticks: u64,
    /// Position in the seeded random stream, so a restored game draws the
    /// same sequence it would have drawn without the save.
    #[serde(default)]
    pub rng_cursor: u128,
}

impl GameState {
    pub fn system(&self, name: &str) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.name == name)
    }

    pub fn selected(&self) -> Option<&StarSystem> {
        self.selected_system.as_deref().and_then(|n| self.system(n))
    }

    pub fn crew_member(&self, id: &CrewId) -> Option<&CrewMember> {
        self.crew.iter().find(|c| &c.id == id)
    }

    pub fn heir(&self) -> Option<&CrewMember> {
        self.crew.iter().find(|c| c.is_heir)
    }

    /// The opening position for a new game.
    pub fn new_game(config: &EconomyConfig) -> Self {
        Self {
            resources: config.starting_resources,
            generation_rates: config.generation_rates,
            ship: Ship {
                name: "Endeavour".to_string(),
                hull: "Explorer".to_string(),
                components: ShipComponents {
                    engine: "Ion Drive".to_string(),
                    cargo: "Standard Hold".to_string(),
                    weapons: "Pulse Laser".to_string(),
                    research: "Basic Lab".to_string(),
                    quarters: "Standard Quarters".to_string(),
                },
                stats: ShipStats {
                    speed: 10,
                    cargo: 100,
                    combat: 5,
                    research: 5,
                    crew_capacity: 6,
                },
            },
            crew: starting_crew(),
            systems: starting_systems(),
            selected_system: None,
            market: starting_market(),
            legacy: Legacy {
                generation: 1,
                family_name: "Vance".to_string(),
                achievements: Vec::new(),
                traits: vec!["Spacefaring Heritage".to_string()],
                reputation: [
                    ("Terran Federation", 10),
                    ("Mining Guild", 0),
                    ("Free Traders", 0),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            },
            ticks: 0,
            rng_cursor: 0,
        }
    }
}

fn crew_member(
    id: &str,
    name: &str,
    role: CrewRole,
    skills: [u8; 5],
    morale: u8,
    background: &str,
    age: u8,
) -> CrewMember {
    let [piloting, engineering, science, combat, leadership] = skills;
    CrewMember {
        id: CrewId(id.to_string()),
        name: name.to_string(),
        role,
        skills: Skills {
            piloting,
            engineering,
            science,
            combat,
            leadership,
        },
        morale,
        background: background.to_string(),
        age,
        is_heir: false,
    }
}

fn starting_crew() -> Vec<CrewMember> {
    vec![
        crew_member(
            "crew-0001",
            "Elena Vance",
            CrewRole::Captain,
            [6, 4, 5, 5, 8],
            85,
            "Third-generation spacer",
            48,
        ),
        crew_member(
            "crew-0002",
            "Marcus Chen",
            CrewRole::Engineer,
            [3, 8, 5, 2, 3],
            75,
            "Former shipyard foreman",
            34,
        ),
        crew_member(
            "crew-0003",
            "Aisha Okafor",
            CrewRole::Scientist,
            [2, 4, 8, 1, 4],
            80,
            "Xenobiology researcher",
            29,
        ),
        crew_member(
            "crew-0004",
            "Jonas Vance",
            CrewRole::Pilot,
            [7, 3, 3, 4, 5],
            70,
            "Raised aboard the ship",
            22,
        ),
    ]
}

fn starting_systems() -> Vec<StarSystem> {
    let sol = StarSystem {
        name: "Sol".to_string(),
        status: SystemStatus::Explored,
        planets: vec![
            Planet {
                name: "Earth".to_string(),
                kind: PlanetType::Terrestrial,
                resources: vec![PlanetResource::Food, PlanetResource::Influence],
                developed: true,
            },
            Planet {
                name: "Mars".to_string(),
                kind: PlanetType::Desert,
                resources: vec![PlanetResource::Minerals],
                developed: false,
            },
        ],
        trade_routes: vec!["Alpha Centauri".to_string()],
        coordinates: Coordinates { x: 0, y: 0 },
    };
    vec![
        sol,
        StarSystem::unexplored("Alpha Centauri", 4, 3),
        StarSystem::unexplored("Barnard's Star", -6, 2),
        StarSystem::unexplored("Sirius", 8, -5),
        StarSystem::unexplored("Tau Ceti", -3, -9),
        StarSystem::unexplored("Vega", 15, 12),
    ]
}

fn starting_market() -> Market {
    let entry = |price: i64, scale: u32, trend| MarketEntry {
        price: Decimal::new(price, scale),
        trend,
    };
    Market {
        prices: BTreeMap::from([
            (ResourceKind::Energy, entry(5, 0, Trend::Stable)),
            (ResourceKind::Minerals, entry(8, 0, Trend::Rising)),
            (ResourceKind::Food, entry(35, 1, Trend::Falling)),
        ]),
    }
}

/// A snapshot breaks a rule the engine must never break.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A resource left its configured bound.
    #[error("{0} is outside its bounds")]
    ResourceOutOfBounds(ResourceKind),
    /// Passive generation must never drain a resource.
    #[error("generation rate for {0} is negative")]
    NegativeRate(ResourceKind),
    /// At most one crew member may carry the heir flag.
    #[error("more than one heir: {0:?}")]
    MultipleHeirs(Vec<CrewId>),
    /// Crew ids must be unique.
    #[error("duplicate crew id {0}")]
    DuplicateCrewId(CrewId),
    /// A skill exceeds the training cap.
    #[error("crew member {0} has a skill above 10")]
    SkillOutOfRange(CrewId),
    /// Morale exceeds its cap.
    #[error("crew member {0} has morale above 100")]
    MoraleOutOfRange(CrewId),
    /// The selection points at a system that does not exist.
    #[error("selected system {0} does not exist")]
    UnknownSelection(String),
    /// Only surveyed systems may list real planets.
    #[error("system {0} is unexplored but has surveyed planets")]
    UnexploredWithPlanets(String),
}

/// Check every structural invariant of a snapshot.
pub fn validate_state(
    state: &GameState,
    bounds: &ResourceBounds,
) -> Result<(), InvariantViolation> {
    for (kind, value) in state.resources.iter() {
        if !bounds.get(kind).contains(value) {
            return Err(InvariantViolation::ResourceOutOfBounds(kind));
        }
    }
    for (kind, rate) in state.generation_rates.iter() {
        if rate < Decimal::ZERO {
            return Err(InvariantViolation::NegativeRate(kind));
        }
    }
    let heirs: Vec<CrewId> = state
        .crew
        .iter()
        .filter(|c| c.is_heir)
        .map(|c| c.id.clone())
        .collect();
    if heirs.len() > 1 {
        return Err(InvariantViolation::MultipleHeirs(heirs));
    }
    let mut ids = BTreeSet::new();
    for c in &state.crew {
        if !ids.insert(&c.id) {
            return Err(InvariantViolation::DuplicateCrewId(c.id.clone()));
        }
        if c.skills.max_level() > MAX_SKILL {
            return Err(InvariantViolation::SkillOutOfRange(c.id.clone()));
        }
        if c.morale > MAX_MORALE {
            return Err(InvariantViolation::MoraleOutOfRange(c.id.clone()));
        }
    }
    if let Some(name) = &state.selected_system {
        if state.system(name).is_none() {
            return Err(InvariantViolation::UnknownSelection(name.clone()));
        }
    }
    for s in &state.systems {
        if !s.is_explored() && s.planets.iter().any(|p| !p.is_placeholder()) {
            return Err(InvariantViolation::UnexploredWithPlanets(s.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_satisfies_invariants() {
        let cfg = EconomyConfig::default();
        let state = GameState::new_game(&cfg);
        validate_state(&state, &cfg.bounds).unwrap();
        assert!(state.crew.len() < state.ship.stats.crew_capacity as usize);
        assert!(state.heir().is_none());
    }

    #[test]
    fn two_heirs_detected() {
        let cfg = EconomyConfig::default();
        let mut state = GameState::new_game(&cfg);
        state.crew[1].is_heir = true;
        state.crew[2].is_heir = true;
        assert!(matches!(
            validate_state(&state, &cfg.bounds),
            Err(InvariantViolation::MultipleHeirs(ids)) if ids.len() == 2
        ));
    }

    #[test]
    fn out_of_bounds_resource_detected() {
        let cfg = EconomyConfig::default();
        let mut state = GameState::new_game(&cfg);
        state.resources.credits = Decimal::from(-1);
        assert_eq!(
            validate_state(&state, &cfg.bounds),
            Err(InvariantViolation::ResourceOutOfBounds(ResourceKind::Credits))
        );
    }

    #[test]
    fn dangling_selection_detected() {
        let cfg = EconomyConfig::default();
        let mut state = GameState::new_game(&cfg);
        state.selected_system = Some("Nowhere".into());
        assert!(matches!(
            validate_state(&state, &cfg.bounds),
            Err(InvariantViolation::UnknownSelection(_))
        ));
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let cfg = EconomyConfig::default();
        let state = GameState::new_game(&cfg);
        let s = serde_json::to_string_pretty(&state).unwrap();
        let back: GameState = serde_json::from_str(&s).unwrap();
        assert_eq!(back, state);
    }
}
