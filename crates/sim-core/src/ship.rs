//! The player's starship and the component catalog.

use crate::resources::Resources;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ship statistics. Hulls define the baseline; other components add to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipStats {
    pub speed: u32,
    pub cargo: u32,
    pub combat: u32,
    pub research: u32,
    pub crew_capacity: u32,
}

impl ShipStats {
    /// Field-wise saturating sum.
    pub fn plus(&self, delta: &ShipStats) -> ShipStats {
        ShipStats {
            speed: self.speed.saturating_add(delta.speed),
            cargo: self.cargo.saturating_add(delta.cargo),
            combat: self.combat.saturating_add(delta.combat),
            research: self.research.saturating_add(delta.research),
            crew_capacity: self.crew_capacity.saturating_add(delta.crew_capacity),
        }
    }
}

/// Component categories that can be bought.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Hull,
    Engine,
    Cargo,
    Weapons,
    Research,
    Quarters,
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentCategory::Hull => "hull",
            ComponentCategory::Engine => "engine",
            ComponentCategory::Cargo => "cargo",
            ComponentCategory::Weapons => "weapons",
            ComponentCategory::Research => "research",
            ComponentCategory::Quarters => "quarters",
        };
        f.write_str(s)
    }
}

/// Installed component names, one per non-hull slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipComponents {
    pub engine: String,
    pub cargo: String,
    pub weapons: String,
    pub research: String,
    pub quarters: String,
}

impl ShipComponents {
    /// Slot for a category; `None` for hulls, which are not a slot.
    pub fn slot_mut(&mut self, category: ComponentCategory) -> Option<&mut String> {
        match category {
            ComponentCategory::Hull => None,
            ComponentCategory::Engine => Some(&mut self.engine),
            ComponentCategory::Cargo => Some(&mut self.cargo),
            ComponentCategory::Weapons => Some(&mut self.weapons),
            ComponentCategory::Research => Some(&mut self.research),
            ComponentCategory::Quarters => Some(&mut self.quarters),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    pub hull: String,
    pub components: ShipComponents,
    pub stats: ShipStats,
}

impl Ship {
    /// Install a catalog component. Hulls replace the stats record and the
    /// hull designation; anything else replaces its slot and adds its deltas.
    pub fn install(&mut self, spec: &ComponentSpec) {
        match self.components.slot_mut(spec.category) {
            None => {
                self.hull = spec.name.clone();
                self.stats = spec.stats;
            }
            Some(slot) => {
                *slot = spec.name.clone();
                self.stats = self.stats.plus(&spec.stats);
            }
        }
    }
}

/// A purchasable component. For hulls `stats` is the full baseline; for
/// other categories it is the delta added on install.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub category: ComponentCategory,
    pub name: String,
    pub cost: Resources,
    pub stats: ShipStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship() -> Ship {
        Ship {
            name: "Test".into(),
            hull: "Scout".into(),
            components: ShipComponents {
                engine: "Ion Drive".into(),
                ..ShipComponents::default()
            },
            stats: ShipStats {
                speed: 10,
                cargo: 100,
                combat: 5,
                research: 5,
                crew_capacity: 6,
            },
        }
    }

    #[test]
    fn hull_replaces_stats() {
        let mut s = ship();
        let hull = ComponentSpec {
            category: ComponentCategory::Hull,
            name: "Frigate".into(),
            cost: Resources::ZERO,
            stats: ShipStats {
                speed: 8,
                cargo: 200,
                combat: 15,
                research: 5,
                crew_capacity: 10,
            },
        };
        s.install(&hull);
        assert_eq!(s.hull, "Frigate");
        assert_eq!(s.stats, hull.stats);
        assert_eq!(s.components.engine, "Ion Drive");
    }

    #[test]
    fn slot_component_adds_deltas() {
        let mut s = ship();
        let engine = ComponentSpec {
            category: ComponentCategory::Engine,
            name: "Fusion Drive".into(),
            cost: Resources::ZERO,
            stats: ShipStats {
                speed: 5,
                ..ShipStats::default()
            },
        };
        s.install(&engine);
        assert_eq!(s.components.engine, "Fusion Drive");
        assert_eq!(s.stats.speed, 15);
        assert_eq!(s.stats.cargo, 100);
        assert_eq!(s.hull, "Scout");
    }
}
