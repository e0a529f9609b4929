//! Resource quantities, their bounds, and bound violations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The five tracked resources, in ledger order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Credits,
    Energy,
    Minerals,
    Food,
    Influence,
}

impl ResourceKind {
    /// Ledger order. Multi-resource checks report the first failure in this order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Credits,
        ResourceKind::Energy,
        ResourceKind::Minerals,
        ResourceKind::Food,
        ResourceKind::Influence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Credits => "credits",
            ResourceKind::Energy => "energy",
            ResourceKind::Minerals => "minerals",
            ResourceKind::Food => "food",
            ResourceKind::Influence => "influence",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record of the five resource quantities.
///
/// Used for the player's holdings, for cost bundles, and for per-tick
/// generation rates. Values are never mutated in place by the engine: every
/// change produces a new record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub credits: Decimal,
    pub energy: Decimal,
    pub minerals: Decimal,
    pub food: Decimal,
    pub influence: Decimal,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        credits: Decimal::ZERO,
        energy: Decimal::ZERO,
        minerals: Decimal::ZERO,
        food: Decimal::ZERO,
        influence: Decimal::ZERO,
    };

    /// Build a record from whole-number amounts in ledger order.
    pub fn from_units(credits: i64, energy: i64, minerals: i64, food: i64, influence: i64) -> Self {
        Self {
            credits: Decimal::from(credits),
            energy: Decimal::from(energy),
            minerals: Decimal::from(minerals),
            food: Decimal::from(food),
            influence: Decimal::from(influence),
        }
    }

    /// A record holding `amount` of a single resource and zero elsewhere.
    pub fn single(kind: ResourceKind, amount: Decimal) -> Self {
        let mut r = Resources::ZERO;
        r.set(kind, amount);
        r
    }

    pub fn get(&self, kind: ResourceKind) -> Decimal {
        match kind {
            ResourceKind::Credits => self.credits,
            ResourceKind::Energy => self.energy,
            ResourceKind::Minerals => self.minerals,
            ResourceKind::Food => self.food,
            ResourceKind::Influence => self.influence,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, value: Decimal) {
        match kind {
            ResourceKind::Credits => self.credits = value,
            ResourceKind::Energy => self.energy = value,
            ResourceKind::Minerals => self.minerals = value,
            ResourceKind::Food => self.food = value,
            ResourceKind::Influence => self.influence = value,
        }
    }

    /// Copy of `self` with one resource replaced.
    pub fn with(mut self, kind: ResourceKind, value: Decimal) -> Self {
        self.set(kind, value);
        self
    }

    /// Iterate `(kind, amount)` in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Decimal)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Non-zero entries only, in ledger order.
    pub fn nonzero(&self) -> impl Iterator<Item = (ResourceKind, Decimal)> + '_ {
        self.iter().filter(|(_, v)| !v.is_zero())
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, amount) in self.nonzero() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{amount} {kind}")?;
            first = false;
        }
        if first {
            f.write_str("nothing")?;
        }
        Ok(())
    }
}

/// Closed range `[min, max]` for one resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub min: Decimal,
    pub max: Decimal,
}

impl Bound {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: Decimal) -> Decimal {
        value.max(self.min).min(self.max)
    }
}

/// Per-resource bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBounds {
    pub credits: Bound,
    pub energy: Bound,
    pub minerals: Bound,
    pub food: Bound,
    pub influence: Bound,
}

impl Default for ResourceBounds {
    fn default() -> Self {
        Self {
            credits: Bound::new(0, 1_000_000),
            energy: Bound::new(0, 10_000),
            minerals: Bound::new(0, 10_000),
            food: Bound::new(0, 10_000),
            influence: Bound::new(0, 1_000),
        }
    }
}

impl ResourceBounds {
    pub fn get(&self, kind: ResourceKind) -> Bound {
        match kind {
            ResourceKind::Credits => self.credits,
            ResourceKind::Energy => self.energy,
            ResourceKind::Minerals => self.minerals,
            ResourceKind::Food => self.food,
            ResourceKind::Influence => self.influence,
        }
    }
}

/// A proposed resource change would leave the resource's bound.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{resource} would become {projected}, outside [{min}, {max}]")]
pub struct ConstraintViolation {
    pub resource: ResourceKind,
    pub projected: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_cover_every_kind() {
        let mut r = Resources::ZERO;
        for (i, kind) in ResourceKind::ALL.into_iter().enumerate() {
            r.set(kind, Decimal::from(i as i64 + 1));
        }
        assert_eq!(r, Resources::from_units(1, 2, 3, 4, 5));
        assert_eq!(r.get(ResourceKind::Food), Decimal::from(4));
    }

    #[test]
    fn display_lists_nonzero_amounts() {
        let cost = Resources::from_units(500, 0, 200, 0, 0);
        assert_eq!(cost.to_string(), "500 credits, 200 minerals");
        assert_eq!(Resources::ZERO.to_string(), "nothing");
    }

    #[test]
    fn bound_clamp_and_contains() {
        let b = Bound::new(0, 100);
        assert!(b.contains(Decimal::ZERO));
        assert!(b.contains(Decimal::from(100)));
        assert!(!b.contains(Decimal::from(101)));
        assert_eq!(b.clamp(Decimal::from(150)), Decimal::from(100));
        assert_eq!(b.clamp(Decimal::from(-3)), Decimal::ZERO);
    }

    #[test]
    fn resource_kind_serializes_lowercase() {
        let s = serde_json::to_string(&ResourceKind::Minerals).unwrap();
        assert_eq!(s, "\"minerals\"");
    }
}
