//! Pure precondition checks, one per player action.
//!
//! Validators only read state. When several conditions fail, the first in a
//! fixed order is reported: identity and selection checks, then funds, then
//! capacity or status checks. Cost bundles are checked in ledger order.

use rust_decimal::Decimal;
use sim_core::{
    ComponentCategory, ComponentSpec, CrewId, CrewMember, CrewRole, EconomyConfig, GameState,
    MarketEntry, ResourceKind, Resources, StarSystem, TradeSide,
};
use thiserror::Error;

/// Why an action cannot run. The display text is shown to the player.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreconditionFailure {
    /// The ledger cannot cover the cost.
    #[error("Insufficient {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: ResourceKind,
        required: Decimal,
        available: Decimal,
    },
    /// Training needs at least one crew member.
    #[error("There is no crew aboard to train")]
    NoCrew,
    /// The ship has no free berth.
    #[error("Crew quarters are full ({capacity} berths)")]
    CrewAtCapacity { capacity: u32 },
    /// The action targets the selected system and none is selected.
    #[error("No star system selected")]
    NoSystemSelected,
    /// No system carries this name.
    #[error("Unknown star system: {0}")]
    UnknownSystem(String),
    /// Surveys run once per system.
    #[error("{0} has already been explored")]
    AlreadyExplored(String),
    /// Colonies need a surveyed system.
    #[error("{0} must be explored before it can be colonized")]
    NotExplored(String),
    /// Every real planet in the system is already developed.
    #[error("No undeveloped planets remain in {0}")]
    NoUndevelopedPlanets(String),
    /// The catalog has no such component.
    #[error("Unknown {category} component: {name}")]
    UnknownComponent {
        category: ComponentCategory,
        name: String,
    },
    /// The market has no price for this resource.
    #[error("{0} is not traded on the market")]
    NotTradable(ResourceKind),
    /// No crew member has this id.
    #[error("Unknown crew member: {0}")]
    UnknownCrewMember(CrewId),
    /// The captain cannot succeed themselves.
    #[error("{0} is the captain and cannot be named heir")]
    CaptainCannotBeHeir(String),
    /// Heirs must be younger than the configured age limit.
    #[error("{name} is too old to be named heir (age {age}, must be under {limit})")]
    HeirTooOld { name: String, age: u8, limit: u8 },
}

/// Every resource in `cost` must be available, checked in ledger order.
pub fn check_cost(available: &Resources, cost: &Resources) -> Result<(), PreconditionFailure> {
    for (resource, required) in cost.nonzero() {
        let have = available.get(resource);
        if have < required {
            return Err(PreconditionFailure::InsufficientResource {
                resource,
                required,
                available: have,
            });
        }
    }
    Ok(())
}

pub fn validate_train(state: &GameState, cfg: &EconomyConfig) -> Result<(), PreconditionFailure> {
    check_cost(&state.resources, &cfg.costs.train_crew)?;
    if state.crew.is_empty() {
        return Err(PreconditionFailure::NoCrew);
    }
    Ok(())
}

pub fn validate_boost_morale(
    state: &GameState,
    cfg: &EconomyConfig,
) -> Result<(), PreconditionFailure> {
    check_cost(&state.resources, &cfg.costs.boost_morale)
}

/// Funds are checked before capacity.
pub fn validate_recruit(state: &GameState, cfg: &EconomyConfig) -> Result<(), PreconditionFailure> {
    check_cost(&state.resources, &cfg.costs.recruit_crew)?;
    let capacity = state.ship.stats.crew_capacity;
    if state.crew.len() >= capacity as usize {
        return Err(PreconditionFailure::CrewAtCapacity { capacity });
    }
    Ok(())
}

fn selected_system(state: &GameState) -> Result<&StarSystem, PreconditionFailure> {
    let name = state
        .selected_system
        .as_deref()
        .ok_or(PreconditionFailure::NoSystemSelected)?;
    state
        .system(name)
        .ok_or_else(|| PreconditionFailure::UnknownSystem(name.to_string()))
}

pub fn validate_explore<'a>(
    state: &'a GameState,
    cfg: &EconomyConfig,
) -> Result<&'a StarSystem, PreconditionFailure> {
    let system = selected_system(state)?;
    check_cost(&state.resources, &cfg.costs.explore_system)?;
    if system.is_explored() {
        return Err(PreconditionFailure::AlreadyExplored(system.name.clone()));
    }
    Ok(system)
}

pub fn validate_colony<'a>(
    state: &'a GameState,
    cfg: &EconomyConfig,
) -> Result<&'a StarSystem, PreconditionFailure> {
    let system = selected_system(state)?;
    check_cost(&state.resources, &cfg.costs.establish_colony)?;
    if !system.is_explored() {
        return Err(PreconditionFailure::NotExplored(system.name.clone()));
    }
    if system.first_undeveloped().is_none() {
        return Err(PreconditionFailure::NoUndevelopedPlanets(system.name.clone()));
    }
    Ok(system)
}

pub fn validate_purchase<'a>(
    state: &GameState,
    cfg: &'a EconomyConfig,
    category: ComponentCategory,
    name: &str,
) -> Result<&'a ComponentSpec, PreconditionFailure> {
    let spec = cfg
        .component(category, name)
        .ok_or_else(|| PreconditionFailure::UnknownComponent {
            category,
            name: name.to_string(),
        })?;
    check_cost(&state.resources, &spec.cost)?;
    Ok(spec)
}

/// Credits required to buy one trade lot of `entry`.
pub fn lot_value(entry: &MarketEntry, cfg: &EconomyConfig) -> Decimal {
    entry.price * cfg.trade_quantity
}

pub fn validate_trade<'a>(
    state: &'a GameState,
    cfg: &EconomyConfig,
    resource: ResourceKind,
    side: TradeSide,
) -> Result<&'a MarketEntry, PreconditionFailure> {
    let entry = state
        .market
        .quote(resource)
        .ok_or(PreconditionFailure::NotTradable(resource))?;
    let needed = match side {
        TradeSide::Buy => Resources::single(ResourceKind::Credits, lot_value(entry, cfg)),
        TradeSide::Sell => Resources::single(resource, cfg.trade_quantity),
    };
    check_cost(&state.resources, &needed)?;
    Ok(entry)
}

/// Heirs must exist, must not be the captain and must be under the age ceiling.
pub fn validate_heir<'a>(
    state: &'a GameState,
    cfg: &EconomyConfig,
    id: &CrewId,
) -> Result<&'a CrewMember, PreconditionFailure> {
    let member = state
        .crew_member(id)
        .ok_or_else(|| PreconditionFailure::UnknownCrewMember(id.clone()))?;
    if member.role == CrewRole::Captain {
        return Err(PreconditionFailure::CaptainCannotBeHeir(member.name.clone()));
    }
    if member.age >= cfg.heir_max_age {
        return Err(PreconditionFailure::HeirTooOld {
            name: member.name.clone(),
            age: member.age,
            limit: cfg.heir_max_age,
        });
    }
    Ok(member)
}

pub fn validate_select_system<'a>(
    state: &'a GameState,
    name: &str,
) -> Result<&'a StarSystem, PreconditionFailure> {
    state
        .system(name)
        .ok_or_else(|| PreconditionFailure::UnknownSystem(name.to_string()))
}
