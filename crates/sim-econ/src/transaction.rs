//! Validate-then-apply for every player action.
//!
//! [`execute`] never touches the input state. On success it returns the
//! replacement fragments plus a confirmation message; the caller commits the
//! fragments in one step. On failure nothing has changed.

use crate::generate::{crew_id, generate_crew_member, generate_planets};
use crate::ledger::{apply_delta, apply_saturating, DeltaMode};
use crate::validate::{self, lot_value, PreconditionFailure};
use rand::Rng;
use sim_core::{
    ComponentCategory, ConstraintViolation, CrewId, CrewMember, EconomyConfig, GameState,
    ResourceKind, Resources, Ship, SkillKind, StarSystem, SystemStatus, TradeSide,
};
use thiserror::Error;
use tracing::debug;

/// A player intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    TrainCrew,
    BoostMorale,
    RecruitCrew,
    ExploreSystem,
    EstablishColony,
    PurchaseComponent {
        category: ComponentCategory,
        name: String,
    },
    Trade {
        resource: ResourceKind,
        side: TradeSide,
    },
    SelectHeir(CrewId),
    SelectSystem(String),
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::TrainCrew => "train_crew",
            Action::BoostMorale => "boost_morale",
            Action::RecruitCrew => "recruit_crew",
            Action::ExploreSystem => "explore_system",
            Action::EstablishColony => "establish_colony",
            Action::PurchaseComponent { .. } => "purchase_component",
            Action::Trade { .. } => "trade",
            Action::SelectHeir(_) => "select_heir",
            Action::SelectSystem(_) => "select_system",
        }
    }
}

/// Why a transaction was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),
    #[error("Transaction rejected: {0}")]
    Constraint(#[from] ConstraintViolation),
}

/// Replacement state produced by a successful transaction. `None` fields are
/// left as they were.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragments {
    pub resources: Option<Resources>,
    pub generation_rates: Option<Resources>,
    pub ship: Option<Ship>,
    pub crew: Option<Vec<CrewMember>>,
    pub systems: Option<Vec<StarSystem>>,
    pub selected_system: Option<Option<String>>,
}

impl Fragments {
    /// The state that results from replacing `base`'s fields with these fragments.
    pub fn apply_to(self, base: &GameState) -> GameState {
        let mut next = base.clone();
        if let Some(r) = self.resources {
            next.resources = r;
        }
        if let Some(r) = self.generation_rates {
            next.generation_rates = r;
        }
        if let Some(s) = self.ship {
            next.ship = s;
        }
        if let Some(c) = self.crew {
            next.crew = c;
        }
        if let Some(s) = self.systems {
            next.systems = s;
        }
        if let Some(sel) = self.selected_system {
            next.selected_system = sel;
        }
        next
    }
}

/// A committed-to-be transaction result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub fragments: Fragments,
    pub message: String,
}

/// Run one action against `state`.
pub fn execute<R: Rng + ?Sized>(
    state: &GameState,
    action: &Action,
    cfg: &EconomyConfig,
    rng: &mut R,
) -> Result<Outcome, TransactionError> {
    let result = match action {
        Action::TrainCrew => train_crew(state, cfg, rng),
        Action::BoostMorale => boost_morale(state, cfg),
        Action::RecruitCrew => recruit_crew(state, cfg, rng),
        Action::ExploreSystem => explore_system(state, cfg, rng),
        Action::EstablishColony => establish_colony(state, cfg),
        Action::PurchaseComponent { category, name } => {
            purchase_component(state, cfg, *category, name)
        }
        Action::Trade { resource, side } => trade(state, cfg, *resource, *side),
        Action::SelectHeir(id) => select_heir(state, cfg, id),
        Action::SelectSystem(name) => select_system(state, name),
    };
    if let Err(err) = &result {
        debug!(action = action.label(), %err, "transaction rejected");
    }
    result
}

fn spend(
    state: &GameState,
    cost: &Resources,
    cfg: &EconomyConfig,
) -> Result<Resources, ConstraintViolation> {
    apply_delta(&state.resources, cost, DeltaMode::Subtract, &cfg.bounds)
}

pub fn train_crew<R: Rng + ?Sized>(
    state: &GameState,
    cfg: &EconomyConfig,
    rng: &mut R,
) -> Result<Outcome, TransactionError> {
    validate::validate_train(state, cfg)?;
    let resources = spend(state, &cfg.costs.train_crew, cfg)?;
    let mut crew = state.crew.clone();
    let idx = rng.gen_range(0..crew.len());
    let skill = SkillKind::ALL[rng.gen_range(0..SkillKind::ALL.len())];
    let member = &mut crew[idx];
    let before = member.skills.get(skill);
    let after = member.skills.train(skill);
    let message = if after == before {
        format!("{} trained {skill}, already at mastery ({after})", member.name)
    } else {
        format!("{} trained {skill}: {before} -> {after}", member.name)
    };
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            crew: Some(crew),
            ..Fragments::default()
        },
        message,
    })
}

pub fn boost_morale(state: &GameState, cfg: &EconomyConfig) -> Result<Outcome, TransactionError> {
    validate::validate_boost_morale(state, cfg)?;
    let resources = spend(state, &cfg.costs.boost_morale, cfg)?;
    let mut crew = state.crew.clone();
    for member in &mut crew {
        member.boost_morale(cfg.morale_boost);
    }
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            crew: Some(crew),
            ..Fragments::default()
        },
        message: format!("Crew morale boosted by {}", cfg.morale_boost),
    })
}

pub fn recruit_crew<R: Rng + ?Sized>(
    state: &GameState,
    cfg: &EconomyConfig,
    rng: &mut R,
) -> Result<Outcome, TransactionError> {
    validate::validate_recruit(state, cfg)?;
    let resources = spend(state, &cfg.costs.recruit_crew, cfg)?;
    let mut recruit = generate_crew_member(rng, &cfg.crew_generation);
    while state.crew_member(&recruit.id).is_some() {
        recruit.id = crew_id(rng);
    }
    let message = format!("Recruited {} ({})", recruit.name, recruit.role);
    let mut crew = state.crew.clone();
    crew.push(recruit);
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            crew: Some(crew),
            ..Fragments::default()
        },
        message,
    })
}

pub fn explore_system<R: Rng + ?Sized>(
    state: &GameState,
    cfg: &EconomyConfig,
    rng: &mut R,
) -> Result<Outcome, TransactionError> {
    let target = validate::validate_explore(state, cfg)?.name.clone();
    let resources = spend(state, &cfg.costs.explore_system, cfg)?;
    let planets = generate_planets(rng, &cfg.planet_generation);
    let message = format!("Explored {target}: discovered {} planet(s)", planets.len());
    let mut systems = state.systems.clone();
    if let Some(system) = systems.iter_mut().find(|s| s.name == target) {
        system.planets = planets;
        system.status = SystemStatus::Explored;
    }
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            systems: Some(systems),
            ..Fragments::default()
        },
        message,
    })
}

pub fn establish_colony(
    state: &GameState,
    cfg: &EconomyConfig,
) -> Result<Outcome, TransactionError> {
    let target = validate::validate_colony(state, cfg)?.name.clone();
    let resources = spend(state, &cfg.costs.establish_colony, cfg)?;
    let mut systems = state.systems.clone();
    let mut rates = state.generation_rates;
    let mut message = format!("Established a colony in {target}");
    if let Some(system) = systems.iter_mut().find(|s| s.name == target) {
        if let Some(idx) = system.first_undeveloped() {
            let planet = &mut system.planets[idx];
            planet.developed = true;
            let mut boosted = Vec::new();
            for tag in &planet.resources {
                if let Some(kind) = tag.tracked() {
                    rates.set(kind, rates.get(kind) + cfg.colony_rate_increment);
                    boosted.push(kind.as_str());
                }
            }
            message = format!("Established a colony on {target} {}", planet.name);
            if !boosted.is_empty() {
                message.push_str(&format!(
                    " (+{} {} per tick)",
                    cfg.colony_rate_increment,
                    boosted.join(", ")
                ));
            }
        }
    }
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            generation_rates: Some(rates),
            systems: Some(systems),
            ..Fragments::default()
        },
        message,
    })
}

pub fn purchase_component(
    state: &GameState,
    cfg: &EconomyConfig,
    category: ComponentCategory,
    name: &str,
) -> Result<Outcome, TransactionError> {
    let spec = validate::validate_purchase(state, cfg, category, name)?;
    let resources = spend(state, &spec.cost, cfg)?;
    let mut ship = state.ship.clone();
    ship.install(spec);
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            ship: Some(ship),
            ..Fragments::default()
        },
        message: format!("Installed {} ({category}) for {}", spec.name, spec.cost),
    })
}

/// Buy or sell one trade lot. Purchases that would overflow the resource are
/// rejected; sale proceeds saturate at the credits maximum.
pub fn trade(
    state: &GameState,
    cfg: &EconomyConfig,
    resource: ResourceKind,
    side: TradeSide,
) -> Result<Outcome, TransactionError> {
    let entry = validate::validate_trade(state, cfg, resource, side)?;
    let value = lot_value(entry, cfg);
    let credits = Resources::single(ResourceKind::Credits, value);
    let qty = cfg.trade_quantity;
    let goods = Resources::single(resource, qty);
    let bounds = &cfg.bounds;
    let resources = match side {
        TradeSide::Buy => {
            let paid = apply_delta(&state.resources, &credits, DeltaMode::Subtract, bounds)?;
            apply_delta(&paid, &goods, DeltaMode::Add, bounds)?
        }
        TradeSide::Sell => {
            let shipped = apply_delta(&state.resources, &goods, DeltaMode::Subtract, bounds)?;
            apply_saturating(&shipped, &credits, DeltaMode::Add, bounds)
        }
    };
    let message = match side {
        TradeSide::Buy => format!("Bought {qty} {resource} for {value} credits"),
        TradeSide::Sell => format!("Sold {qty} {resource} for {value} credits"),
    };
    Ok(Outcome {
        fragments: Fragments {
            resources: Some(resources),
            ..Fragments::default()
        },
        message,
    })
}

/// Name a new heir, clearing the flag from everyone else.
pub fn select_heir(
    state: &GameState,
    cfg: &EconomyConfig,
    id: &CrewId,
) -> Result<Outcome, TransactionError> {
    let heir = validate::validate_heir(state, cfg, id)?;
    let message = format!(
        "{} has been named heir to the {} legacy",
        heir.name, state.legacy.family_name
    );
    let crew = state
        .crew
        .iter()
        .cloned()
        .map(|mut c| {
            c.is_heir = &c.id == id;
            c
        })
        .collect();
    Ok(Outcome {
        fragments: Fragments {
            crew: Some(crew),
            ..Fragments::default()
        },
        message,
    })
}

pub fn select_system(state: &GameState, name: &str) -> Result<Outcome, TransactionError> {
    let system = validate::validate_select_system(state, name)?;
    Ok(Outcome {
        fragments: Fragments {
            selected_system: Some(Some(system.name.clone())),
            ..Fragments::default()
        },
        message: format!("Selected {}", system.name),
    })
}
