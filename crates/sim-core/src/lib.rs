#![deny(warnings)]

//! Core domain models and invariants for Starship Legacy.
//!
//! This crate defines the serializable types shared by the economy engine,
//! the runtime store and persistence: resources and their bounds, crew, ship,
//! galaxy, market, legacy, notifications and the configuration that tunes them.

pub mod config;
pub mod crew;
pub mod galaxy;
pub mod legacy;
pub mod market;
pub mod notification;
pub mod resources;
pub mod ship;
pub mod state;

pub use config::{
    ClosedRange, ConfigError, Costs, CrewGeneration, EconomyConfig, PlanetGeneration,
    MAX_INTERVAL_MS,
};
pub use crew::{CrewId, CrewMember, CrewRole, SkillKind, Skills, MAX_MORALE, MAX_SKILL};
pub use galaxy::{Coordinates, Planet, PlanetResource, PlanetType, StarSystem, SystemStatus};
pub use legacy::Legacy;
pub use market::{Market, MarketEntry, TradeSide, Trend};
pub use notification::{Notification, Severity};
pub use resources::{Bound, ConstraintViolation, ResourceBounds, ResourceKind, Resources};
pub use ship::{ComponentCategory, ComponentSpec, Ship, ShipComponents, ShipStats};
pub use state::{validate_state, GameState, InvariantViolation};
