//! Star systems and planets.

use crate::resources::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and type used for the stand-in planet of an unexplored system.
pub const PLACEHOLDER_PLANET: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Unexplored,
    Explored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    Unknown,
    Terrestrial,
    GasGiant,
    Ice,
    Desert,
    Ocean,
    Volcanic,
}

impl PlanetType {
    /// Types a surveyed planet can have.
    pub const SURVEYABLE: [PlanetType; 6] = [
        PlanetType::Terrestrial,
        PlanetType::GasGiant,
        PlanetType::Ice,
        PlanetType::Desert,
        PlanetType::Ocean,
        PlanetType::Volcanic,
    ];
}

/// Resource tag found on a planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetResource {
    Unknown,
    Energy,
    Minerals,
    Food,
    Influence,
    Water,
    RareElements,
}

impl PlanetResource {
    /// Tags a surveyed planet can carry.
    pub const SURVEYABLE: [PlanetResource; 6] = [
        PlanetResource::Energy,
        PlanetResource::Minerals,
        PlanetResource::Food,
        PlanetResource::Influence,
        PlanetResource::Water,
        PlanetResource::RareElements,
    ];

    /// The tracked ledger resource this tag feeds, if any.
    pub fn tracked(self) -> Option<ResourceKind> {
        match self {
            PlanetResource::Energy => Some(ResourceKind::Energy),
            PlanetResource::Minerals => Some(ResourceKind::Minerals),
            PlanetResource::Food => Some(ResourceKind::Food),
            PlanetResource::Influence => Some(ResourceKind::Influence),
            PlanetResource::Unknown | PlanetResource::Water | PlanetResource::RareElements => None,
        }
    }
}

impl fmt::Display for PlanetResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanetResource::Unknown => "unknown",
            PlanetResource::Energy => "energy",
            PlanetResource::Minerals => "minerals",
            PlanetResource::Food => "food",
            PlanetResource::Influence => "influence",
            PlanetResource::Water => "water",
            PlanetResource::RareElements => "rare elements",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlanetType,
    pub resources: Vec<PlanetResource>,
    #[serde(default)]
    pub developed: bool,
}

impl Planet {
    /// The stand-in planet shown before a system is surveyed.
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_PLANET.to_string(),
            kind: PlanetType::Unknown,
            resources: vec![PlanetResource::Unknown],
            developed: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == PlanetType::Unknown
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarSystem {
    pub name: String,
    pub status: SystemStatus,
    pub planets: Vec<Planet>,
    #[serde(default)]
    pub trade_routes: Vec<String>,
    pub coordinates: Coordinates,
}

impl StarSystem {
    /// A fresh unexplored system carrying the placeholder planet.
    pub fn unexplored(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            status: SystemStatus::Unexplored,
            planets: vec![Planet::placeholder()],
            trade_routes: Vec::new(),
            coordinates: Coordinates { x, y },
        }
    }

    pub fn is_explored(&self) -> bool {
        self.status == SystemStatus::Explored
    }

    /// Index of the first planet that can still be colonized, in list order.
    pub fn first_undeveloped(&self) -> Option<usize> {
        self.planets
            .iter()
            .position(|p| !p.developed && !p.is_placeholder())
    }

    pub fn undeveloped_count(&self) -> usize {
        self.planets
            .iter()
            .filter(|p| !p.developed && !p.is_placeholder())
            .count()
    }
}
