//! Multi-generational family record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legacy {
    /// Current generation, starting at 1.
    pub generation: u32,
    pub family_name: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Standing with each faction.
    #[serde(default)]
    pub reputation: BTreeMap<String, i32>,
}
