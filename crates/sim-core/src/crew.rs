//! Crew members, roles and skills.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level any skill can reach.
pub const MAX_SKILL: u8 = 10;
/// Highest morale a crew member can reach.
pub const MAX_MORALE: u8 = 100;

/// Opaque, unique crew member identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CrewId(pub String);

impl fmt::Display for CrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipboard role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewRole {
    Captain,
    Pilot,
    Engineer,
    Scientist,
    Medic,
    Security,
}

impl CrewRole {
    pub const ALL: [CrewRole; 6] = [
        CrewRole::Captain,
        CrewRole::Pilot,
        CrewRole::Engineer,
        CrewRole::Scientist,
        CrewRole::Medic,
        CrewRole::Security,
    ];
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The five trainable skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Piloting,
    Engineering,
    Science,
    Combat,
    Leadership,
}

impl SkillKind {
    pub const ALL: [SkillKind; 5] = [
        SkillKind::Piloting,
        SkillKind::Engineering,
        SkillKind::Science,
        SkillKind::Combat,
        SkillKind::Leadership,
    ];
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkillKind::Piloting => "piloting",
            SkillKind::Engineering => "engineering",
            SkillKind::Science => "science",
            SkillKind::Combat => "combat",
            SkillKind::Leadership => "leadership",
        };
        f.write_str(s)
    }
}

/// Skill levels, each in `[0, MAX_SKILL]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub piloting: u8,
    pub engineering: u8,
    pub science: u8,
    pub combat: u8,
    pub leadership: u8,
}

impl Skills {
    pub fn get(&self, skill: SkillKind) -> u8 {
        match skill {
            SkillKind::Piloting => self.piloting,
            SkillKind::Engineering => self.engineering,
            SkillKind::Science => self.science,
            SkillKind::Combat => self.combat,
            SkillKind::Leadership => self.leadership,
        }
    }

    pub fn set(&mut self, skill: SkillKind, level: u8) {
        match skill {
            SkillKind::Piloting => self.piloting = level,
            SkillKind::Engineering => self.engineering = level,
            SkillKind::Science => self.science = level,
            SkillKind::Combat => self.combat = level,
            SkillKind::Leadership => self.leadership = level,
        }
    }

    /// Raise one skill by a level, saturating at [`MAX_SKILL`]. Returns the new level.
    pub fn train(&mut self, skill: SkillKind) -> u8 {
        let level = self.get(skill).saturating_add(1).min(MAX_SKILL);
        self.set(skill, level);
        level
    }

    pub fn max_level(&self) -> u8 {
        SkillKind::ALL
            .into_iter()
            .map(|s| self.get(s))
            .max()
            .unwrap_or(0)
    }
}

/// A member of the ship's crew.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: CrewId,
    pub name: String,
    pub role: CrewRole,
    pub skills: Skills,
    /// Morale in `[0, MAX_MORALE]`.
    pub morale: u8,
    pub background: String,
    pub age: u8,
    #[serde(default)]
    pub is_heir: bool,
}

impl CrewMember {
    /// Raise morale by `delta`, saturating at [`MAX_MORALE`].
    pub fn boost_morale(&mut self, delta: u8) {
        self.morale = self.morale.saturating_add(delta).min(MAX_MORALE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn training_saturates_at_max() {
        let mut s = Skills {
            piloting: 9,
            ..Skills::default()
        };
        assert_eq!(s.train(SkillKind::Piloting), 10);
        assert_eq!(s.train(SkillKind::Piloting), 10);
        assert_eq!(s.max_level(), MAX_SKILL);
    }

    proptest! {
        #[test]
        fn training_never_exceeds_max(start in 0u8..=MAX_SKILL, reps in 0usize..30) {
            let mut s = Skills { combat: start, ..Skills::default() };
            for _ in 0..reps {
                s.train(SkillKind::Combat);
            }
            prop_assert!(s.combat <= MAX_SKILL);
            prop_assert_eq!(s.combat as usize, (start as usize + reps).min(MAX_SKILL as usize));
        }
    }

    #[test]
    fn morale_boost_saturates() {
        let mut m = CrewMember {
            id: CrewId("c-1".into()),
            name: "Ada".into(),
            role: CrewRole::Pilot,
            skills: Skills::default(),
            morale: 95,
            background: "Test".into(),
            age: 30,
            is_heir: false,
        };
        m.boost_morale(10);
        assert_eq!(m.morale, MAX_MORALE);
        m.boost_morale(u8::MAX);
        assert_eq!(m.morale, MAX_MORALE);
    }
}
