//! Bounded-random constructors for recruits and surveyed planets.
//!
//! All randomness comes from the caller's `Rng`, so a seeded generator
//! reproduces the same crew and planets.

use rand::Rng;
use sim_core::{
    ClosedRange, CrewGeneration, CrewId, CrewMember, CrewRole, Planet, PlanetGeneration,
    PlanetResource, PlanetType, SkillKind, Skills,
};

const FIRST_NAMES: [&str; 12] = [
    "Kira", "Tomas", "Ines", "Ravi", "Mei", "Oren", "Sasha", "Dmitri", "Lena", "Kofi", "Yara",
    "Felix",
];

const LAST_NAMES: [&str; 10] = [
    "Novak", "Reyes", "Haldane", "Sato", "Mbeki", "Larsen", "Quinn", "Petrov", "Iwu", "Moreau",
];

const BACKGROUNDS: [&str; 8] = [
    "Asteroid miner",
    "Colony-born farmer",
    "Former military officer",
    "Merchant fleet deckhand",
    "University researcher",
    "Orbital station medic",
    "Reformed smuggler",
    "Diplomatic attaché",
];

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn draw<R: Rng + ?Sized>(rng: &mut R, range: ClosedRange) -> u32 {
    rng.gen_range(range.min..=range.max)
}

fn draw_u8<R: Rng + ?Sized>(rng: &mut R, range: ClosedRange) -> u8 {
    u8::try_from(draw(rng, range)).unwrap_or(u8::MAX)
}

/// A fresh random crew id. Uniqueness against an existing crew is the caller's concern.
pub fn crew_id<R: Rng + ?Sized>(rng: &mut R) -> CrewId {
    CrewId(format!("crew-{:016x}", rng.gen::<u64>()))
}

/// A random recruit. Never the heir.
pub fn generate_crew_member<R: Rng + ?Sized>(rng: &mut R, cfg: &CrewGeneration) -> CrewMember {
    let role = pick(rng, &CrewRole::ALL);
    let background = pick(rng, &BACKGROUNDS).to_string();
    let mut skills = Skills::default();
    for skill in SkillKind::ALL {
        skills.set(skill, draw_u8(rng, cfg.skill));
    }
    let morale = draw_u8(rng, cfg.morale);
    let age = draw_u8(rng, cfg.age);
    let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
    CrewMember {
        id: crew_id(rng),
        name,
        role,
        skills,
        morale,
        background,
        age,
        is_heir: false,
    }
}

/// Positional planet name: 0 -> "A", 1 -> "B", ...
pub fn planet_designation(index: usize) -> String {
    let mut n = index;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Planets for a freshly surveyed system.
///
/// Each planet draws a tag count and then that many tags; a repeated tag is
/// dropped, not re-drawn, so a planet can end up with fewer tags than drawn.
pub fn generate_planets<R: Rng + ?Sized>(rng: &mut R, cfg: &PlanetGeneration) -> Vec<Planet> {
    let count = draw(rng, cfg.count) as usize;
    (0..count)
        .map(|i| {
            let kind = pick(rng, &PlanetType::SURVEYABLE);
            let draws = draw(rng, cfg.resource_tags);
            let mut resources: Vec<PlanetResource> = Vec::with_capacity(draws as usize);
            for _ in 0..draws {
                let tag = pick(rng, &PlanetResource::SURVEYABLE);
                if !resources.contains(&tag) {
                    resources.push(tag);
                }
            }
            Planet {
                name: planet_designation(i),
                kind,
                resources,
                developed: false,
            }
        })
        .collect()
}
