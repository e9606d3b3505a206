//! Weighted wood drop table for the pickup command.
//!
//! Selection is the classic roulette walk: draw a uniform value in
//! `[0, total_weight)`, then scan entries in declaration order accumulating
//! weight until the draw falls inside an entry's range. Ties always resolve
//! by declaration order, never by recency, so the table below is the single
//! source of truth for both drop rates and display labels.

use rand::Rng;

/// One row of the drop table.
#[derive(Debug, Clone, Copy)]
pub struct LootEntry {
    pub code: &'static str,
    pub label: &'static str,
    pub weight: u32,
    pub min_kg: u64,
    pub max_kg: u64,
}

/// The fixed wood table. Common wood is heavy and plentiful, rare wood is
/// scarce and light.
pub const WOOD_TABLE: [LootEntry; 5] = [
    LootEntry { code: "01", label: "Wet Wood", weight: 40, min_kg: 1, max_kg: 40 },
    LootEntry { code: "02", label: "Rotten Wood", weight: 30, min_kg: 1, max_kg: 25 },
    LootEntry { code: "03", label: "Green Wood", weight: 15, min_kg: 1, max_kg: 15 },
    LootEntry { code: "04", label: "Dry Wood", weight: 10, min_kg: 1, max_kg: 12 },
    LootEntry { code: "05", label: "Rare Wood", weight: 5, min_kg: 1, max_kg: 8 },
];

/// A single sampled drop: which wood and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootDrop {
    pub code: String,
    pub label: &'static str,
    pub kg: u64,
}

/// Sample one drop from [`WOOD_TABLE`] using the caller's random source.
///
/// The RNG is injected so tests can drive the sampler with a seeded
/// `StdRng` and assert on distribution properties.
pub fn sample<R: Rng>(rng: &mut R) -> LootDrop {
    let total: u32 = WOOD_TABLE.iter().map(|e| e.weight).sum();
    let mut roll = rng.gen_range(0..total);
    let mut picked = &WOOD_TABLE[0];
    for entry in &WOOD_TABLE {
        if roll < entry.weight {
            picked = entry;
            break;
        }
        roll -= entry.weight;
    }
    let kg = rng.gen_range(picked.min_kg..=picked.max_kg);
    LootDrop {
        code: picked.code.to_string(),
        label: picked.label,
        kg,
    }
}
