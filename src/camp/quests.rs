//! Daily quest generation.
//!
//! Quests are flavor objectives tracked by the chat glue; the engine only
//! stores them and hands out fresh sets. A set is always exactly three
//! quests drawn independently (with replacement, duplicates allowed) from a
//! fixed template pool, and is replaced wholesale on regeneration.

use rand::Rng;

use crate::camp::types::Quest;

/// How many quests a user or tent holds at a time.
pub const QUEST_SLOTS: usize = 3;

/// Fixed pool of quest templates: description and coin reward.
pub const QUEST_POOL: [(&str, u64); 5] = [
    ("Send 50 chat messages", 200),
    ("Use any command 5 times", 150),
    ("Mention 3 people", 120),
    ("Spend 10 minutes in voice", 300),
    ("Share 1 picture", 100),
];

/// Draw a fresh quest set. Stateless; nothing carries between calls.
pub fn generate<R: Rng>(rng: &mut R) -> Vec<Quest> {
    (0..QUEST_SLOTS)
        .map(|_| {
            let (description, reward) = QUEST_POOL[rng.gen_range(0..QUEST_POOL.len())];
            Quest {
                description: description.to_string(),
                reward,
                done: false,
            }
        })
        .collect()
}
