//! Static bot difficulty profiles.
//!
//! Immutable configuration looked up by difficulty and injected into the
//! agent; never mutated at runtime. Delays model reaction time: the think
//! delay is re-sampled uniformly from `[min_delay, max_delay]` every cycle,
//! and the pickup timer runs independently at `pickup_interval`.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 4] = [
        BotDifficulty::Easy,
        BotDifficulty::Medium,
        BotDifficulty::Hard,
        BotDifficulty::Impossible,
    ];
}

#[derive(Debug, Clone, Copy)]
pub struct BotProfile {
    pub name: &'static str,
    /// Shown to the human when the match starts.
    pub intro_text: &'static str,
    /// Shown when the human beats this bot.
    pub win_text: &'static str,
    /// Shown when this bot wins.
    pub lose_text: &'static str,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub pickup_interval: Duration,
}

static EASY: BotProfile = BotProfile {
    name: "Limping Liam",
    intro_text: "He can't jump far",
    win_text: "Easy",
    lose_text: "Oh no",
    min_delay: Duration::from_millis(3000),
    max_delay: Duration::from_millis(5000),
    pickup_interval: Duration::from_millis(2500),
};

static MEDIUM: BotProfile = BotProfile {
    name: "Harrowing Hayden",
    intro_text: "He's a bit of a trickster so watch out",
    win_text: "Down goes the trickster",
    lose_text: "Damn, he's tricky",
    min_delay: Duration::from_millis(2000),
    max_delay: Duration::from_millis(3000),
    pickup_interval: Duration::from_millis(1500),
};

static HARD: BotProfile = BotProfile {
    name: "Masterful Mikaela",
    intro_text: "She can't be trusted",
    win_text: "Down falls Mikaela and her wicked ways",
    lose_text: "Oof, rough one",
    min_delay: Duration::from_millis(1000),
    max_delay: Duration::from_millis(3000),
    pickup_interval: Duration::from_millis(1000),
};

static IMPOSSIBLE: BotProfile = BotProfile {
    name: "Chaotic Kate",
    intro_text: "rip lol",
    win_text: "No one will ever see this message so it doesn't matter",
    lose_text: "No chance",
    min_delay: Duration::from_millis(500),
    max_delay: Duration::from_millis(2000),
    pickup_interval: Duration::from_millis(500),
};

/// Look up the immutable profile for a difficulty tier.
pub fn profile(difficulty: BotDifficulty) -> &'static BotProfile {
    match difficulty {
        BotDifficulty::Easy => &EASY,
        BotDifficulty::Medium => &MEDIUM,
        BotDifficulty::Hard => &HARD,
        BotDifficulty::Impossible => &IMPOSSIBLE,
    }
}

/// Sample a think delay for one cycle, uniform over `[min, max]`.
pub fn sample_think_delay<R: Rng>(profile: &BotProfile, rng: &mut R) -> Duration {
    let min = profile.min_delay.as_millis() as u64;
    let max = profile.max_delay.as_millis() as u64;
    Duration::from_millis(rng.gen_range(min..=max))
}
