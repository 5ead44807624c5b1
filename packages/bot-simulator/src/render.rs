//! Plain-text presentation: the workspace's only I/O device.
//!
//! Implements the engine's rendering and difficulty-prompt seams for a
//! terminal, in the spirit of the game's classic CLI layout: opponent
//! line, the two center tops, player line.

use std::io::{self, BufRead, Write};

use speed_backend::bots::profiles::BotDifficulty;
use speed_backend::domain::snapshot::GameSnapshot;
use speed_backend::render::{DifficultyPrompt, GameRenderer};

#[derive(Default)]
pub struct TextRenderer;

impl GameRenderer for TextRenderer {
    fn render(&mut self, snapshot: &GameSnapshot) {
        let tops: Vec<String> = snapshot
            .pile_tops
            .iter()
            .map(|top| top.map(|c| c.to_string()).unwrap_or_else(|| "--".to_string()))
            .collect();

        println!(
            "[{:>4}] {}: hand {} kitty {}    | {} {} |    {}: hand {} kitty {}",
            snapshot.seq,
            snapshot.seats[0].name,
            snapshot.seats[0].hand_size,
            snapshot.seats[0].kitty_size,
            tops[0],
            tops[1],
            snapshot.seats[1].name,
            snapshot.seats[1].hand_size,
            snapshot.seats[1].kitty_size,
        );
    }
}

#[derive(Default)]
pub struct StdinPrompt;

impl DifficultyPrompt for StdinPrompt {
    fn prompt_difficulty(&mut self) -> BotDifficulty {
        println!("------ Difficulty ------");
        println!("What difficulty opponent will you face?");
        println!("(e)asy, (m)edium, (h)ard, (i)mpossible");
        let _ = io::stdout().flush();

        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);

        match line.trim() {
            "e" => BotDifficulty::Easy,
            "m" => BotDifficulty::Medium,
            "h" => BotDifficulty::Hard,
            "i" => BotDifficulty::Impossible,
            _ => BotDifficulty::Medium,
        }
    }
}
