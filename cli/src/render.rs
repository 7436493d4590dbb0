//! Text rendering of a game snapshot and its events.

use std::fmt::Write;

use game_2048_core::{GameEvent, GameStatus, Snapshot, SIZE};

pub const TITLE: &str = "=== 2048 ===";

pub fn controls(debug: bool) -> String {
    let mut text =
        String::from("Controls: WASD or Arrow Keys | C continue | M next mode | R restart | Q quit");
    if debug {
        text.push_str("\nDebug: G game over | V win target | F fill board | T add 2048");
    }
    text
}

/// Draw the header and grid.
pub fn board(snapshot: &Snapshot) -> String {
    let mut grid = [[0u32; SIZE]; SIZE];
    for tile in &snapshot.tiles {
        grid[tile.row][tile.col] = tile.value;
    }

    let mut out = String::new();
    let target = snapshot
        .target_level
        .map_or_else(|| "all cleared".to_string(), |level| level.to_string());
    let _ = writeln!(
        out,
        "Score: {}  Best: {}  Mode: {}  Target: {}",
        snapshot.score, snapshot.best_score, snapshot.mode, target
    );
    let _ = writeln!(out, "+------+------+------+------+");
    for row in grid {
        out.push('|');
        for value in row {
            if value == 0 {
                out.push_str("      |");
            } else {
                let _ = write!(out, "{:^6}|", value);
            }
        }
        out.push('\n');
        let _ = writeln!(out, "+------+------+------+------+");
    }
    out
}

/// One message per event, in order.
pub fn events(snapshot: &Snapshot, events: &[GameEvent]) -> String {
    let mut out = String::new();
    for event in events {
        match *event {
            GameEvent::Achievement {
                level,
                is_win,
                is_new_record,
            } => {
                let _ = writeln!(out, "\n  *** Congratulations! You reached {} ***", level);
                let subtitle = match (is_win, is_new_record) {
                    (true, true) => "New record!",
                    (true, false) => "Well done!",
                    (false, _) => "Keep going!",
                };
                let _ = writeln!(out, "  {}", subtitle);
                if is_win && snapshot.status == GameStatus::Won {
                    let _ = writeln!(out, "  Press C to continue or R for a new game");
                }
            }
            GameEvent::GameOver {
                final_score,
                highest_tile,
                near_best,
            } => {
                let _ = writeln!(out, "\n  *** GAME OVER ***");
                let _ = writeln!(out, "  No moves left!");
                if near_best {
                    let _ = writeln!(out, "  Well done!");
                }
                let _ = writeln!(out, "  Final Score: {}", final_score);
                let _ = writeln!(out, "  Best Score: {}", snapshot.best_score);
                let _ = writeln!(out, "  Highest Tile: {}", highest_tile);
                let _ = writeln!(out, "\n  Press R to restart or Q to quit");
            }
        }
    }
    out
}
