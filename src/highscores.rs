//! High score leaderboard
//!
//! Keeps the top 10 scores for each level and difficulty. The host persists the
//! leaderboard as JSON; [`ScoreRecorder`] fills it in from game-over events.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::EventSink;
use crate::settings::{Difficulty, Level};
use crate::sim::portal::Orientation;

/// Maximum number of high scores kept per board
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Displayed score
    pub score: u64,
    #[serde(default)]
    pub level: Level,
    pub difficulty: Difficulty,
    /// Furthest orientation reached
    #[serde(default)]
    pub orientation: Orientation,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries for one level and difficulty, best first
    pub fn board(&self, level: Level, difficulty: Difficulty) -> impl Iterator<Item = &HighScoreEntry> {
        self.entries
            .iter()
            .filter(move |e| e.level == level && e.difficulty == difficulty)
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, level: Level, difficulty: Difficulty, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let board: Vec<_> = self.board(level, difficulty).collect();
        if board.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        board.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, level: Level, difficulty: Difficulty, score: u64) -> Option<usize> {
        if !self.qualifies(level, difficulty, score) {
            return None;
        }
        let mut board = self.board(level, difficulty).peekable();
        let mut rank = 1;
        while board.next_if(|e| score <= e.score).is_some() {
            rank += 1;
        }
        Some(rank)
    }

    /// Add a new score (if it qualifies)
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(
        &mut self,
        level: Level,
        difficulty: Difficulty,
        score: u64,
        orientation: Orientation,
        timestamp: u64,
    ) -> Option<usize> {
        let rank = self.potential_rank(level, difficulty, score)?;

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            HighScoreEntry {
                score,
                level,
                difficulty,
                orientation,
                timestamp,
            },
        );

        // Trim this board to max size
        let mut kept = 0;
        self.entries.retain(|e| {
            if e.level != level || e.difficulty != difficulty {
                return true;
            }
            kept += 1;
            kept <= MAX_HIGH_SCORES
        });

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score for a board (if any)
    pub fn top_score(&self, level: Level, difficulty: Difficulty) -> Option<u64> {
        self.board(level, difficulty).next().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        // Stored data may come from anywhere; keep the ordering guarantee
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Records the final score of each run into a leaderboard
#[derive(Debug, Clone)]
pub struct ScoreRecorder {
    scores: HighScores,
    level: Level,
    difficulty: Difficulty,
    orientation: Orientation,
    last_rank: Option<usize>,
}

impl ScoreRecorder {
    pub fn new(scores: HighScores, level: Level, difficulty: Difficulty) -> Self {
        Self {
            scores,
            level,
            difficulty,
            orientation: level.start_orientation(),
            last_rank: None,
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    /// Rank of the most recent run (None if it didn't place)
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn into_scores(self) -> HighScores {
        self.scores
    }
}

impl EventSink for ScoreRecorder {
    fn on_portal_enter(&mut self, orientation: Orientation) {
        self.orientation = self.orientation.max(orientation);
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.last_rank = self.scores.add_score(
            self.level,
            self.difficulty,
            final_score,
            self.orientation,
            unix_now(),
        );
        match self.last_rank {
            Some(rank) => log::info!("New high score {} (rank {})", final_score, rank),
            None => log::debug!("Score {} did not place", final_score),
        }
        self.orientation = self.level.start_orientation();
    }
}
