//! Best runs of this session
//!
//! Kept in memory for the lifetime of the page (or process); tracks the top 10
//! finished runs.

use serde::Serialize;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighScoreEntry {
    /// Gates passed
    pub score: u32,
    /// Ticks survived
    pub ticks: u64,
}

/// Leaderboard, sorted by score descending
#[derive(Debug, Clone, Default, Serialize)]
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

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, ticks: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, ticks };

        // Ties go after existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
