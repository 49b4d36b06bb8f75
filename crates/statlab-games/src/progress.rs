use serde::{Deserialize, Serialize};

/// Errors from driving a game through its levels.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LevelError {
    #[display("level {index} does not exist (game has {count} levels)")]
    OutOfRange { index: usize, count: usize },
    #[display("level target not reached yet")]
    GateClosed,
    #[display("level is not being played")]
    NotPlaying,
    #[display("level has not been completed")]
    NotCompleted,
    #[display("control '{control}' is locked on this level")]
    ControlLocked { control: &'static str },
    #[display("level {index} cannot be played: {reason}")]
    Invalid { index: usize, reason: &'static str },
}

/// Where the player is within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum Phase {
    /// Parameters can be adjusted and the gate is evaluated continuously.
    Playing,
    /// The level was completed; its outcome is on display.
    LevelComplete,
    /// All levels are done.
    Finished,
}

/// Result of leaving a completed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Advance {
    /// The level with this index has been loaded.
    Next(usize),
    /// There are no more levels.
    Finished,
}

/// Record of a completed level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelOutcome {
    /// Zero-based level index.
    pub level: usize,
    pub title: String,
    pub insight: String,
    /// Points earned, for scored games.
    pub score: Option<u32>,
    /// Whether the answer was right, for games that ask a question.
    pub correct: Option<bool>,
}

/// Level cursor shared by all games.
///
/// # Lifecycle
///
/// ```text
/// start_level(i) ──> Playing ──complete()──> LevelComplete ──advance()──┐
///        ^                                                               │
///        └──────────────── Next(i + 1) ──────────────────────────────────┤
///                                                                        └─> Finished
/// ```
///
/// [`complete`](Self::complete) only succeeds while playing and with the gate
/// open; [`advance`](Self::advance) only after a completion.
#[derive(Debug, Clone)]
pub struct Progress {
    level: usize,
    level_count: usize,
    phase: Phase,
    outcomes: Vec<LevelOutcome>,
}

impl Progress {
    /// Creates a cursor positioned on the first level.
    ///
    /// A game without levels starts out finished.
    #[must_use]
    pub fn new(level_count: usize) -> Self {
        Self {
            level: 0,
            level_count,
            phase: if level_count == 0 {
                Phase::Finished
            } else {
                Phase::Playing
            },
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_last_level(&self) -> bool {
        self.level + 1 >= self.level_count
    }

    /// Outcomes of all completed levels, oldest first.
    #[must_use]
    pub fn outcomes(&self) -> &[LevelOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&LevelOutcome> {
        self.outcomes.last()
    }

    /// Sum of all scored outcomes.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.outcomes.iter().filter_map(|o| o.score).sum()
    }

    /// Number of outcomes that were answered correctly.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.correct == Some(true))
            .count()
    }

    /// Positions the cursor on `index` and starts playing it.
    pub fn start_level(&mut self, index: usize) -> Result<(), LevelError> {
        if index >= self.level_count {
            return Err(LevelError::OutOfRange {
                index,
                count: self.level_count,
            });
        }
        self.level = index;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Marks the current level as complete and records its outcome.
    pub fn complete(&mut self, gate_open: bool, outcome: LevelOutcome) -> Result<(), LevelError> {
        if !self.phase.is_playing() {
            return Err(LevelError::NotPlaying);
        }
        if !gate_open {
            return Err(LevelError::GateClosed);
        }
        self.phase = Phase::LevelComplete;
        self.outcomes.push(outcome);
        Ok(())
    }

    /// Leaves a completed level.
    ///
    /// Returns the index of the level to load next, or moves to
    /// [`Phase::Finished`] after the last level. The caller is responsible for
    /// loading the next level (which calls [`start_level`](Self::start_level)).
    pub fn advance(&mut self) -> Result<Advance, LevelError> {
        if !self.phase.is_level_complete() {
            return Err(LevelError::NotCompleted);
        }
        if self.is_last_level() {
            self.phase = Phase::Finished;
            return Ok(Advance::Finished);
        }
        Ok(Advance::Next(self.level + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(level: usize, score: Option<u32>, correct: Option<bool>) -> LevelOutcome {
        LevelOutcome {
            level,
            title: format!("Level {level}"),
            insight: String::new(),
            score,
            correct,
        }
    }

    #[test]
    fn test_full_walkthrough() {
        let mut progress = Progress::new(2);
        assert!(progress.phase().is_playing());

        progress.complete(true, outcome(0, Some(900), None)).unwrap();
        assert!(progress.phase().is_level_complete());
        assert_eq!(progress.advance(), Ok(Advance::Next(1)));

        progress.start_level(1).unwrap();
        assert!(progress.is_last_level());
        progress.complete(true, outcome(1, Some(1000), None)).unwrap();
        assert_eq!(progress.advance(), Ok(Advance::Finished));
        assert!(progress.phase().is_finished());
        assert_eq!(progress.total_score(), 1900);
        assert_eq!(progress.outcomes().len(), 2);
    }

    #[test]
    fn test_gate_must_be_open() {
        let mut progress = Progress::new(3);
        assert_eq!(
            progress.complete(false, outcome(0, None, None)),
            Err(LevelError::GateClosed)
        );
        assert!(progress.phase().is_playing());
        assert!(progress.outcomes().is_empty());
    }

    #[test]
    fn test_out_of_order_calls() {
        let mut progress = Progress::new(3);
        assert_eq!(progress.advance(), Err(LevelError::NotCompleted));
        progress.complete(true, outcome(0, None, None)).unwrap();
        assert_eq!(
            progress.complete(true, outcome(0, None, None)),
            Err(LevelError::NotPlaying)
        );
        assert_eq!(
            progress.start_level(3),
            Err(LevelError::OutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_correct_count() {
        let mut progress = Progress::new(3);
        for (level, correct) in [true, false, true].into_iter().enumerate() {
            progress.start_level(level).unwrap();
            progress
                .complete(true, outcome(level, None, Some(correct)))
                .unwrap();
        }
        assert_eq!(progress.correct_count(), 2);
        assert_eq!(progress.total_score(), 0);
    }

    #[test]
    fn test_empty_game_is_finished() {
        let progress = Progress::new(0);
        assert!(progress.phase().is_finished());
    }
}
