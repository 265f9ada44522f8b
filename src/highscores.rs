//! High score leaderboard system
//!
//! Tracks the top 10 finished runs. The persisted form is plain text, one
//! score per line, highest first. Natively it lives in a file; in the browser
//! it lives in LocalStorage. Storage problems never stop the game: a failed
//! load gives an empty board and a failed save keeps the in-memory board.

use std::path::{Path, PathBuf};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Number of high scores shown on the start screen
pub const HIGH_SCORES_SHOWN: usize = 3;

/// Default score file name (native)
pub const HIGH_SCORE_FILE: &str = "horace_high_scores.txt";

/// High score leaderboard, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    scores: Vec<u32>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build a leaderboard from any scores (sorted and trimmed)
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut scores: Vec<u32> = scores.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    /// Add a finished run's score.
    ///
    /// Every score goes in; the board is then trimmed to its maximum size.
    /// Returns the 1-indexed rank if the score survived the trim.
    pub fn insert(&mut self, score: u32) -> Option<usize> {
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        self.scores.insert(pos, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// The best `n` scores
    pub fn top(&self, n: usize) -> &[u32] {
        &self.scores[..n.min(self.scores.len())]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    /// Parse the text form; malformed lines are skipped with a warning
    pub fn parse(text: &str) -> Self {
        let scores = text.lines().filter_map(|line| {
            let line = line.trim();
            match line.parse::<u32>() {
                Ok(score) => Some(score),
                Err(_) => {
                    log::warn!("Skipping invalid score line: {:?}", line);
                    None
                }
            }
        });
        Self::from_scores(scores)
    }

    /// Text form: one score per line
    pub fn to_text(&self) -> String {
        self.scores.iter().map(|s| format!("{}\n", s)).collect()
    }
}

/// Where the leaderboard is kept between runs
pub trait ScoreStore {
    /// Read the persisted board (empty on any failure)
    fn load(&mut self) -> HighScores;

    /// Record a finished run and persist the updated board.
    ///
    /// The updated board is returned even when it could not be written.
    fn save(&mut self, score: u32, current: &HighScores) -> HighScores;
}

/// Plain-text file store
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write through a temporary file so a crash never leaves half a board
    fn write(&self, scores: &HighScores) -> std::io::Result<()> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, scores.to_text())?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(HIGH_SCORE_FILE)
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> HighScores {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                // Undecodable bytes become a bad line that parse skips
                let scores = HighScores::parse(&String::from_utf8_lossy(&bytes));
                log::info!(
                    "Loaded {} high scores from {}",
                    scores.len(),
                    self.path.display()
                );
                scores
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Error loading high scores from {}: {}", self.path.display(), e);
                HighScores::new()
            }
        }
    }

    fn save(&mut self, score: u32, current: &HighScores) -> HighScores {
        let mut updated = current.clone();
        updated.insert(score);
        match self.write(&updated) {
            Ok(()) => log::info!("High scores saved ({} entries)", updated.len()),
            Err(e) => log::error!("Error saving high scores to {}: {}", self.path.display(), e),
        }
        updated
    }
}

/// In-process store, optionally refusing writes
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    persisted: HighScores,
    fail_writes: bool,
}

impl MemoryScoreStore {
    pub fn new(initial: HighScores) -> Self {
        Self {
            persisted: initial,
            fail_writes: false,
        }
    }

    /// A store whose saves always fail
    pub fn read_only(initial: HighScores) -> Self {
        Self {
            persisted: initial,
            fail_writes: true,
        }
    }

    /// What has actually been persisted
    pub fn persisted(&self) -> &HighScores {
        &self.persisted
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> HighScores {
        self.persisted.clone()
    }

    fn save(&mut self, score: u32, current: &HighScores) -> HighScores {
        let mut updated = current.clone();
        updated.insert(score);
        if self.fail_writes {
            log::warn!("High score store is read-only, keeping scores in memory");
        } else {
            self.persisted = updated.clone();
        }
        updated
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalScoreStore {
    const STORAGE_KEY: &'static str = "horace_high_scores";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScoreStore {
    fn load(&mut self) -> HighScores {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(text)) = storage.get_item(Self::STORAGE_KEY) {
                let scores = HighScores::parse(&text);
                log::info!("Loaded {} high scores", scores.len());
                return scores;
            }
        }

        log::info!("No high scores found, starting fresh");
        HighScores::new()
    }

    fn save(&mut self, score: u32, current: &HighScores) -> HighScores {
        let mut updated = current.clone();
        updated.insert(score);

        let saved = Self::storage()
            .map(|storage| storage.set_item(Self::STORAGE_KEY, &updated.to_text()).is_ok())
            .unwrap_or(false);
        if saved {
            log::info!("High scores saved ({} entries)", updated.len());
        } else {
            log::warn!("Could not save high scores to LocalStorage");
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.insert(50), Some(1));
        assert_eq!(scores.insert(80), Some(1));
        assert_eq!(scores.insert(60), Some(2));
        assert_eq!(scores.insert(60), Some(3));
        assert_eq!(scores.scores(), &[80, 60, 60, 50]);
        assert_eq!(scores.top_score(), Some(80));
    }

    #[test]
    fn test_insert_trims_to_max() {
        let mut scores = HighScores::from_scores((1..=10).map(|i| i * 10));
        assert_eq!(scores.insert(0), None);
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.insert(55), Some(6));
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.scores().last(), Some(&20));
    }

    #[test]
    fn test_zero_scores_are_recorded() {
        let mut scores = HighScores::new();
        assert_eq!(scores.insert(0), Some(1));
        assert_eq!(scores.scores(), &[0]);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let scores = HighScores::parse("30\nabc\n  70 \n\n-5\n10\n");
        assert_eq!(scores.scores(), &[70, 30, 10]);
    }

    #[test]
    fn test_parse_sorts_and_trims() {
        let text: String = (0..15).map(|i| format!("{}\n", i)).collect();
        let scores = HighScores::parse(&text);
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(14));
        assert_eq!(scores.scores().last(), Some(&5));
    }

    #[test]
    fn test_top() {
        let scores = HighScores::from_scores([5, 9, 1, 7]);
        assert_eq!(scores.top(HIGH_SCORES_SHOWN), &[9, 7, 5]);
        assert_eq!(HighScores::new().top(3), &[] as &[u32]);
    }

    #[test]
    fn test_text_round_trip() {
        let scores = HighScores::from_scores([40, 10, 30]);
        assert_eq!(scores.to_text(), "40\n30\n10\n");
        assert_eq!(HighScores::parse(&scores.to_text()), scores);
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileScoreStore::new(dir.path().join("scores.txt"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileScoreStore::new(dir.path().join("scores.txt"));
        let board = store.save(20, &HighScores::new());
        let board = store.save(50, &board);
        assert_eq!(board.scores(), &[50, 20]);
        assert_eq!(store.load(), board);
        assert!(!dir.path().join("scores.tmp").exists());
    }

    #[test]
    fn test_file_store_skips_undecodable_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let mut bytes = b"90\n80\n70\n".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE, b'\n']);
        std::fs::write(&path, bytes).unwrap();

        let mut store = FileScoreStore::new(&path);
        let loaded = store.load();
        assert_eq!(loaded.scores(), &[90, 80, 70]);

        let saved = store.save(5, &loaded);
        assert_eq!(saved.scores(), &[90, 80, 70, 5]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "90\n80\n70\n5\n");
    }

    #[test]
    fn test_file_store_unwritable_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist
        let mut store = FileScoreStore::new(dir.path().join("missing").join("scores.txt"));
        let board = store.save(30, &HighScores::from_scores([10]));
        assert_eq!(board.scores(), &[30, 10]);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_memory_store_read_only() {
        let mut store = MemoryScoreStore::read_only(HighScores::from_scores([5]));
        let loaded = store.load();
        let board = store.save(9, &loaded);
        assert_eq!(board.scores(), &[9, 5]);
        assert_eq!(store.persisted().scores(), &[5]);
    }
}
