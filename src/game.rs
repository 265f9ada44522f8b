//! Frame-stepping game shell
//!
//! Owns one `GameState`, the high-score board and the store it persists to.
//! Shells feed it wall-clock frame deltas; it runs whole `SIM_DT` ticks from
//! an accumulator and reacts to the events each tick emits.

use crate::consts::{FRAME_RATE, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScores, ScoreStore};
use crate::platform::time::MAX_FRAME_DT;
use crate::renderer::{Backdrop, Scene};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::UiModel;

pub struct Game<S: ScoreStore> {
    state: GameState,
    high_scores: HighScores,
    store: S,
    input: TickInput,
    accumulator: f32,
    backdrop: Backdrop,
}

impl<S: ScoreStore> Game<S> {
    /// New game on the start screen with the persisted board loaded
    pub fn new(seed: u64, tuning: Tuning, mut store: S) -> Self {
        let high_scores = store.load();
        let backdrop = Backdrop::new(tuning.screen_height);
        Self {
            state: GameState::with_tuning(seed, tuning),
            high_scores,
            store,
            input: TickInput::default(),
            accumulator: 0.0,
            backdrop,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Held steer keys
    pub fn set_steer(&mut self, left: bool, right: bool) {
        self.input.steer_left = left;
        self.input.steer_right = right;
    }

    pub fn press_start(&mut self) {
        self.input.start = true;
    }

    pub fn press_restart(&mut self) {
        self.input.restart = true;
    }

    /// Toggle demo mode; returns the new setting
    pub fn toggle_autopilot(&mut self) -> bool {
        self.input.autopilot = !self.input.autopilot;
        log::info!("Autopilot: {}", self.input.autopilot);
        self.input.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Advance by a frame delta (seconds), returning what happened
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        let was_playing = self.state.phase == GamePhase::Playing;
        tick(&mut self.state, &self.input, SIM_DT);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.restart = false;

        if was_playing {
            self.backdrop
                .advance(self.state.scroll_speed(), SIM_DT * FRAME_RATE);
        }

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, .. } = event {
                self.high_scores = self.store.save(*score, &self.high_scores);
            }
        }
        events
    }

    /// Renderer input for the current frame
    pub fn scene(&self) -> Scene {
        Scene::capture(&self.state, &self.backdrop)
    }

    /// Screen text for the current frame
    pub fn ui(&self) -> UiModel {
        UiModel::build(&self.state, &self.high_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;
    use crate::sim::{CrashCause, Spawn, TreeKind};

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_delay_ms: f64::MAX,
            ..Tuning::default()
        }
    }

    fn game_with(scores: &[u32]) -> Game<MemoryScoreStore> {
        let store = MemoryScoreStore::new(HighScores::from_scores(scores.iter().copied()));
        Game::new(7, quiet_tuning(), store)
    }

    /// Drop a tree onto the skier and run the colliding tick
    fn crash(game: &mut Game<MemoryScoreStore>) -> Vec<GameEvent> {
        game.state.apply_spawn(Spawn::Tree {
            x: game.state.player.rect.left(),
            kind: TreeKind::Pine,
        });
        if let Some(tree) = game.state.trees.last_mut() {
            tree.rect.pos.y = game.state.player.rect.top();
        }
        game.update(SIM_DT)
    }

    #[test]
    fn test_loads_board_on_creation() {
        let game = game_with(&[10, 30]);
        assert_eq!(game.high_scores().scores(), &[30, 10]);
        assert_eq!(game.phase(), GamePhase::StartScreen);
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut game = game_with(&[]);
        game.press_start();
        let events = game.update(SIM_DT);
        assert_eq!(events, vec![GameEvent::SessionStarted]);
        assert_eq!(game.phase(), GamePhase::Playing);

        crash(&mut game);
        assert_eq!(game.phase(), GamePhase::GameOver);
        // Start is not replayed on the game-over screen
        game.update(SIM_DT);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_persists_in_same_frame() {
        let mut game = game_with(&[50]);
        game.press_start();
        game.update(SIM_DT);
        game.state.score = 80;

        let events = crash(&mut game);
        assert!(events.contains(&GameEvent::GameOver {
            score: 80,
            cause: CrashCause::Tree,
        }));
        assert_eq!(game.high_scores().scores(), &[80, 50]);
        assert_eq!(game.store().persisted().scores(), &[80, 50]);
    }

    #[test]
    fn test_unwritable_store_keeps_board_in_memory() {
        let store = MemoryScoreStore::read_only(HighScores::new());
        let mut game = Game::new(7, quiet_tuning(), store);
        game.press_start();
        game.update(SIM_DT);
        game.state.score = 30;
        crash(&mut game);
        assert_eq!(game.high_scores().scores(), &[30]);
        assert!(game.store().persisted().is_empty());
    }

    #[test]
    fn test_restart_then_start() {
        let mut game = game_with(&[]);
        game.press_start();
        game.update(SIM_DT);
        game.state.score = 40;
        crash(&mut game);

        game.press_restart();
        game.update(SIM_DT);
        assert_eq!(game.phase(), GamePhase::StartScreen);
        assert!(game.ui().contains("Last Score: 40"));
        assert!(game.ui().contains("1. 40"));

        game.press_start();
        game.update(SIM_DT);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().last_score, Some(40));
        assert!(game.state().trees.is_empty());
        assert_eq!(
            game.state().scroll_speed(),
            game.state().tuning.initial_scroll_speed
        );
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut game = game_with(&[]);
        game.press_start();
        game.update(SIM_DT);
        let before = game.state().time_ticks;
        game.update(10.0);
        let ran = game.state().time_ticks - before;
        assert!(ran as u32 <= MAX_SUBSTEPS);
        assert!(ran >= 5);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut game = game_with(&[]);
        game.press_start();
        game.update(SIM_DT * 0.5);
        assert_eq!(game.phase(), GamePhase::StartScreen);
        game.update(SIM_DT * 0.6);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_backdrop_moves_only_while_playing() {
        let mut game = game_with(&[]);
        let still = game.backdrop().clone();
        game.update(SIM_DT * 4.0);
        assert_eq!(game.backdrop(), &still);

        game.press_start();
        game.update(SIM_DT);
        game.update(SIM_DT);
        assert_ne!(game.backdrop(), &still);

        crash(&mut game);
        let frozen = game.backdrop().clone();
        game.update(SIM_DT * 4.0);
        assert_eq!(game.backdrop(), &frozen);
    }

    #[test]
    fn test_scene_and_ui_follow_phase() {
        let mut game = game_with(&[]);
        assert!(game.scene().sprites.is_empty());
        game.press_start();
        game.update(SIM_DT);
        assert_eq!(game.scene().sprites.len(), 1);
        assert!(game.ui().contains("Score: 0"));
    }
}
