//! Whole-session tests through the public game shell

use horace_skis::consts::SIM_DT;
use horace_skis::highscores::{FileScoreStore, HighScores, MAX_HIGH_SCORES, MemoryScoreStore, ScoreStore};
use horace_skis::sim::{CrashCause, GameEvent, GamePhase};
use horace_skis::{Game, Tuning};

/// Only gates spawn, so a skier who never steers must eventually miss one
fn gates_only() -> Tuning {
    Tuning {
        tree_chance: 0.0,
        gate_chance: 1.0,
        ..Tuning::default()
    }
}

/// Play from the start screen until the run ends (or ten minutes pass)
fn play_out<S: ScoreStore>(game: &mut Game<S>) -> Vec<GameEvent> {
    game.press_start();
    let mut events = Vec::new();
    for _ in 0..60 * 600 {
        events.extend(game.update(SIM_DT));
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }
    events
}

#[test]
fn idle_skier_misses_a_gate() {
    let mut game = Game::new(2024, gates_only(), MemoryScoreStore::default());
    let events = play_out(&mut game);

    assert_eq!(game.phase(), GamePhase::GameOver);
    let passed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GatePassed { .. }))
        .count() as u32;
    let score = game.state().score;
    assert_eq!(score, passed * 10);
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            score,
            cause: CrashCause::MissedGate,
        })
    );
    assert_eq!(game.high_scores().scores(), &[score]);
}

#[test]
fn speed_events_match_thresholds() {
    let mut game = Game::new(99, Tuning::default(), MemoryScoreStore::default());
    game.set_autopilot(true);
    let events = play_out(&mut game);

    let bumps: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::SpeedIncreased { score, .. } => Some(*score),
            _ => None,
        })
        .collect();
    let score = game.state().score;
    assert_eq!(bumps.len() as u32, score / 100);
    assert!(bumps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn scores_survive_a_restart_of_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");

    let mut first = Game::new(1, gates_only(), FileScoreStore::new(&path));
    play_out(&mut first);
    let board = first.high_scores().clone();
    assert_eq!(board.len(), 1);
    drop(first);

    let second = Game::new(2, gates_only(), FileScoreStore::new(&path));
    assert_eq!(second.high_scores(), &board);
    assert!(second.ui().contains(&format!("1. {}", board.scores()[0])));
}

#[test]
fn many_runs_keep_a_top_ten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut game = Game::new(5, gates_only(), FileScoreStore::new(&path));

    let mut finished = Vec::new();
    for _ in 0..12 {
        play_out(&mut game);
        finished.push(game.state().score);
        game.press_restart();
        game.update(SIM_DT);
        assert_eq!(game.phase(), GamePhase::StartScreen);
    }

    let expected = HighScores::from_scores(finished);
    assert_eq!(game.high_scores(), &expected);
    assert_eq!(game.high_scores().len(), MAX_HIGH_SCORES);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), MAX_HIGH_SCORES);
    assert_eq!(HighScores::parse(&text), expected);
}

#[test]
fn restart_shows_last_score_until_next_run() {
    let mut game = Game::new(8, gates_only(), MemoryScoreStore::default());
    play_out(&mut game);
    let score = game.state().score;

    assert!(game.ui().contains(&format!("Final Score: {}", score)));
    game.press_restart();
    game.update(SIM_DT);
    assert!(game.ui().contains(&format!("Last Score: {}", score)));

    game.press_start();
    game.update(SIM_DT);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.state().score, 0);
    assert!(game.state().flags.is_empty());
    assert!(game.ui().contains("Score: 0"));
}
