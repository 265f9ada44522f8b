//! Screen text layout
//!
//! The browser draws text in DOM over the canvas, so the UI is a list of
//! positioned lines rather than glyphs. Positions are fractions of the
//! playfield so the overlay scales with the canvas.

use crate::highscores::{HIGH_SCORES_SHOWN, HighScores};
use crate::sim::{GamePhase, GameState};

pub const TITLE: &str = "Horace Skis Again!";
pub const INSTRUCTIONS: [&str; 3] = [
    "Use Left/Right Arrows to Steer",
    "Ski Between Flags (Green/Red) for Points",
    "Avoid the Trees!",
];
pub const START_PROMPT: &str = "Press ENTER to Start";
pub const HIGH_SCORES_HEADING: &str = "High Scores:";
pub const GAME_OVER: &str = "GAME OVER";
pub const RESTART_PROMPT: &str = "Press 'R' to Restart";

/// Visual role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Instruction,
    Warning,
    Prompt,
    Heading,
    Entry,
    /// Score box in the corner while playing
    Hud,
    Banner,
    Overlay,
}

impl TextStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            TextStyle::Title => "ui-title",
            TextStyle::Instruction => "ui-instruction",
            TextStyle::Warning => "ui-warning",
            TextStyle::Prompt => "ui-prompt",
            TextStyle::Heading => "ui-heading",
            TextStyle::Entry => "ui-entry",
            TextStyle::Hud => "ui-hud",
            TextStyle::Banner => "ui-banner",
            TextStyle::Overlay => "ui-overlay",
        }
    }

    /// Text colour (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            TextStyle::Instruction => [0, 0, 139],
            TextStyle::Warning | TextStyle::Banner => [139, 0, 0],
            TextStyle::Overlay => [255, 255, 255],
            _ => [0, 0, 0],
        }
    }
}

/// Horizontal anchoring of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiLine {
    pub text: String,
    /// Vertical position as a fraction of screen height
    pub y: f32,
    pub style: TextStyle,
    pub anchor: Anchor,
}

impl UiLine {
    fn centered(text: impl Into<String>, y: f32, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            y,
            style,
            anchor: Anchor::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiModel {
    pub phase: GamePhase,
    pub lines: Vec<UiLine>,
}

impl UiModel {
    pub fn build(state: &GameState, high_scores: &HighScores) -> Self {
        let lines = match state.phase {
            GamePhase::StartScreen => start_screen(state.last_score, high_scores),
            GamePhase::Playing => vec![UiLine {
                text: format!("Score: {}", state.score),
                y: 8.0 / state.tuning.screen_height,
                style: TextStyle::Hud,
                anchor: Anchor::TopLeft,
            }],
            GamePhase::GameOver => game_over(state.last_score.unwrap_or(state.score)),
        };
        Self {
            phase: state.phase,
            lines,
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts().any(|t| t == text)
    }
}

fn start_screen(last_score: Option<u32>, high_scores: &HighScores) -> Vec<UiLine> {
    let mut lines = vec![UiLine::centered(TITLE, 0.2, TextStyle::Title)];

    let styles = [
        TextStyle::Instruction,
        TextStyle::Instruction,
        TextStyle::Warning,
    ];
    for (i, (text, style)) in INSTRUCTIONS.iter().zip(styles).enumerate() {
        lines.push(UiLine::centered(*text, 0.4 + i as f32 * 0.05, style));
    }

    lines.push(UiLine::centered(HIGH_SCORES_HEADING, 0.6, TextStyle::Heading));
    for (i, score) in high_scores.top(HIGH_SCORES_SHOWN).iter().enumerate() {
        lines.push(UiLine::centered(
            format!("{}. {}", i + 1, score),
            0.65 + i as f32 * 0.05,
            TextStyle::Entry,
        ));
    }

    if let Some(last) = last_score {
        lines.push(UiLine::centered(
            format!("Last Score: {}", last),
            0.78,
            TextStyle::Entry,
        ));
    }

    lines.push(UiLine::centered(START_PROMPT, 0.85, TextStyle::Prompt));
    lines
}

fn game_over(final_score: u32) -> Vec<UiLine> {
    vec![
        UiLine::centered(GAME_OVER, 0.4, TextStyle::Banner),
        UiLine::centered(format!("Final Score: {}", final_score), 0.5, TextStyle::Overlay),
        UiLine::centered(RESTART_PROMPT, 0.6, TextStyle::Overlay),
    ]
}
