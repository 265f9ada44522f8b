//! Renderer input snapshot
//!
//! A `Scene` is everything the GPU pass needs for one frame, captured from
//! the game state without holding a borrow on it.

use super::parallax::{Backdrop, LAYER_COUNT};
use crate::sim::{FlagColor, GamePhase, GameState, Lean, Rect, TreeKind};

/// Opacity of the black overlay on the game-over screen
pub const GAME_OVER_DIM: f32 = 150.0 / 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Skier(Lean),
    Tree(TreeKind),
    Flag(FlagColor),
}

impl SpriteKind {
    /// Shader shape id and variant
    pub fn shader_ids(&self) -> (u32, u32) {
        match self {
            SpriteKind::Skier(Lean::Straight) => (0, 0),
            SpriteKind::Skier(Lean::Left) => (0, 1),
            SpriteKind::Skier(Lean::Right) => (0, 2),
            SpriteKind::Tree(TreeKind::Pine) => (1, 0),
            SpriteKind::Tree(TreeKind::LayeredPine) => (1, 1),
            SpriteKind::Flag(FlagColor::Green) => (2, 0),
            SpriteKind::Flag(FlagColor::Red) => (2, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub phase: GamePhase,
    /// Playfield size in world pixels
    pub world_size: [f32; 2],
    /// Draw order: trees, flags, then the skier
    pub sprites: Vec<Sprite>,
    pub layer_offsets: [f32; LAYER_COUNT],
    /// Black overlay opacity drawn over the world
    pub overlay: f32,
}

impl Scene {
    pub fn capture(state: &GameState, backdrop: &Backdrop) -> Self {
        let world_size = [state.tuning.screen_width, state.tuning.screen_height];
        let layer_offsets = backdrop.offsets();

        let (sprites, overlay) = match state.phase {
            // Title screen is text over plain sky
            GamePhase::StartScreen => (Vec::new(), 0.0),
            GamePhase::Playing => (world_sprites(state), 0.0),
            GamePhase::GameOver => (world_sprites(state), GAME_OVER_DIM),
        };

        Self {
            phase: state.phase,
            world_size,
            sprites,
            layer_offsets,
            overlay,
        }
    }

    pub fn shows_world(&self) -> bool {
        self.phase != GamePhase::StartScreen
    }
}

fn world_sprites(state: &GameState) -> Vec<Sprite> {
    let trees = state.trees.iter().map(|t| Sprite {
        kind: SpriteKind::Tree(t.kind),
        rect: t.rect,
    });
    let flags = state.flags.iter().map(|f| Sprite {
        kind: SpriteKind::Flag(f.color),
        rect: f.rect,
    });
    let skier = std::iter::once(Sprite {
        kind: SpriteKind::Skier(state.player.lean()),
        rect: state.player.rect,
    });
    trees.chain(flags).chain(skier).collect()
}
