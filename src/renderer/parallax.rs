//! Scrolling background layers
//!
//! Each layer is a screen-sized tile drawn twice, one copy stacked directly
//! above the other. When a copy scrolls a full tile height it jumps back
//! above its partner, so the slope never shows a seam.

/// Number of backdrop layers
pub const LAYER_COUNT: usize = 4;

/// Layer order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Sky and far peaks
    Mountains,
    Hills,
    /// Speckled snow, moves with the obstacles
    Snow,
    /// Drawn in front of the sprites
    Clouds,
}

impl LayerKind {
    pub const ALL: [LayerKind; LAYER_COUNT] = [
        LayerKind::Mountains,
        LayerKind::Hills,
        LayerKind::Snow,
        LayerKind::Clouds,
    ];

    /// Scroll speed relative to the obstacles
    pub fn speed_factor(&self) -> f32 {
        match self {
            LayerKind::Mountains => 0.1,
            LayerKind::Hills => 0.3,
            LayerKind::Snow => 1.0,
            LayerKind::Clouds => 1.2,
        }
    }
}

/// One tiled layer
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub kind: LayerKind,
    pub height: f32,
    /// Top edge of the first copy
    pub y1: f32,
    /// Top edge of the second copy
    pub y2: f32,
}

impl ParallaxLayer {
    pub fn new(kind: LayerKind, height: f32) -> Self {
        Self {
            kind,
            height,
            y1: 0.0,
            y2: -height,
        }
    }

    /// Scroll by `scroll_speed * factor` per frame
    pub fn advance(&mut self, scroll_speed: f32, frames: f32) {
        let step = scroll_speed * self.kind.speed_factor() * frames;
        self.y1 += step;
        self.y2 += step;

        if self.y1 >= self.height {
            self.y1 = self.y2 - self.height;
        }
        if self.y2 >= self.height {
            self.y2 = self.y1 - self.height;
        }
        if self.y1 < -self.height {
            self.y1 = self.y2 + self.height;
        }
        if self.y2 < -self.height {
            self.y2 = self.y1 + self.height;
        }
    }

    /// Scroll offset in `[0, height)`, as consumed by the shader
    pub fn offset(&self) -> f32 {
        self.y1.max(self.y2).rem_euclid(self.height)
    }
}

/// All background and foreground layers
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub layers: [ParallaxLayer; LAYER_COUNT],
}

impl Backdrop {
    pub fn new(height: f32) -> Self {
        Self {
            layers: LayerKind::ALL.map(|kind| ParallaxLayer::new(kind, height)),
        }
    }

    pub fn advance(&mut self, scroll_speed: f32, frames: f32) {
        for layer in &mut self.layers {
            layer.advance(scroll_speed, frames);
        }
    }

    pub fn offsets(&self) -> [f32; LAYER_COUNT] {
        self.layers.each_ref().map(ParallaxLayer::offset)
    }
}
