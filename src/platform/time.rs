//! Monotonic clocks
//!
//! The simulation never reads wall time itself; shells sample a `Clock` once
//! per frame and hand the delta to the game.

use std::cell::Cell;

/// Maximum frame delta fed to the game (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// A monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time: `Instant` natively, `performance.now()` in the browser
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Turns clock readings into per-frame deltas
#[derive(Debug)]
pub struct FrameClock<C: Clock> {
    clock: C,
    last_ms: Option<f64>,
}

impl<C: Clock> FrameClock<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_ms: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Seconds since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    ///
    /// The first call returns `fallback`.
    pub fn delta(&mut self, fallback: f32) -> f32 {
        let now = self.clock.now_ms();
        let dt = match self.last_ms {
            Some(last) => ((now - last) / 1000.0) as f32,
            None => fallback,
        };
        self.last_ms = Some(now);
        dt.clamp(0.0, MAX_FRAME_DT)
    }
}
