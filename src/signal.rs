//! # Signals
//!
//! A [`Signal`] is one marker travelling along a [`Path`]. It owns its
//! progress (the point it departed from, the fraction of the current segment
//! covered, direction and per-tick step) and exactly one marker drawable.
//!
//! ## Speed normalisation
//!
//! Speed is given in path units per second. The step taken each tick is
//! derived from the length of the segment the marker is currently on:
//!
//! ```text
//! step = 1 / (segment_length / speed * ticks_per_second)
//! ```
//!
//! and is recomputed at every segment boundary, so a marker moves at the same
//! real-world speed over long and short segments alike.
//!
//! ## Timing contract
//!
//! [`Signal::tick`] assumes it is called at a fixed rate of
//! [`TICKS_PER_SECOND`]. Drivers that cannot guarantee the cadence use
//! [`Signal::advance`] with the elapsed time instead.

use std::rc::Rc;

use cgmath::Point3;

use crate::error::{Result, SignalLineError};
use crate::gfx::backend::{DrawableBackend, DrawableHandle, MarkerAppearance};
use crate::gfx::color::Color;
use crate::path::Path;

/// Assumed external tick rate
pub const TICKS_PER_SECOND: u32 = 60;

/// A wrap is accepted this fraction of a step early, absorbing f32 drift
const WRAP_TOLERANCE: f32 = 1e-3;

/// Identity of a signal on its line; the id of its marker drawable
pub type SignalId = DrawableHandle;

/// Travel direction along the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// From the first point to the last
    #[default]
    Forward,
    /// From the last point to the first
    Backward,
}

impl Direction {
    fn next_index(self, index: usize) -> usize {
        match self {
            Direction::Forward => index + 1,
            Direction::Backward => index - 1,
        }
    }
}

/// Configuration for one dispatched signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalOptions {
    pub color: Color,
    /// Path units per second
    pub speed: f32,
    pub size: f32,
    pub direction: Direction,
    pub opacity: f32,
    pub texture: Option<String>,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x220099),
            speed: 250.0,
            size: 40.0,
            direction: Direction::Forward,
            opacity: 1.0,
            texture: None,
        }
    }
}

impl SignalOptions {
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn backward(self) -> Self {
        self.with_direction(Direction::Backward)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    fn appearance(&self) -> MarkerAppearance {
        MarkerAppearance {
            color: self.color,
            size: self.size,
            opacity: self.opacity,
            texture: self.texture.clone(),
        }
    }
}

/// One marker travelling along a path
#[derive(Debug)]
pub struct Signal {
    id: SignalId,
    handle: Option<DrawableHandle>,
    path: Rc<Path>,
    /// Index of the point the current segment starts from, in travel direction
    cursor: usize,
    lerp: f32,
    step: f32,
    direction: Direction,
    speed: f32,
    ticks_per_second: u32,
    finished: bool,
    position: Point3<f32>,
}

impl Signal {
    /// Dispatch a new signal onto `path` and create its marker drawable.
    ///
    /// The drawable is created but not attached; the owning line adds it to
    /// the scene.
    pub fn new<B: DrawableBackend + ?Sized>(
        path: Rc<Path>,
        options: &SignalOptions,
        scene: &mut B,
    ) -> Result<Self> {
        if !(options.speed.is_finite() && options.speed > 0.0) {
            return Err(SignalLineError::InvalidSpeed(options.speed));
        }

        let cursor = match options.direction {
            Direction::Forward => 0,
            Direction::Backward => path.len() - 1,
        };
        let position = path.points()[cursor];
        let handle = scene.create_marker_drawable(position, &options.appearance());

        let mut signal = Self {
            id: handle,
            handle: Some(handle),
            path,
            cursor,
            lerp: 0.0,
            step: 0.0,
            direction: options.direction,
            speed: options.speed,
            ticks_per_second: TICKS_PER_SECOND,
            finished: false,
            position,
        };
        signal.step = signal.segment_step();

        Ok(signal)
    }

    /// Fraction of the current segment covered per tick at the configured speed
    fn segment_step(&self) -> f32 {
        let from = self.path.points()[self.cursor];
        let to = self.path.points()[self.direction.next_index(self.cursor)];
        let segment_length = cgmath::MetricSpace::distance(from, to);
        let prediction_time = segment_length / self.speed;

        1.0 / (prediction_time * self.ticks_per_second as f32)
    }

    /// Whether moving one step from `cursor` leaves the path
    fn is_past_end(&self) -> bool {
        match self.direction {
            Direction::Forward => self.cursor > self.path.len() - 2,
            Direction::Backward => self.cursor == 0,
        }
    }

    /// Advance by one tick at the fixed cadence.
    ///
    /// Completing the last segment finishes the signal and releases its
    /// drawable; later ticks are no-ops.
    pub fn tick<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) -> Result<()> {
        self.step_by(1.0, false, scene)
    }

    /// Advance by `delta_time` seconds of wall-clock time.
    ///
    /// Covers as many segment boundaries as the elapsed time spans, renormalising
    /// the step on every segment. Non-positive deltas do nothing.
    pub fn advance<B: DrawableBackend + ?Sized>(&mut self, delta_time: f32, scene: &mut B) -> Result<()> {
        if delta_time <= 0.0 || !delta_time.is_finite() {
            return Ok(());
        }

        let mut ticks = delta_time * self.ticks_per_second as f32;
        while !self.finished && ticks > 0.0 {
            // Ticks left in this segment before the wrap.
            let remaining = (1.0 - self.lerp) / self.step;
            if ticks < remaining {
                return self.step_by(ticks, false, scene);
            }
            ticks -= remaining;
            self.step_by(remaining, true, scene)?;
        }

        Ok(())
    }

    /// Move `ticks` (possibly fractional) ticks into the current segment.
    /// `wrap` forces the segment boundary to be crossed.
    fn step_by<B: DrawableBackend + ?Sized>(
        &mut self,
        ticks: f32,
        wrap: bool,
        scene: &mut B,
    ) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        self.lerp += self.step * ticks;

        if wrap || self.lerp + self.step * WRAP_TOLERANCE >= 1.0 {
            self.lerp = 0.0;
            self.cursor = self.direction.next_index(self.cursor);

            if self.is_past_end() {
                self.finished = true;
                self.dispose(scene);
                return Ok(());
            }

            self.step = self.segment_step();
        }

        let from = self.path.points()[self.cursor];
        let to = self.path.points()[self.direction.next_index(self.cursor)];
        self.position = from + (to - from) * self.lerp;

        match self.handle {
            Some(handle) => scene.set_marker_position(handle, self.position),
            None => Ok(()),
        }
    }

    /// Release the marker drawable. Safe to call any number of times.
    pub fn dispose<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) {
        if let Some(handle) = self.handle.take() {
            scene.dispose_handle(handle);
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    /// The live marker drawable, `None` once released
    pub fn handle(&self) -> Option<DrawableHandle> {
        self.handle
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the signal still holds its drawable and is moving
    pub fn is_active(&self) -> bool {
        !self.finished && self.handle.is_some()
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Index of the segment the marker is on, in `0..path.segment_count()`
    pub fn segment_index(&self) -> usize {
        match self.direction {
            Direction::Forward => self.cursor,
            Direction::Backward => self.cursor.saturating_sub(1),
        }
    }

    /// Index of the point the current segment is travelled from
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Fraction of the current segment covered, in `[0, 1)`
    pub fn lerp(&self) -> f32 {
        self.lerp
    }

    /// Fraction of the current segment covered per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
