//! # Line Driver
//!
//! Owns a set of named [`SignalLine`]s and advances them from the host's
//! frame loop. Frame times are scaled, accumulated and consumed in fixed
//! steps so signal motion stays deterministic regardless of frame rate.

use std::collections::HashMap;

use crate::error::Result;
use crate::gfx::backend::DrawableBackend;
use crate::line::SignalLine;
use crate::signal::TICKS_PER_SECOND;

/// Duration of one signal tick in seconds
pub const TICK_DURATION: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// Drives many signal lines from a per-frame delta time
#[derive(Debug)]
pub struct LineDriver {
    /// Lines by unique name
    lines: HashMap<String, SignalLine>,
    is_paused: bool,
    time_scale: f32,
    accumulated_time: f32,
    /// `None` advances lines by the raw frame time
    fixed_timestep: Option<f32>,
}

impl Default for LineDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDriver {
    /// Create a driver stepping at the signal tick rate
    pub fn new() -> Self {
        Self {
            lines: HashMap::new(),
            is_paused: false,
            time_scale: 1.0,
            accumulated_time: 0.0,
            fixed_timestep: Some(TICK_DURATION),
        }
    }

    /// Add a line under `name`.
    ///
    /// A line already registered under the same name is disposed and replaced.
    pub fn add_line<B: DrawableBackend + ?Sized>(
        &mut self,
        name: impl Into<String>,
        line: SignalLine,
        scene: &mut B,
    ) {
        let name = name.into();
        if let Some(mut old) = self.lines.insert(name.clone(), line) {
            log::debug!("replacing signal line '{}'", name);
            old.dispose(scene);
        }
    }

    /// Remove and dispose the line registered under `name`
    ///
    /// # Returns
    /// `true` if a line was removed
    pub fn remove_line<B: DrawableBackend + ?Sized>(&mut self, name: &str, scene: &mut B) -> bool {
        match self.lines.remove(name) {
            Some(mut line) => {
                line.dispose(scene);
                true
            }
            None => false,
        }
    }

    pub fn has_line(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    pub fn line(&self, name: &str) -> Option<&SignalLine> {
        self.lines.get(name)
    }

    pub fn line_mut(&mut self, name: &str) -> Option<&mut SignalLine> {
        self.lines.get_mut(name)
    }

    pub fn line_names(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Update all lines (called every frame)
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last frame in seconds
    /// * `scene` - Backend the lines draw into
    pub fn update<B: DrawableBackend + ?Sized>(&mut self, delta_time: f32, scene: &mut B) -> Result<()> {
        if self.is_paused || self.lines.is_empty() {
            return Ok(());
        }

        let scaled_delta = delta_time * self.time_scale;

        match self.fixed_timestep {
            Some(fixed_dt) => {
                self.accumulated_time += scaled_delta;

                while self.accumulated_time >= fixed_dt {
                    self.step_all(fixed_dt, scene)?;
                    self.accumulated_time -= fixed_dt;
                }
            }
            None => self.step_all(scaled_delta, scene)?,
        }

        Ok(())
    }

    fn step_all<B: DrawableBackend + ?Sized>(&mut self, dt: f32, scene: &mut B) -> Result<()> {
        // A step of exactly one tick goes through the fixed cadence path.
        let whole_tick = (dt - TICK_DURATION).abs() <= f32::EPSILON;

        for line in self.lines.values_mut().filter(|line| !line.is_disposed()) {
            if whole_tick {
                line.update(scene)?;
            } else {
                line.advance(dt, scene)?;
            }
        }

        Ok(())
    }

    /// Dispose every line and forget them
    pub fn dispose_all<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) {
        for (name, mut line) in self.lines.drain() {
            log::trace!("disposing signal line '{}'", name);
            line.dispose(scene);
        }
        self.accumulated_time = 0.0;
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the time scale multiplier, clamped to be non-negative
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn fixed_timestep(&self) -> Option<f32> {
        self.fixed_timestep
    }

    /// Set the fixed step in seconds, or `None` for variable steps
    pub fn set_fixed_timestep(&mut self, timestep: Option<f32>) {
        self.fixed_timestep = timestep.filter(|dt| *dt > 0.0);
        self.accumulated_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Scene;
    use crate::line::SignalLineOptions;
    use crate::signal::SignalOptions;
    use cgmath::Point3;

    fn line(scene: &mut Scene) -> SignalLine {
        SignalLine::new(
            SignalLineOptions::default()
                .with_path(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(60.0, 0.0, 0.0)]),
            scene,
        )
        .unwrap()
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut scene = Scene::new();
        let mut driver = LineDriver::new();
        let mut l = line(&mut scene);
        // 60 units at 60 u/s: one unit per tick
        let id = l.send(SignalOptions::default().with_speed(60.0), &mut scene).unwrap();
        driver.add_line("main", l, &mut scene);

        // Half a tick does not step yet
        driver.update(TICK_DURATION * 0.5, &mut scene).unwrap();
        assert_eq!(driver.line("main").unwrap().signal(id).unwrap().lerp(), 0.0);

        driver.update(TICK_DURATION * 0.6, &mut scene).unwrap();
        let x = driver.line("main").unwrap().signal(id).unwrap().position().x;
        assert!((x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_paused_driver_does_nothing() {
        let mut scene = Scene::new();
        let mut driver = LineDriver::new();
        let mut l = line(&mut scene);
        let id = l.send(SignalOptions::default().with_speed(60.0), &mut scene).unwrap();
        driver.add_line("main", l, &mut scene);

        driver.set_paused(true);
        driver.update(1.0, &mut scene).unwrap();
        assert_eq!(driver.line("main").unwrap().signal(id).unwrap().lerp(), 0.0);
    }

    #[test]
    fn test_variable_step_finishes_signal() {
        let mut scene = Scene::new();
        let mut driver = LineDriver::new();
        driver.set_fixed_timestep(None);
        let mut l = line(&mut scene);
        l.send(SignalOptions::default().with_speed(60.0), &mut scene).unwrap();
        driver.add_line("main", l, &mut scene);

        driver.update(0.5, &mut scene).unwrap();
        assert_eq!(driver.line("main").unwrap().signal_count(), 1);
        driver.update(0.6, &mut scene).unwrap();
        assert_eq!(driver.line("main").unwrap().signal_count(), 0);
    }

    #[test]
    fn test_replace_and_remove_dispose_lines() {
        let mut scene = Scene::new();
        let mut driver = LineDriver::new();
        let first = line(&mut scene);
        let first_handle = first.handle().unwrap();
        driver.add_line("main", first, &mut scene);
        let second = line(&mut scene);
        driver.add_line("main", second, &mut scene);

        assert_eq!(driver.len(), 1);
        assert_eq!(scene.released(), &[first_handle]);

        assert!(driver.remove_line("main", &mut scene));
        assert!(!driver.remove_line("main", &mut scene));
        assert_eq!(scene.get_statistics().object_count, 0);
    }

    #[test]
    fn test_dispose_all() {
        let mut scene = Scene::new();
        let mut driver = LineDriver::new();
        for name in ["a", "b", "c"] {
            let l = line(&mut scene);
            driver.add_line(name, l, &mut scene);
        }

        driver.dispose_all(&mut scene);
        assert!(driver.is_empty());
        assert_eq!(scene.get_statistics().released_count, 3);
    }
}
