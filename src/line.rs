//! # Signal Lines
//!
//! [`SignalLine`] owns one [`Path`], the line drawable rendered through it,
//! and every signal and label attached to it. An external driver calls
//! [`SignalLine::update`] once per tick; the line advances all signals first,
//! prunes the ones that finished, then lets labels reorient.
//!
//! ## Lifecycle
//!
//! A line is `Active` as soon as construction succeeds and becomes `Disposed`
//! after [`SignalLine::dispose`]. Every operation that mutates a disposed line
//! fails with [`SignalLineError::UseAfterDispose`]; a second `dispose` is a
//! no-op.
//!
//! ## Usage
//!
//! ```
//! use haggis_signals::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut line = SignalLine::new(
//!     SignalLineOptions::default().with_path(vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(10.0, 0.0, 0.0),
//!     ]),
//!     &mut scene,
//! )?;
//!
//! line.send(SignalOptions::default().with_speed(10.0), &mut scene)?;
//! for _ in 0..60 {
//!     line.update(&mut scene)?;
//! }
//! assert_eq!(line.signal_count(), 0);
//!
//! line.dispose(&mut scene);
//! # Ok::<(), haggis_signals::SignalLineError>(())
//! ```

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use cgmath::Point3;

use crate::error::{Result, SignalLineError};
use crate::gfx::backend::{DrawableBackend, DrawableHandle, LineMaterial};
use crate::label::{Label, LabelId, LabelOptions};
use crate::path::{LineType, Path};
use crate::signal::{Signal, SignalId, SignalOptions};

/// Configuration for a signal line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalLineOptions {
    /// Points of the line, or the three control points of a curve
    pub line_path: Vec<Point3<f32>>,
    pub line_type: LineType,
    pub material: LineMaterial,
    /// Log a state snapshot on construction and time every signal
    pub debug: bool,
}

impl SignalLineOptions {
    pub fn with_path(mut self, line_path: Vec<Point3<f32>>) -> Self {
        self.line_path = line_path;
        self
    }

    pub fn with_line_type(mut self, line_type: LineType) -> Self {
        self.line_type = line_type;
        self
    }

    /// Shorthand for a curve through `start`, `middle` and `end`
    pub fn curve(start: Point3<f32>, middle: Point3<f32>, end: Point3<f32>) -> Self {
        Self::default()
            .with_path(vec![start, middle, end])
            .with_line_type(LineType::Curve)
    }

    pub fn with_material(mut self, material: LineMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Lifecycle state of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Active,
    Disposed,
}

/// A label given either by id or by its position in the label list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRef {
    Id(LabelId),
    Index(usize),
}

impl From<LabelId> for LabelRef {
    fn from(id: LabelId) -> Self {
        LabelRef::Id(id)
    }
}

impl From<usize> for LabelRef {
    fn from(index: usize) -> Self {
        LabelRef::Index(index)
    }
}

impl From<&Label> for LabelRef {
    fn from(label: &Label) -> Self {
        LabelRef::Id(label.id())
    }
}

/// A polyline in the scene with the signals and labels attached to it
#[derive(Debug)]
pub struct SignalLine {
    options: SignalLineOptions,
    path: Rc<Path>,
    line: Option<DrawableHandle>,
    signals: Vec<Signal>,
    labels: Vec<Label>,
    state: LineState,
    /// Dispatch times per signal, kept only in debug mode
    signal_timers: HashMap<SignalId, Instant>,
}

impl SignalLine {
    /// Build the path, create the line drawable and add it to the scene.
    ///
    /// Fails with [`SignalLineError::InvalidPath`] for fewer than two points,
    /// or for a curve without exactly three control points. Nothing is added
    /// to the scene on failure.
    pub fn new<B: DrawableBackend + ?Sized>(options: SignalLineOptions, scene: &mut B) -> Result<Self> {
        let path = Rc::new(Path::from_line_type(
            options.line_path.clone(),
            options.line_type,
        )?);

        let line = scene.create_line_drawable(path.points(), &options.material);
        scene.add_to_scene(line);

        let signal_line = Self {
            options,
            path,
            line: Some(line),
            signals: Vec::new(),
            labels: Vec::new(),
            state: LineState::Active,
            signal_timers: HashMap::new(),
        };

        if signal_line.options.debug {
            log::debug!(
                "SignalLine {}: {:?} with {} points, length {:.3}, material {:?}",
                line,
                signal_line.options.line_type,
                signal_line.path.len(),
                signal_line.path.total_length(),
                signal_line.options.material
            );
        }

        Ok(signal_line)
    }

    fn ensure_active(&self, operation: &'static str) -> Result<()> {
        match self.state {
            LineState::Active => Ok(()),
            LineState::Disposed => Err(SignalLineError::UseAfterDispose(operation)),
        }
    }

    /// Dispatch a signal along the line and add its marker to the scene
    pub fn send<B: DrawableBackend + ?Sized>(
        &mut self,
        options: SignalOptions,
        scene: &mut B,
    ) -> Result<SignalId> {
        self.ensure_active("send")?;

        let signal = Signal::new(Rc::clone(&self.path), &options, scene)?;
        let id = signal.id();
        if let Some(handle) = signal.handle() {
            scene.add_to_scene(handle);
        }

        if self.options.debug {
            log::debug!("signal {} started at speed {}", id, options.speed);
            self.signal_timers.insert(id, Instant::now());
        }

        self.signals.push(signal);
        Ok(id)
    }

    /// Anchor a label on the line; its drawable becomes a child of the line's
    pub fn add_label<B: DrawableBackend + ?Sized>(
        &mut self,
        options: LabelOptions,
        scene: &mut B,
    ) -> Result<LabelId> {
        self.ensure_active("add_label")?;

        let label = Label::new(Rc::clone(&self.path), self.options.line_type, &options, scene)?;
        let id = label.id();
        if let (Some(line), Some(handle)) = (self.line, label.handle()) {
            scene.add_child(line, handle);
        }

        self.labels.push(label);
        Ok(id)
    }

    /// Remove a label by id or index and release its drawable.
    ///
    /// An unknown id or an out-of-range index fails with
    /// [`SignalLineError::InvalidArgument`] and leaves the labels unchanged.
    pub fn remove_label<B: DrawableBackend + ?Sized>(
        &mut self,
        label: impl Into<LabelRef>,
        scene: &mut B,
    ) -> Result<()> {
        self.ensure_active("remove_label")?;

        let index = self.label_index(label.into())?;
        let mut removed = self.labels.remove(index);
        removed.dispose(scene);
        Ok(())
    }

    fn label_index(&self, label: LabelRef) -> Result<usize> {
        match label {
            LabelRef::Id(id) => self
                .labels
                .iter()
                .position(|l| l.id() == id)
                .ok_or_else(|| SignalLineError::InvalidArgument(format!("no label {} on this line", id))),
            LabelRef::Index(index) if index < self.labels.len() => Ok(index),
            LabelRef::Index(index) => Err(SignalLineError::InvalidArgument(format!(
                "label index {} out of range for {} labels",
                index,
                self.labels.len()
            ))),
        }
    }

    /// Mutate a label in place, e.g. to change its text, and get the result
    pub fn with_label<B, F, T>(&mut self, label: impl Into<LabelRef>, scene: &mut B, f: F) -> Result<T>
    where
        B: DrawableBackend + ?Sized,
        F: FnOnce(&mut Label, &mut B) -> Result<T>,
    {
        self.ensure_active("with_label")?;

        let index = self.label_index(label.into())?;
        f(&mut self.labels[index], scene)
    }

    /// Advance every signal by one fixed tick, then update labels.
    ///
    /// Must be called at [`TICKS_PER_SECOND`](crate::signal::TICKS_PER_SECOND);
    /// use [`advance`](Self::advance) when frame times vary.
    pub fn update<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) -> Result<()> {
        self.ensure_active("update")?;

        for signal in &mut self.signals {
            signal.tick(scene)?;
        }
        self.finish_update(scene)
    }

    /// Advance every signal by `delta_time` seconds, then update labels
    pub fn advance<B: DrawableBackend + ?Sized>(&mut self, delta_time: f32, scene: &mut B) -> Result<()> {
        self.ensure_active("advance")?;

        for signal in &mut self.signals {
            signal.advance(delta_time, scene)?;
        }
        self.finish_update(scene)
    }

    fn finish_update<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) -> Result<()> {
        self.prune_signals();

        for label in &mut self.labels {
            label.update(scene)?;
        }

        Ok(())
    }

    /// Drop finished signals; their drawables were released when they finished
    fn prune_signals(&mut self) {
        let debug = self.options.debug;
        let timers = &mut self.signal_timers;

        self.signals.retain(|signal| {
            if !signal.is_finished() {
                return true;
            }

            log::trace!("signal {} reached the end of the line", signal.id());
            if debug {
                if let Some(started) = timers.remove(&signal.id()) {
                    log::debug!("signal {}: {:?}", signal.id(), started.elapsed());
                }
            }
            false
        });
    }

    /// Stop a signal before it reaches the end and release its drawable.
    ///
    /// Returns `false` when no live signal has this id.
    pub fn cancel_signal<B: DrawableBackend + ?Sized>(&mut self, id: SignalId, scene: &mut B) -> Result<bool> {
        self.ensure_active("cancel_signal")?;

        let Some(index) = self.signals.iter().position(|s| s.id() == id) else {
            return Ok(false);
        };

        let mut signal = self.signals.remove(index);
        signal.dispose(scene);
        self.signal_timers.remove(&id);
        Ok(true)
    }

    /// Release every signal, every label and then the line itself.
    ///
    /// Safe to call more than once; only the first call releases anything.
    pub fn dispose<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) {
        if self.state == LineState::Disposed {
            return;
        }

        for mut signal in self.signals.drain(..) {
            signal.dispose(scene);
        }
        for mut label in self.labels.drain(..) {
            label.dispose(scene);
        }
        if let Some(line) = self.line.take() {
            scene.dispose_handle(line);
        }

        self.signal_timers.clear();
        self.state = LineState::Disposed;
        log::trace!("signal line disposed");
    }

    /// Total length of the line's path
    pub fn line_length(&self) -> f32 {
        self.path.total_length()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &SignalLineOptions {
        &self.options
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == LineState::Disposed
    }

    /// The line drawable, `None` once disposed
    pub fn handle(&self) -> Option<DrawableHandle> {
        self.line
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id() == id)
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id() == id)
    }

    pub fn label_at(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Scene;

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    fn options() -> SignalLineOptions {
        SignalLineOptions::default().with_path(vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(10.0, 0.0, 10.0)])
    }

    #[test]
    fn test_construction_adds_line_to_scene() {
        let mut scene = Scene::new();
        let line = SignalLine::new(options(), &mut scene).unwrap();

        assert_eq!(line.state(), LineState::Active);
        assert_eq!(scene.roots(), vec![line.handle().unwrap()]);
        assert_eq!(line.line_length(), 20.0);
    }

    #[test]
    fn test_failed_construction_leaves_scene_empty() {
        let mut scene = Scene::new();
        let result = SignalLine::new(SignalLineOptions::default().with_path(vec![p(0.0, 0.0, 0.0)]), &mut scene);

        assert!(matches!(result, Err(SignalLineError::InvalidPath { .. })));
        assert_eq!(scene.get_statistics().object_count, 0);
    }

    #[test]
    fn test_invalid_speed_is_not_added() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();

        let err = line.send(SignalOptions::default().with_speed(0.0), &mut scene).unwrap_err();
        assert_eq!(err, SignalLineError::InvalidSpeed(0.0));
        assert_eq!(line.signal_count(), 0);
        assert_eq!(scene.get_statistics().marker_count, 0);
    }

    #[test]
    fn test_finished_signals_are_pruned() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        // 20 units at 20 u/s and 10 u/s: 60 and 120 ticks
        let fast = line.send(SignalOptions::default().with_speed(20.0), &mut scene).unwrap();
        let slow = line.send(SignalOptions::default().with_speed(10.0), &mut scene).unwrap();

        for _ in 0..60 {
            line.update(&mut scene).unwrap();
        }
        assert!(line.signal(fast).is_none());
        assert!(line.signal(slow).is_some());
        assert_eq!(scene.released(), &[fast]);

        for _ in 0..60 {
            line.update(&mut scene).unwrap();
        }
        assert_eq!(line.signal_count(), 0);
        assert_eq!(scene.released(), &[fast, slow]);
    }

    #[test]
    fn test_cancel_signal() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        let id = line.send(SignalOptions::default(), &mut scene).unwrap();

        assert!(line.cancel_signal(id, &mut scene).unwrap());
        assert!(!line.cancel_signal(id, &mut scene).unwrap());
        assert_eq!(scene.released(), &[id]);
    }

    #[test]
    fn test_labels_are_children_of_the_line() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        let label = line.add_label(LabelOptions::default(), &mut scene).unwrap();

        assert_eq!(scene.children(line.handle().unwrap()), vec![label]);
        assert_eq!(line.label_at(0).map(Label::id), Some(label));
    }

    #[test]
    fn test_remove_label_by_unknown_ref_keeps_state() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        line.add_label(LabelOptions::default(), &mut scene).unwrap();

        let by_index = line.remove_label(3usize, &mut scene);
        let by_id = line.remove_label(DrawableHandle::new(999), &mut scene);

        assert!(matches!(by_index, Err(SignalLineError::InvalidArgument(_))));
        assert!(matches!(by_id, Err(SignalLineError::InvalidArgument(_))));
        assert_eq!(line.label_count(), 1);
        assert!(scene.released().is_empty());
    }

    #[test]
    fn test_with_label_mutates_text() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        let id = line.add_label(LabelOptions::default(), &mut scene).unwrap();

        line.with_label(id, &mut scene, |label, scene| label.set_text("relay", scene))
            .unwrap();
        assert_eq!(line.label(id).unwrap().text().text, "relay");
    }

    #[test]
    fn test_use_after_dispose() {
        let mut scene = Scene::new();
        let mut line = SignalLine::new(options(), &mut scene).unwrap();
        line.dispose(&mut scene);
        line.dispose(&mut scene);

        assert!(line.is_disposed());
        assert_eq!(
            line.send(SignalOptions::default(), &mut scene),
            Err(SignalLineError::UseAfterDispose("send"))
        );
        assert_eq!(line.update(&mut scene), Err(SignalLineError::UseAfterDispose("update")));
        assert_eq!(
            line.add_label(LabelOptions::default(), &mut scene),
            Err(SignalLineError::UseAfterDispose("add_label"))
        );
        assert_eq!(
            line.remove_label(0usize, &mut scene),
            Err(SignalLineError::UseAfterDispose("remove_label"))
        );
        assert_eq!(scene.released().len(), 1);
    }
}
