use std::collections::BTreeMap;

use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Transform};

use super::object::{DrawableKind, Object};
use crate::error::{Result, SignalLineError};
use crate::gfx::backend::{
    DrawableBackend, DrawableHandle, LineMaterial, MarkerAppearance, TextOptions,
};
use crate::gfx::bounds::Aabb;
use crate::gfx::camera::OrbitCamera;

/// In-memory scene graph implementing [`DrawableBackend`]
///
/// Keeps every live drawable with its transform and parent, and records each
/// release so callers can check that handles are disposed exactly once.
#[derive(Debug, Default)]
pub struct Scene {
    pub camera: Option<OrbitCamera>,
    objects: BTreeMap<DrawableHandle, Object>,
    next_id: u64,
    released: Vec<DrawableHandle>,
}

impl Scene {
    /// Creates an empty scene without a camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scene looked at through `camera`
    pub fn with_camera(camera: OrbitCamera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::default()
        }
    }

    fn insert(&mut self, name: String, kind: DrawableKind) -> DrawableHandle {
        self.next_id += 1;
        let handle = DrawableHandle::new(self.next_id);
        self.objects.insert(handle, Object::new(name, kind));
        handle
    }

    fn object_mut_or_err(&mut self, handle: DrawableHandle) -> Result<&mut Object> {
        self.objects
            .get_mut(&handle)
            .ok_or(SignalLineError::UnknownDrawable(handle))
    }

    fn label_text_mut(&mut self, handle: DrawableHandle) -> Result<&mut TextOptions> {
        match &mut self.object_mut_or_err(handle)?.kind {
            DrawableKind::Label { text } => Ok(text),
            _ => Err(SignalLineError::UnknownDrawable(handle)),
        }
    }

    /// Gets immutable reference to a live object
    pub fn get_object(&self, handle: DrawableHandle) -> Option<&Object> {
        self.objects.get(&handle)
    }

    /// Whether `handle` refers to a drawable that has not been released
    pub fn is_live(&self, handle: DrawableHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Handles of live objects attached directly under `parent`
    pub fn children(&self, parent: DrawableHandle) -> Vec<DrawableHandle> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.parent == Some(parent))
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Handles attached to the scene root, in creation order
    pub fn roots(&self) -> Vec<DrawableHandle> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.in_scene)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Every release in the order it happened
    pub fn released(&self) -> &[DrawableHandle] {
        &self.released
    }

    /// World transform of an object, composed through its parents
    pub fn world_transform(&self, handle: DrawableHandle) -> Option<Matrix4<f32>> {
        let mut transform = Matrix4::identity();
        let mut current = Some(handle);

        while let Some(h) = current {
            let object = self.objects.get(&h)?;
            transform = object.local_transform() * transform;
            current = object.parent;
        }

        Some(transform)
    }

    /// World-space position of an object
    pub fn world_position(&self, handle: DrawableHandle) -> Option<Point3<f32>> {
        self.world_transform(handle)
            .map(|m| m.transform_point(Point3::new(0.0, 0.0, 0.0)))
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            object_count: self.objects.len(),
            released_count: self.released.len(),
            ..Default::default()
        };

        for object in self.objects.values() {
            match object.kind {
                DrawableKind::Line { .. } => stats.line_count += 1,
                DrawableKind::Marker { .. } => stats.marker_count += 1,
                DrawableKind::Label { .. } => stats.label_count += 1,
            }
        }

        stats
    }
}

impl DrawableBackend for Scene {
    fn create_line_drawable(&mut self, points: &[Point3<f32>], material: &LineMaterial) -> DrawableHandle {
        let name = format!("line ({} points)", points.len());
        self.insert(
            name,
            DrawableKind::Line {
                points: points.to_vec(),
                material: material.clone(),
            },
        )
    }

    fn create_marker_drawable(
        &mut self,
        position: Point3<f32>,
        appearance: &MarkerAppearance,
    ) -> DrawableHandle {
        let handle = self.insert(
            "marker".to_string(),
            DrawableKind::Marker {
                appearance: appearance.clone(),
            },
        );
        if let Some(object) = self.objects.get_mut(&handle) {
            object.set_translation(position);
        }
        handle
    }

    fn create_label_drawable(&mut self, text: &TextOptions) -> DrawableHandle {
        self.insert(
            format!("label \"{}\"", text.text),
            DrawableKind::Label { text: text.clone() },
        )
    }

    fn add_to_scene(&mut self, handle: DrawableHandle) {
        match self.objects.get_mut(&handle) {
            Some(object) => {
                object.parent = None;
                object.in_scene = true;
            }
            None => log::warn!("add_to_scene: drawable {} is not live", handle),
        }
    }

    fn add_child(&mut self, parent: DrawableHandle, child: DrawableHandle) {
        if !self.objects.contains_key(&parent) {
            log::warn!("add_child: parent drawable {} is not live", parent);
            return;
        }
        match self.objects.get_mut(&child) {
            Some(object) => {
                object.parent = Some(parent);
                object.in_scene = false;
            }
            None => log::warn!("add_child: drawable {} is not live", child),
        }
    }

    fn dispose_handle(&mut self, handle: DrawableHandle) {
        if self.objects.remove(&handle).is_none() {
            log::warn!("dispose_handle: drawable {} already released", handle);
            return;
        }

        // Orphaned children stay alive but drop out of the graph.
        for object in self.objects.values_mut() {
            if object.parent == Some(handle) {
                object.parent = None;
            }
        }

        self.released.push(handle);
    }

    fn set_marker_position(&mut self, handle: DrawableHandle, position: Point3<f32>) -> Result<()> {
        self.object_mut_or_err(handle)?.set_translation(position);
        Ok(())
    }

    fn set_transform(
        &mut self,
        handle: DrawableHandle,
        position: Point3<f32>,
        rotation_y: Rad<f32>,
    ) -> Result<()> {
        self.object_mut_or_err(handle)?
            .set_transform_ty(position, rotation_y);
        Ok(())
    }

    fn label_bounds(&self, handle: DrawableHandle) -> Result<Aabb> {
        let extent = self
            .objects
            .get(&handle)
            .and_then(Object::text_extent)
            .ok_or(SignalLineError::UnknownDrawable(handle))?;

        // Text geometry is centred on its local origin.
        let half = extent * 0.5;
        Ok(Aabb::new(
            Point3::new(-half.x, -half.y, -half.z),
            Point3::new(half.x, half.y, half.z),
        ))
    }

    fn set_label_text(&mut self, handle: DrawableHandle, text: &str) -> Result<()> {
        self.label_text_mut(handle)?.text = text.to_string();
        Ok(())
    }

    fn set_label_font(&mut self, handle: DrawableHandle, font: &str) -> Result<()> {
        self.label_text_mut(handle)?.font = Some(font.to_string());
        Ok(())
    }

    fn set_label_size(&mut self, handle: DrawableHandle, size: f32) -> Result<()> {
        self.label_text_mut(handle)?.size = size;
        Ok(())
    }

    fn look_at(&mut self, handle: DrawableHandle, target: Point3<f32>) -> Result<()> {
        // `target` is in world space; bring it into the parent's space first.
        let parent_transform = match self.object_mut_or_err(handle)?.parent {
            Some(parent) => self.world_transform(parent),
            None => None,
        };
        let local_target = match parent_transform.and_then(|m| m.invert()) {
            Some(inverse) => inverse.transform_point(target),
            None => target,
        };

        self.object_mut_or_err(handle)?.look_at(local_target);
        Ok(())
    }

    fn camera_position(&self) -> Option<Point3<f32>> {
        self.camera.as_ref().map(|camera| camera.eye)
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub line_count: usize,
    pub marker_count: usize,
    pub label_count: usize,
    pub released_count: usize,
}
