use bevy::math::Vec3;
use std::collections::BTreeMap;

/// Opaque handle to a visual owned by a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum VisualShape {
    Sphere { radius: f32 },
    Cuboid { size: Vec3 },
    /// glTF file whose first scene is spawned, e.g. `models/couch.glb`.
    Model { path: String, scale: Vec3, yaw: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualDesc {
    pub shape: VisualShape,
    pub position: Vec3,
    pub color: [f32; 3],
    /// Ignores scene lighting.
    pub unlit: bool,
}

impl VisualDesc {
    pub fn sphere(radius: f32, position: Vec3) -> Self {
        Self {
            shape: VisualShape::Sphere { radius },
            position,
            color: [0.25, 0.25, 0.25],
            unlit: false,
        }
    }

    pub fn cuboid(size: Vec3, position: Vec3) -> Self {
        Self {
            shape: VisualShape::Cuboid { size },
            position,
            color: [1.0, 1.0, 1.0],
            unlit: false,
        }
    }

    pub fn model(path: impl Into<String>, position: Vec3) -> Self {
        Self {
            shape: VisualShape::Model {
                path: path.into(),
                scale: Vec3::ONE,
                yaw: 0.0,
            },
            position,
            color: [1.0, 1.0, 1.0],
            unlit: false,
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    pub fn with_transform(mut self, scale: Vec3, yaw: f32) -> Self {
        if let VisualShape::Model {
            scale: model_scale,
            yaw: model_yaw,
            ..
        } = &mut self.shape
        {
            *model_scale = scale;
            *model_yaw = yaw;
        }
        self
    }
}

/// Render-side container for visuals. The core adds, moves and removes
/// visuals but never renders them.
pub trait SceneGraph {
    fn add_visual(&mut self, desc: VisualDesc) -> VisualHandle;
    /// Returns `false` if the visual was already gone.
    fn remove_visual(&mut self, handle: VisualHandle) -> bool;
    fn contains_visual(&self, handle: VisualHandle) -> bool;
    fn set_visual_position(&mut self, handle: VisualHandle, position: Vec3);
    fn visual_count(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneChange {
    Added(VisualHandle, VisualDesc),
    Moved(VisualHandle, Vec3),
    Removed(VisualHandle),
}

/// Scene graph that keeps the authoritative visual list and records changes
/// for the render layer to replay.
#[derive(Debug, Default, Clone)]
pub struct SceneLedger {
    next_handle: u32,
    visuals: BTreeMap<VisualHandle, VisualDesc>,
    changes: Vec<SceneChange>,
}

impl SceneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualDesc> {
        self.visuals.get(&handle)
    }

    pub fn visuals(&self) -> impl Iterator<Item = (VisualHandle, &VisualDesc)> {
        self.visuals.iter().map(|(handle, desc)| (*handle, desc))
    }

    pub fn drain_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }
}

impl SceneGraph for SceneLedger {
    fn add_visual(&mut self, desc: VisualDesc) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.visuals.insert(handle, desc.clone());
        self.changes.push(SceneChange::Added(handle, desc));
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) -> bool {
        if self.visuals.remove(&handle).is_none() {
            return false;
        }
        self.changes.push(SceneChange::Removed(handle));
        true
    }

    fn contains_visual(&self, handle: VisualHandle) -> bool {
        self.visuals.contains_key(&handle)
    }

    fn set_visual_position(&mut self, handle: VisualHandle, position: Vec3) {
        let Some(desc) = self.visuals.get_mut(&handle) else {
            return;
        };
        if desc.position != position {
            desc.position = position;
            self.changes.push(SceneChange::Moved(handle, position));
        }
    }

    fn visual_count(&self) -> usize {
        self.visuals.len()
    }
}
