// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene objects that animations write to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an animated scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    /// Create a new random target ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform of a scene object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in euler angles (degrees)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Transform at the given position
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation (degrees)
    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }
}

/// A named object in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name
    pub name: String,
    /// Current transform
    pub transform: Transform,
}

/// Flat store of animated objects.
///
/// No hierarchy: every transform is in world space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: IndexMap<TargetId, SceneObject>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its ID
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> TargetId {
        let id = TargetId::new();
        self.objects.insert(
            id,
            SceneObject {
                name: name.into(),
                transform,
            },
        );
        id
    }

    /// Remove an object
    pub fn despawn(&mut self, id: TargetId) -> Option<SceneObject> {
        self.objects.shift_remove(&id)
    }

    /// Get an object
    pub fn get(&self, id: TargetId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Get an object's transform
    pub fn transform(&self, id: TargetId) -> Option<&Transform> {
        self.objects.get(&id).map(|o| &o.transform)
    }

    /// Get an object's transform mutably
    pub fn transform_mut(&mut self, id: TargetId) -> Option<&mut Transform> {
        self.objects.get_mut(&id).map(|o| &mut o.transform)
    }

    /// Find the first object with the given name
    pub fn find(&self, name: &str) -> Option<TargetId> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(id, _)| *id)
    }

    /// Whether the scene contains an object
    pub fn contains(&self, id: TargetId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Iterate objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (TargetId, &SceneObject)> {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
