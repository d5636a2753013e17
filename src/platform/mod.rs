//! Platform abstraction layer
//!
//! Everything the game logic needs from the AR host goes through these traits:
//! - Tracking (viewer pose, plane hit-tests, plane detection on/off)
//! - Scene graph (nodes, names, transforms, timed transitions)
//! - Physics (rigid bodies, restitution, impulses)
//! - Assets, audio cues and alerts
//!
//! Contact-begin events flow the other way: the host reports them to the
//! session as [`crate::sim::SessionEvent::ContactBegin`].

pub mod headless;

pub use headless::HeadlessHost;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;

/// Opaque handle to a node in the host scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tracked horizontal plane reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneAnchor {
    /// Stable anchor identity across updates
    pub id: u32,
    /// Node the host created for this anchor (overlays are parented here)
    pub node: NodeId,
    /// Center of the plane in anchor-local coordinates
    pub center: Vec3,
    /// Extent of the plane (x = width, z = length)
    pub extent: Vec3,
}

/// Collision shape for a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDesc {
    /// Axis-aligned box (width = x, height = y, length = z)
    Box { width: f32, height: f32, length: f32 },
    Sphere { radius: f32 },
    /// Concave mesh built from the node's own geometry
    ConcaveMesh,
    /// Let the host pick (ground/floor collider)
    HostDefault,
}

/// Static bodies never move; dynamic bodies are integrated by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Everything the host needs to attach a rigid body to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: ShapeDesc,
    pub restitution: f32,
    pub rolling_friction: Option<f32>,
    /// Collision category bits of this body
    pub category: u32,
    /// Categories that raise contact-begin events against this body
    pub contact_test_mask: u32,
}

impl BodyDesc {
    pub fn fixed(shape: ShapeDesc, restitution: f32) -> Self {
        Self {
            kind: BodyKind::Static,
            shape,
            restitution,
            rolling_friction: None,
            category: crate::consts::DEFAULT_CATEGORY,
            contact_test_mask: 0,
        }
    }
}

/// A timed visual change applied by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    /// Tween opacity to the target value
    Opacity(f32),
    /// Set the hidden flag once the duration elapses
    Hidden,
}

/// Camera tracking and plane detection
pub trait Tracker {
    /// Current camera transform, `None` while tracking is lost
    fn current_viewer_pose(&self) -> Option<Mat4>;
    /// World transform of the first existing-plane hit under a screen point
    fn hit_test(&self, screen_point: Vec2) -> Option<Mat4>;
    fn set_plane_detection(&mut self, enabled: bool);
    fn pause(&mut self);
}

/// Host scene graph
pub trait SceneGraph {
    fn root(&self) -> NodeId;
    fn add_child(&mut self, parent: NodeId, child: NodeId);
    /// Detach a node (and its subtree) from the scene
    fn remove(&mut self, node: NodeId);
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn name(&self, node: NodeId) -> Option<&str>;
    fn has_geometry(&self, node: NodeId) -> bool;
    fn set_double_sided(&mut self, node: NodeId);
    fn set_transform(&mut self, node: NodeId, transform: Mat4);
    fn set_position(&mut self, node: NodeId, position: Vec3);
    /// Create a detached sphere node
    fn create_sphere(&mut self, radius: f32, color: [f32; 4]) -> NodeId;
    /// Create a detached, named flat quad of the given size
    fn create_plane(&mut self, name: &str, width: f32, length: f32, color: [f32; 4]) -> NodeId;
    fn resize_plane(&mut self, node: NodeId, width: f32, length: f32);
    /// Fire-and-forget; a newer transition on the same node restarts the tween
    fn schedule_transition(&mut self, node: NodeId, transition: Transition, duration: f32);

    /// Depth-first search for the first descendant with the given name
    fn find_named(&self, from: NodeId, name: &str) -> Option<NodeId> {
        for child in self.children(from) {
            if self.name(child) == Some(name) {
                return Some(child);
            }
            if let Some(found) = self.find_named(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given name
    fn find_all_named(&self, from: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = self.children(from);
        while let Some(node) = stack.pop() {
            if self.name(node) == Some(name) {
                found.push(node);
            }
            stack.extend(self.children(node));
        }
        found
    }
}

/// Host rigid-body simulation
pub trait PhysicsWorld {
    fn attach_body(&mut self, node: NodeId, body: BodyDesc);
    fn has_body(&self, node: NodeId) -> bool;
    /// Returns false if the node has no body
    fn set_restitution(&mut self, node: NodeId, restitution: f32) -> bool;
    /// Instantaneous impulse; returns false if the node has no dynamic body
    fn apply_impulse(&mut self, node: NodeId, impulse: Vec3) -> bool;
}

pub trait AssetLoader {
    /// Instantiate a named template; the returned root is not yet in the scene
    fn load_template(&mut self, name: &str) -> Option<NodeId>;
}

pub trait AudioCuePlayer {
    /// Returns false if the cue could not be loaded
    fn preload(&mut self, effect: SoundEffect) -> bool;
    fn play_cue(&mut self, node: NodeId, effect: SoundEffect, volume: f32);
}

pub trait AlertPresenter {
    fn present_alert(&mut self, title: &str, message: &str);
}

/// Everything a session needs from its host
pub trait Host:
    Tracker + SceneGraph + PhysicsWorld + AssetLoader + AudioCuePlayer + AlertPresenter
{
}

impl<T> Host for T where
    T: Tracker + SceneGraph + PhysicsWorld + AssetLoader + AudioCuePlayer + AlertPresenter
{
}
