//! In-memory host
//!
//! Implements every platform trait without tracking, rendering or a physics
//! solver. It records what the session asked for (bodies, impulses, cues,
//! alerts, transitions) and resolves timed transitions on [`HeadlessHost::advance`].
//! Used by the test suite and the scripted demo binary.

use std::collections::{BTreeMap, HashMap};

use glam::{Mat4, Vec2, Vec3};

use super::{
    AlertPresenter, AssetLoader, AudioCuePlayer, BodyDesc, BodyKind, NodeId, PhysicsWorld,
    SceneGraph, Tracker, Transition,
};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Renderable content of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Authored mesh from a template
    Mesh,
    Sphere { radius: f32, color: [f32; 4] },
    Plane { width: f32, length: f32, color: [f32; 4] },
}

/// A rigid body plus every impulse applied to it
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBody {
    pub desc: BodyDesc,
    pub impulses: Vec<Vec3>,
}

#[derive(Debug, Clone)]
pub struct HeadlessNode {
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Mat4,
    pub geometry: Option<Geometry>,
    pub double_sided: bool,
    pub opacity: f32,
    pub hidden: bool,
    pub body: Option<HeadlessBody>,
}

impl HeadlessNode {
    fn new(name: Option<String>, geometry: Option<Geometry>) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            transform: Mat4::IDENTITY,
            geometry,
            double_sided: false,
            opacity: 1.0,
            hidden: false,
            body: None,
        }
    }
}

/// Authoring description of a template subtree
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub name: String,
    pub has_geometry: bool,
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn group(name: &str, children: Vec<TemplateNode>) -> Self {
        Self {
            name: name.to_string(),
            has_geometry: false,
            children,
        }
    }

    pub fn mesh(name: &str) -> Self {
        Self {
            name: name.to_string(),
            has_geometry: true,
            children: Vec::new(),
        }
    }

    /// Table with four legs, a top, `cups` cups and a floor
    pub fn beer_pong_table(cups: usize) -> Self {
        let legs = (1..=4).map(|i| TemplateNode::mesh(&format!("{LEG_NAME} {i}")));
        let table = std::iter::once(TemplateNode::mesh(TABLE_TOP_NAME)).chain(legs).collect();
        let cups = (1..=cups)
            .map(|i| {
                TemplateNode::group(
                    &format!("cup {i}"),
                    vec![TemplateNode::mesh(CUP_BOTTOM_NAME), TemplateNode::mesh(CUP_SIDE_NAME)],
                )
            })
            .collect();

        TemplateNode::group(
            "table scene",
            vec![
                TemplateNode::group(TABLE_NAME, table),
                TemplateNode::group(CUPS_NAME, cups),
                TemplateNode::mesh(FLOOR_NAME),
            ],
        )
    }

    /// Remove every descendant with the given name
    pub fn without(mut self, name: &str) -> Self {
        self.children.retain(|c| c.name != name);
        self.children = self.children.into_iter().map(|c| c.without(name)).collect();
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    node: NodeId,
    transition: Transition,
    duration: f32,
    elapsed: f32,
    start_opacity: f32,
}

impl PendingTransition {
    fn same_kind(&self, other: &Transition) -> bool {
        matches!(
            (self.transition, other),
            (Transition::Opacity(_), Transition::Opacity(_)) | (Transition::Hidden, Transition::Hidden)
        )
    }
}

/// Headless AR host
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    nodes: BTreeMap<NodeId, HeadlessNode>,
    root: NodeId,
    next_id: u32,
    /// Viewer pose returned by the tracker (None = tracking lost)
    pub viewer_pose: Option<Mat4>,
    /// Hit-test result for any screen point (None = no plane under it)
    pub hit: Option<Mat4>,
    plane_detection: bool,
    paused: bool,
    templates: HashMap<String, TemplateNode>,
    missing_sounds: Vec<SoundEffect>,
    cues: Vec<(NodeId, SoundEffect, f32)>,
    alerts: Vec<(String, String)>,
    pending: Vec<PendingTransition>,
    transition_log: Vec<(NodeId, Transition, f32)>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Empty scene with the standard six-cup table template registered
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, HeadlessNode::new(None, None));

        let mut templates = HashMap::new();
        templates.insert(TABLE_TEMPLATE.to_string(), TemplateNode::beer_pong_table(6));

        Self {
            nodes,
            root,
            next_id: 1,
            viewer_pose: Some(Mat4::IDENTITY),
            hit: None,
            plane_detection: false,
            paused: false,
            templates,
            missing_sounds: Vec::new(),
            cues: Vec::new(),
            alerts: Vec::new(),
            pending: Vec::new(),
            transition_log: Vec::new(),
        }
    }

    pub fn register_template(&mut self, name: &str, template: TemplateNode) {
        self.templates.insert(name.to_string(), template);
    }

    pub fn unregister_template(&mut self, name: &str) {
        self.templates.remove(name);
    }

    pub fn set_sound_available(&mut self, effect: SoundEffect, available: bool) {
        self.missing_sounds.retain(|e| *e != effect);
        if !available {
            self.missing_sounds.push(effect);
        }
    }

    /// Create a detached node (for host-created anchors and tests)
    pub fn spawn_node(&mut self, name: Option<&str>, has_geometry: bool) -> NodeId {
        let geometry = has_geometry.then_some(Geometry::Mesh);
        self.insert(HeadlessNode::new(name.map(str::to_string), geometry))
    }

    pub fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(&id)
    }

    pub fn body(&self, id: NodeId) -> Option<&HeadlessBody> {
        self.nodes.get(&id).and_then(|n| n.body.as_ref())
    }

    /// True if the node is attached under the scene root
    pub fn is_in_scene(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.nodes.get(&node).and_then(|n| n.parent);
        }
        false
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn plane_detection_enabled(&self) -> bool {
        self.plane_detection
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn played_cues(&self) -> &[(NodeId, SoundEffect, f32)] {
        &self.cues
    }

    pub fn alerts(&self) -> &[(String, String)] {
        &self.alerts
    }

    /// Every transition ever scheduled, in order
    pub fn transition_log(&self) -> &[(NodeId, Transition, f32)] {
        &self.transition_log
    }

    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Advance timed transitions by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut t in std::mem::take(&mut self.pending) {
            t.elapsed += dt;
            let progress = if t.duration <= 0.0 {
                1.0
            } else {
                (t.elapsed / t.duration).min(1.0)
            };
            if let Some(node) = self.nodes.get_mut(&t.node) {
                match t.transition {
                    Transition::Opacity(target) => {
                        node.opacity = t.start_opacity + (target - t.start_opacity) * progress;
                    }
                    Transition::Hidden => {
                        if progress >= 1.0 {
                            node.hidden = true;
                        }
                    }
                }
                if progress < 1.0 {
                    still_pending.push(t);
                }
            }
        }
        self.pending = still_pending;
    }

    fn insert(&mut self, node: HeadlessNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn instantiate(&mut self, template: &TemplateNode) -> NodeId {
        let geometry = template.has_geometry.then_some(Geometry::Mesh);
        let id = self.insert(HeadlessNode::new(Some(template.name.clone()), geometry));
        for child in &template.children {
            let child_id = self.instantiate(child);
            self.add_child(id, child_id);
        }
        id
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
    }
}

impl Tracker for HeadlessHost {
    fn current_viewer_pose(&self) -> Option<Mat4> {
        self.viewer_pose
    }

    fn hit_test(&self, _screen_point: Vec2) -> Option<Mat4> {
        if self.paused { None } else { self.hit }
    }

    fn set_plane_detection(&mut self, enabled: bool) {
        self.plane_detection = enabled;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

impl SceneGraph for HeadlessHost {
    fn root(&self) -> NodeId {
        self.root
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
        self.pending.retain(|t| self.nodes.contains_key(&t.node));
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.name.as_deref())
    }

    fn has_geometry(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.geometry.is_some())
    }

    fn set_double_sided(&mut self, node: NodeId) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.double_sided = true;
        }
    }

    fn set_transform(&mut self, node: NodeId, transform: Mat4) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.transform = transform;
        }
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.transform.w_axis = position.extend(1.0);
        }
    }

    fn create_sphere(&mut self, radius: f32, color: [f32; 4]) -> NodeId {
        self.insert(HeadlessNode::new(None, Some(Geometry::Sphere { radius, color })))
    }

    fn create_plane(&mut self, name: &str, width: f32, length: f32, color: [f32; 4]) -> NodeId {
        let geometry = Geometry::Plane { width, length, color };
        self.insert(HeadlessNode::new(Some(name.to_string()), Some(geometry)))
    }

    fn resize_plane(&mut self, node: NodeId, width: f32, length: f32) {
        if let Some(HeadlessNode {
            geometry: Some(Geometry::Plane { width: w, length: l, .. }),
            ..
        }) = self.nodes.get_mut(&node)
        {
            *w = width;
            *l = length;
        }
    }

    fn schedule_transition(&mut self, node: NodeId, transition: Transition, duration: f32) {
        let Some(start_opacity) = self.nodes.get(&node).map(|n| n.opacity) else {
            return;
        };
        self.pending
            .retain(|t| t.node != node || !t.same_kind(&transition));
        self.pending.push(PendingTransition {
            node,
            transition,
            duration,
            elapsed: 0.0,
            start_opacity,
        });
        self.transition_log.push((node, transition, duration));
    }
}

impl PhysicsWorld for HeadlessHost {
    fn attach_body(&mut self, node: NodeId, body: BodyDesc) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.body = Some(HeadlessBody {
                desc: body,
                impulses: Vec::new(),
            });
        }
    }

    fn has_body(&self, node: NodeId) -> bool {
        self.body(node).is_some()
    }

    fn set_restitution(&mut self, node: NodeId, restitution: f32) -> bool {
        match self.nodes.get_mut(&node).and_then(|n| n.body.as_mut()) {
            Some(body) => {
                body.desc.restitution = restitution;
                true
            }
            None => false,
        }
    }

    fn apply_impulse(&mut self, node: NodeId, impulse: Vec3) -> bool {
        match self.nodes.get_mut(&node).and_then(|n| n.body.as_mut()) {
            Some(body) if body.desc.kind == BodyKind::Dynamic => {
                body.impulses.push(impulse);
                true
            }
            _ => false,
        }
    }
}

impl AssetLoader for HeadlessHost {
    fn load_template(&mut self, name: &str) -> Option<NodeId> {
        let template = self.templates.get(name)?.clone();
        Some(self.instantiate(&template))
    }
}

impl AudioCuePlayer for HeadlessHost {
    fn preload(&mut self, effect: SoundEffect) -> bool {
        !self.missing_sounds.contains(&effect)
    }

    fn play_cue(&mut self, node: NodeId, effect: SoundEffect, volume: f32) {
        self.cues.push((node, effect, volume));
    }
}

impl AlertPresenter for HeadlessHost {
    fn present_alert(&mut self, title: &str, message: &str) {
        self.alerts.push((title.to_string(), message.to_string()));
    }
}
