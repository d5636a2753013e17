//! Table placement
//!
//! The table template is loaded once, positioned on the tapped plane and every
//! part gets a static body with its own material. The template must contain:
//!
//! ```text
//! <root>
//! ├── table
//! │   ├── top
//! │   └── leg* (any child whose name contains "leg")
//! ├── cups
//! │   └── <cup>
//! │       ├── bottom   (contact target for balls)
//! │       └── side
//! └── floor
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::SessionError;
use crate::consts::*;
use crate::platform::{AssetLoader, BodyDesc, NodeId, PhysicsWorld, SceneGraph, ShapeDesc};

/// Physical role of a table part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubpartKind {
    Leg,
    TableTop,
    CupBottom,
    CupSide,
    Floor,
}

impl SubpartKind {
    /// Static body for this part
    pub fn body(&self) -> BodyDesc {
        match self {
            SubpartKind::Leg => BodyDesc::fixed(
                ShapeDesc::Box {
                    width: LEG_THICKNESS,
                    height: LEG_HEIGHT,
                    length: LEG_THICKNESS,
                },
                TABLE_RESTITUTION,
            ),
            SubpartKind::TableTop => BodyDesc::fixed(
                ShapeDesc::Box {
                    width: TABLE_TOP_WIDTH,
                    height: TABLE_TOP_HEIGHT,
                    length: TABLE_TOP_LENGTH,
                },
                TABLE_RESTITUTION,
            ),
            SubpartKind::CupBottom => BodyDesc {
                contact_test_mask: BALL_CATEGORY,
                ..BodyDesc::fixed(ShapeDesc::ConcaveMesh, CUP_BOTTOM_RESTITUTION)
            },
            SubpartKind::CupSide => BodyDesc::fixed(ShapeDesc::ConcaveMesh, CUP_SIDE_RESTITUTION),
            SubpartKind::Floor => BodyDesc {
                rolling_friction: Some(FLOOR_ROLLING_FRICTION),
                ..BodyDesc::fixed(ShapeDesc::HostDefault, FLOOR_RESTITUTION)
            },
        }
    }
}

/// The placed table, cups and floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSurface {
    pub root: NodeId,
    pub position: Vec3,
    pub parts: Vec<(NodeId, SubpartKind)>,
    pub cups: Vec<NodeId>,
}

impl PlacedSurface {
    pub fn parts_of(&self, kind: SubpartKind) -> impl Iterator<Item = NodeId> + '_ {
        self.parts
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(node, _)| *node)
    }

    pub fn kind_of(&self, node: NodeId) -> Option<SubpartKind> {
        self.parts.iter().find(|(n, _)| *n == node).map(|(_, k)| *k)
    }
}

/// Loads and places the table template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSurface {
    pub template: String,
}

impl Default for PlacementSurface {
    fn default() -> Self {
        Self::new(TABLE_TEMPLATE)
    }
}

impl PlacementSurface {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Load the template, put it at `at` with physics attached, and add it to the scene
    pub fn place<H>(&self, host: &mut H, at: Vec3) -> Result<PlacedSurface, SessionError>
    where
        H: SceneGraph + PhysicsWorld + AssetLoader,
    {
        let root = host
            .load_template(&self.template)
            .ok_or_else(|| SessionError::AssetNotFound(self.template.clone()))?;
        host.set_position(root, at);

        let parts = match attach_physics(host, root) {
            Ok(parts) => parts,
            Err(e) => {
                host.remove(root);
                return Err(e);
            }
        };

        let cups = cup_nodes(&*host, root);
        let scene_root = host.root();
        host.add_child(scene_root, root);
        log::info!(
            "Table placed at ({:.2}, {:.2}, {:.2}) with {} cups",
            at.x,
            at.y,
            at.z,
            cups.len()
        );

        Ok(PlacedSurface {
            root,
            position: at,
            parts,
            cups,
        })
    }
}

fn cup_nodes(scene: &impl SceneGraph, root: NodeId) -> Vec<NodeId> {
    scene
        .find_named(root, CUPS_NAME)
        .map(|cups| scene.children(cups))
        .unwrap_or_default()
}

fn find_required(scene: &impl SceneGraph, from: NodeId, name: &str) -> Result<NodeId, SessionError> {
    scene
        .find_named(from, name)
        .ok_or_else(|| SessionError::MissingSubpart(name.to_string()))
}

/// Attach static bodies to every part of a loaded table.
///
/// The whole structure is checked before any body is attached, so a
/// malformed template is left untouched.
pub fn attach_physics<H>(host: &mut H, root: NodeId) -> Result<Vec<(NodeId, SubpartKind)>, SessionError>
where
    H: SceneGraph + PhysicsWorld,
{
    let mut parts = Vec::new();

    let table = find_required(&*host, root, TABLE_NAME)?;
    let legs: Vec<NodeId> = host
        .children(table)
        .into_iter()
        .filter(|leg| host.name(*leg).is_some_and(|name| name.contains(LEG_NAME)))
        .collect();
    if legs.is_empty() {
        return Err(SessionError::MissingSubpart(LEG_NAME.to_string()));
    }
    parts.extend(legs.into_iter().map(|leg| (leg, SubpartKind::Leg)));

    let top = find_required(&*host, root, TABLE_TOP_NAME)?;
    parts.push((top, SubpartKind::TableTop));

    let cups = find_required(&*host, root, CUPS_NAME)?;
    for cup in host.children(cups) {
        for child in host.children(cup) {
            match host.name(child) {
                Some(CUP_BOTTOM_NAME) => parts.push((child, SubpartKind::CupBottom)),
                Some(CUP_SIDE_NAME) => {
                    if !host.has_geometry(child) {
                        return Err(SessionError::MissingSubpart(format!(
                            "{CUP_SIDE_NAME} geometry"
                        )));
                    }
                    parts.push((child, SubpartKind::CupSide));
                }
                other => {
                    return Err(SessionError::UnexpectedSubpart(
                        other.unwrap_or("<unnamed>").to_string(),
                    ));
                }
            }
        }
    }

    let floor = find_required(&*host, root, FLOOR_NAME)?;
    parts.push((floor, SubpartKind::Floor));

    for (node, kind) in &parts {
        if *kind == SubpartKind::CupSide {
            host.set_double_sided(*node);
        }
        host.attach_body(*node, kind.body());
    }

    Ok(parts)
}
