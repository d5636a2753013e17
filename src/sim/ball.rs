//! Thrown balls
//!
//! A ball is spawned just in front of the viewer, handed to the host as a
//! dynamic body, then launched with a viewer-relative impulse.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::geometry::{impulse_vector, world_pose};
use crate::SessionError;
use crate::consts::BALL_CATEGORY;
use crate::platform::{BodyDesc, BodyKind, NodeId, PhysicsWorld, SceneGraph, ShapeDesc};
use crate::settings::Settings;

/// A ball in flight (or at rest) in the host scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub node: NodeId,
    /// World transform at spawn time
    pub spawn_pose: Mat4,
    /// Impulse applied at launch (zero until launched)
    pub impulse: Vec3,
    /// Seconds since spawn
    pub age: f32,
}

/// Physical description of every ball thrown this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowableBody {
    pub radius: f32,
    pub color: [f32; 4],
    pub restitution: f32,
    pub rolling_friction: f32,
    pub spawn_offset: Vec3,
    pub local_impulse: Vec4,
}

impl Default for ThrowableBody {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ThrowableBody {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            radius: settings.ball_radius,
            color: settings.ball_color,
            restitution: settings.ball_restitution,
            rolling_friction: settings.ball_rolling_friction,
            spawn_offset: settings.spawn_offset,
            local_impulse: settings.launch_impulse,
        }
    }

    fn body(&self) -> BodyDesc {
        BodyDesc {
            kind: BodyKind::Dynamic,
            shape: ShapeDesc::Sphere { radius: self.radius },
            restitution: self.restitution,
            rolling_friction: Some(self.rolling_friction),
            category: BALL_CATEGORY,
            contact_test_mask: 0,
        }
    }

    /// Create a ball in front of the viewer and add it to the scene.
    ///
    /// The ball carries its dynamic body on return, so it is ready for [`Self::launch`].
    pub fn spawn<H>(&self, host: &mut H, viewer_pose: Option<Mat4>) -> Result<Projectile, SessionError>
    where
        H: SceneGraph + PhysicsWorld,
    {
        let viewer_pose = viewer_pose.ok_or(SessionError::NoViewerPose)?;
        let spawn_pose = world_pose(self.spawn_offset, viewer_pose);

        let node = host.create_sphere(self.radius, self.color);
        host.set_transform(node, spawn_pose);
        host.attach_body(node, self.body());
        let root = host.root();
        host.add_child(root, node);

        Ok(Projectile {
            node,
            spawn_pose,
            impulse: Vec3::ZERO,
            age: 0.0,
        })
    }

    /// World impulse for a throw from the given viewer orientation
    pub fn impulse(&self, viewer_orientation: Mat4) -> Vec3 {
        impulse_vector(self.local_impulse, viewer_orientation)
    }

    /// Apply the throw impulse to a spawned ball
    pub fn launch(
        &self,
        physics: &mut impl PhysicsWorld,
        projectile: &mut Projectile,
        viewer_orientation: Mat4,
    ) -> Result<Vec3, SessionError> {
        if !physics.has_body(projectile.node) {
            return Err(SessionError::NoPhysicsBody(projectile.node));
        }
        let impulse = self.impulse(viewer_orientation);
        if !physics.apply_impulse(projectile.node, impulse) {
            return Err(SessionError::NoPhysicsBody(projectile.node));
        }
        projectile.impulse = impulse;
        Ok(impulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessHost;
    use crate::platform::headless::Geometry;

    #[test]
    fn test_spawn_without_pose_fails() {
        let mut host = HeadlessHost::new();
        let before = host.node_count();
        let result = ThrowableBody::default().spawn(&mut host, None);
        assert_eq!(result, Err(SessionError::NoViewerPose));
        assert_eq!(host.node_count(), before);
    }

    #[test]
    fn test_spawn_places_ball_in_front_of_viewer() {
        let mut host = HeadlessHost::new();
        let viewer = Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0));
        let ball = ThrowableBody::default();
        let projectile = ball.spawn(&mut host, Some(viewer)).expect("spawned");

        assert!(host.is_in_scene(projectile.node));
        let node = host.node(projectile.node).expect("node");
        let position = node.transform.w_axis.truncate();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 1.45, -0.2), 1e-6));
        assert!(matches!(node.geometry, Some(Geometry::Sphere { .. })));

        let body = host.body(projectile.node).expect("dynamic body");
        assert_eq!(body.desc.kind, BodyKind::Dynamic);
        assert_eq!(body.desc.category, BALL_CATEGORY);
        assert_eq!(body.desc.rolling_friction, Some(ball.rolling_friction));
    }

    #[test]
    fn test_launch_rotates_impulse_by_viewer() {
        let mut host = HeadlessHost::new();
        let viewer = Mat4::from_rotation_y(std::f32::consts::PI);
        let ball = ThrowableBody::default();
        let mut projectile = ball.spawn(&mut host, Some(viewer)).expect("spawned");

        let impulse = ball.launch(&mut host, &mut projectile, viewer).expect("launched");
        // Half turn flips both horizontal axes
        assert!(impulse.abs_diff_eq(Vec3::new(2.2, 0.0, 1.0), 1e-5));
        assert_eq!(projectile.impulse, impulse);
        assert_eq!(host.body(projectile.node).map(|b| b.impulses.clone()), Some(vec![impulse]));
    }

    #[test]
    fn test_launch_without_body_fails() {
        let mut host = HeadlessHost::new();
        let node = host.create_sphere(0.02, [1.0; 4]);
        let mut projectile = Projectile {
            node,
            spawn_pose: Mat4::IDENTITY,
            impulse: Vec3::ZERO,
            age: 0.0,
        };
        assert!(!host.has_body(node));
        let result = ThrowableBody::default().launch(&mut host, &mut projectile, Mat4::IDENTITY);
        assert_eq!(result, Err(SessionError::NoPhysicsBody(node)));
        assert_eq!(projectile.impulse, Vec3::ZERO);
    }
}
