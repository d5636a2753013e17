//! Camera-relative placement math
//!
//! Transforms are column-major `Mat4`s as reported by the tracker: the rotation
//! block is the viewer orientation and the last column its position.

use glam::{Mat4, Vec3, Vec4};

/// World transform for a point `offset` expressed in the reference frame.
///
/// Keeps the reference orientation and translates along its local axes.
/// The reference must be a rigid transform (orthonormal rotation block).
#[inline]
pub fn world_pose(offset: Vec3, reference: Mat4) -> Mat4 {
    reference * Mat4::from_translation(offset)
}

/// Rotate a viewer-space force into world space.
///
/// `local_force.w` should be 0 so the viewer translation is ignored.
#[inline]
pub fn impulse_vector(local_force: Vec4, viewer: Mat4) -> Vec3 {
    (viewer * local_force).truncate()
}

/// Translation column of a world transform (hit-test results, anchors)
#[inline]
pub fn position_from_transform(transform: Mat4) -> Vec3 {
    transform.w_axis.truncate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn viewer(yaw: f32, pitch: f32, position: Vec3) -> Mat4 {
        Mat4::from_translation(position) * Mat4::from_rotation_y(yaw) * Mat4::from_rotation_x(pitch)
    }

    #[test]
    fn test_world_pose_identity_reference() {
        let pose = world_pose(Vec3::new(0.0, -0.05, -0.2), Mat4::IDENTITY);
        assert!(pose.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, -0.05, -0.2)), 1e-6));
    }

    #[test]
    fn test_world_pose_follows_viewer_yaw() {
        // Viewer turned 90° left: its forward (-Z) now points along world -X
        let reference = viewer(FRAC_PI_2, 0.0, Vec3::new(1.0, 1.5, 0.0));
        let pose = world_pose(Vec3::new(0.0, 0.0, -1.0), reference);
        let position = position_from_transform(pose);
        assert!(position.abs_diff_eq(Vec3::new(0.0, 1.5, 0.0), 1e-5));
    }

    #[test]
    fn test_impulse_ignores_viewer_translation() {
        let local = Vec4::new(-2.2, 0.0, -1.0, 0.0);
        let at_origin = impulse_vector(local, Mat4::IDENTITY);
        let moved = impulse_vector(local, Mat4::from_translation(Vec3::new(5.0, 2.0, -3.0)));
        assert!(at_origin.abs_diff_eq(moved, 1e-6));
        assert!(at_origin.abs_diff_eq(Vec3::new(-2.2, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn test_position_from_transform() {
        let t = Mat4::from_rotation_y(0.3) * Mat4::from_translation(Vec3::new(0.2, -1.0, 0.4));
        let expected = t.transform_point3(Vec3::ZERO);
        assert!(position_from_transform(t).abs_diff_eq(expected, 1e-6));
    }

    proptest! {
        #[test]
        fn prop_world_pose_keeps_rotation_and_offsets_locally(
            yaw in -3.1f32..3.1,
            pitch in -1.5f32..1.5,
            px in -5.0f32..5.0, py in -5.0f32..5.0, pz in -5.0f32..5.0,
            ox in -2.0f32..2.0, oy in -2.0f32..2.0, oz in -2.0f32..2.0,
        ) {
            let reference = viewer(yaw, pitch, Vec3::new(px, py, pz));
            let offset = Vec3::new(ox, oy, oz);
            let pose = world_pose(offset, reference);

            prop_assert!(pose.x_axis.abs_diff_eq(reference.x_axis, 1e-5));
            prop_assert!(pose.y_axis.abs_diff_eq(reference.y_axis, 1e-5));
            prop_assert!(pose.z_axis.abs_diff_eq(reference.z_axis, 1e-5));
            let expected = reference.transform_point3(offset);
            prop_assert!(position_from_transform(pose).abs_diff_eq(expected, 1e-4));
        }

        #[test]
        fn prop_impulse_is_linear_in_force(
            yaw in -3.1f32..3.1,
            pitch in -1.5f32..1.5,
            k in -4.0f32..4.0,
        ) {
            let viewer = viewer(yaw, pitch, Vec3::new(0.3, 1.2, -0.7));
            let local = Vec4::new(-2.2, 0.0, -1.0, 0.0);
            let base = impulse_vector(local, viewer);
            let scaled = impulse_vector(local * k, viewer);
            prop_assert!(scaled.abs_diff_eq(base * k, 1e-4));
        }
    }
}
