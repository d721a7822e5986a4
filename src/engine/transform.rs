// Hierarchical transform composition.
//
// Every draw in the aquarium is described as an ordered list of
// translate / rotate / scale operations applied to a parent matrix.
// Each operation is post-multiplied (`m = m * op`), so it acts in the local
// frame set up by everything before it. Order is significant: rotating
// before translating to a joint pivot is not the same as rotating after.

use glam::{Mat4, Vec3};

/// One step in a transform chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate(Vec3),
    /// Rotation by `angle` radians about `axis`. The axis need not be unit length.
    Rotate { axis: Vec3, angle: f32 },
    Scale(Vec3),
}

impl TransformOp {
    pub fn rotate_y(angle: f32) -> Self { Self::Rotate { axis: Vec3::Y, angle } }
    pub fn rotate_z(angle: f32) -> Self { Self::Rotate { axis: Vec3::Z, angle } }

    /// Local matrix for this single operation.
    /// Returns `None` for a rotation about a zero-length axis.
    pub fn matrix(&self) -> Option<Mat4> {
        match *self {
            TransformOp::Translate(t) => Some(Mat4::from_translation(t)),
            TransformOp::Scale(s) => Some(Mat4::from_scale(s)),
            TransformOp::Rotate { axis, angle } => {
                let len = axis.length();
                if len > 0.0 {
                    Some(Mat4::from_axis_angle(axis / len, angle))
                } else {
                    None
                }
            }
        }
    }
}

/// Compose `ops` onto `base` in the given order.
///
/// Degenerate rotations (zero axis) are skipped; everything else is applied.
pub fn compose(base: Mat4, ops: &[TransformOp]) -> Mat4 {
    ops.iter()
        .filter_map(TransformOp::matrix)
        .fold(base, |m, op| m * op)
}

/// Chaining builder over a model matrix, mirroring the usual
/// `translate(m, v)` / `rotate(m, a, axis)` / `scale(m, v)` idiom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMatrix(pub Mat4);

impl Default for ModelMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ModelMatrix {
    pub fn identity() -> Self {
        Self(Mat4::IDENTITY)
    }

    pub fn apply(self, op: TransformOp) -> Self {
        match op.matrix() {
            Some(m) => Self(self.0 * m),
            None => self,
        }
    }

    pub fn translate(self, t: Vec3) -> Self {
        self.apply(TransformOp::Translate(t))
    }

    pub fn rotate(self, angle: f32, axis: Vec3) -> Self {
        self.apply(TransformOp::Rotate { axis, angle })
    }

    pub fn scale(self, s: Vec3) -> Self {
        self.apply(TransformOp::Scale(s))
    }

    pub fn matrix(self) -> Mat4 {
        self.0
    }
}

impl From<ModelMatrix> for Mat4 {
    fn from(m: ModelMatrix) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
    }

    #[test]
    fn test_empty_chain_returns_base() {
        let base = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(compose(base, &[]), base);
    }

    #[test]
    fn test_order_is_preserved() {
        // Translate then rotate: the pivot stays at the translated origin.
        let tr = compose(Mat4::IDENTITY, &[
            TransformOp::Translate(Vec3::new(2.0, 0.0, 0.0)),
            TransformOp::rotate_z(FRAC_PI_2),
        ]);
        // Rotate then translate: the translation itself is rotated.
        let rt = compose(Mat4::IDENTITY, &[
            TransformOp::rotate_z(FRAC_PI_2),
            TransformOp::Translate(Vec3::new(2.0, 0.0, 0.0)),
        ]);

        assert_vec3_near(tr.transform_point3(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        assert_vec3_near(rt.transform_point3(Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0));
        assert_vec3_near(tr.transform_point3(Vec3::X), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale_applies_in_local_frame() {
        let m = ModelMatrix::identity()
            .translate(Vec3::new(0.0, 5.0, 0.0))
            .scale(Vec3::new(2.0, 3.0, 4.0))
            .matrix();
        assert_vec3_near(m.transform_point3(Vec3::ONE), Vec3::new(2.0, 8.0, 4.0));
    }

    #[test]
    fn test_zero_axis_rotation_is_skipped() {
        let m = compose(Mat4::IDENTITY, &[
            TransformOp::Rotate { axis: Vec3::ZERO, angle: 1.0 },
            TransformOp::Translate(Vec3::X),
        ]);
        assert_eq!(m, Mat4::from_translation(Vec3::X));
    }

    #[test]
    fn test_non_unit_axis_is_normalized() {
        let a = ModelMatrix::identity().rotate(0.7, Vec3::new(1.0, 1.0, 0.0)).matrix();
        let b = Mat4::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.7);
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn test_builder_matches_compose() {
        let ops = [
            TransformOp::Translate(Vec3::new(1.0, 2.0, 3.0)),
            TransformOp::rotate_y(0.3),
            TransformOp::Scale(Vec3::splat(2.0)),
        ];
        let built = ModelMatrix::identity()
            .translate(Vec3::new(1.0, 2.0, 3.0))
            .rotate(0.3, Vec3::Y)
            .scale(Vec3::splat(2.0))
            .matrix();
        assert!(compose(Mat4::IDENTITY, &ops).abs_diff_eq(built, 1e-6));
    }
}
