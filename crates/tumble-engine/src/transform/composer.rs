use glam::{Mat4, Vec3};

/// Per-axis multipliers applied to the base rotation angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationRates {
    pub z: f32,
    pub y: f32,
    pub x: f32,
}

impl Default for RotationRates {
    fn default() -> Self {
        Self { z: 1.0, y: 0.7, x: 0.3 }
    }
}

/// Camera and object placement parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    /// Vertical field of view, in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    /// Object translation applied before any rotation.
    pub translation: Vec3,

    pub rotation_rates: RotationRates,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            translation: Vec3::new(0.0, 0.0, -5.0),
            rotation_rates: RotationRates::default(),
        }
    }
}

/// Builds the model and projection matrices.
///
/// The projection is cached and rebuilt only when the aspect ratio changes; the
/// model matrix is rebuilt on every call.
#[derive(Debug, Clone)]
pub struct TransformComposer {
    config: TransformConfig,
    cached_projection: Option<(f32, Mat4)>,
}

impl TransformComposer {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            cached_projection: None,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Right-handed perspective projection with a `[0, 1]` clip depth range.
    pub fn projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(fov_y, aspect, near, far)
    }

    /// Projection for the given surface aspect ratio (width / height).
    ///
    /// Degenerate aspects (zero-sized or minimized surface) keep the previous
    /// matrix; with nothing cached yet a square aspect is assumed.
    pub fn projection_for(&mut self, aspect: f32) -> Mat4 {
        if let Some((cached_aspect, m)) = self.cached_projection {
            if cached_aspect == aspect || !is_valid_aspect(aspect) {
                return m;
            }
        }

        let aspect = if is_valid_aspect(aspect) { aspect } else { 1.0 };
        let m = Self::projection(self.config.fov_y, aspect, self.config.near, self.config.far);
        log::debug!("projection rebuilt for aspect {aspect:.4}");

        self.cached_projection = Some((aspect, m));
        m
    }

    /// Model matrix for the base rotation `angle` (radians).
    ///
    /// `T * Rz(angle * z) * Ry(angle * y) * Rx(angle * x)`: each rotation is
    /// right-multiplied onto the already translated matrix.
    pub fn model(&self, angle: f32) -> Mat4 {
        let rates = self.config.rotation_rates;

        let mut m = Mat4::IDENTITY;
        m *= Mat4::from_translation(self.config.translation);
        m *= Mat4::from_rotation_z(angle * rates.z);
        m *= Mat4::from_rotation_y(angle * rates.y);
        m *= Mat4::from_rotation_x(angle * rates.x);
        m
    }
}

impl Default for TransformComposer {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

fn is_valid_aspect(aspect: f32) -> bool {
    aspect.is_finite() && aspect > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn model_at_zero_is_pure_translation() {
        let m = TransformComposer::default().model(0.0);
        assert_eq!(m, Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn model_is_column_major_translation() {
        let cols = TransformComposer::default().model(0.0).to_cols_array();
        assert_eq!(&cols[12..16], &[0.0, 0.0, -5.0, 1.0]);
    }

    #[test]
    fn model_composes_z_then_y_then_x() {
        let composer = TransformComposer::default();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
            * Mat4::from_rotation_z(2.0)
            * Mat4::from_rotation_y(1.4)
            * Mat4::from_rotation_x(0.6);

        assert_abs_diff_eq!(composer.model(2.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn rotation_order_is_observable() {
        let composer = TransformComposer::default();
        let angle = 1.3;
        let x_first = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
            * Mat4::from_rotation_x(angle * 0.3)
            * Mat4::from_rotation_y(angle * 0.7)
            * Mat4::from_rotation_z(angle);

        let m = composer.model(angle);
        assert!(!m.abs_diff_eq(x_first, 1e-3));
    }

    #[test]
    fn rotation_keeps_translation_column() {
        let m = TransformComposer::default().model(0.8);
        assert_abs_diff_eq!(m.w_axis, glam::Vec4::new(0.0, 0.0, -5.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn projection_is_cached_per_aspect() {
        let mut composer = TransformComposer::default();
        let a = composer.projection_for(16.0 / 9.0);
        let b = composer.projection_for(16.0 / 9.0);
        assert_eq!(a, b);

        let c = composer.projection_for(1.0);
        assert_ne!(a, c);
        assert_eq!(
            c,
            TransformComposer::projection(45.0_f32.to_radians(), 1.0, 0.1, 100.0)
        );
    }

    #[test]
    fn degenerate_aspect_keeps_previous_projection() {
        let mut composer = TransformComposer::default();
        let a = composer.projection_for(2.0);
        assert_eq!(composer.projection_for(0.0), a);
        assert_eq!(composer.projection_for(f32::NAN), a);
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let p = TransformComposer::projection(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let near = p * glam::Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = p * glam::Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }
}
