use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking down -z at the play plane.
///
/// It sits `distance` in front of `center` and can ease toward a target so
/// the character stays in view.
#[derive(Debug, Clone)]
pub struct SideCamera {
    pub center: Vec2,
    pub distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of the remaining gap closed per second when following.
    pub follow_rate: f32,
}

impl Default for SideCamera {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.0, 2.0),
            distance: 12.0,
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
            follow_rate: 3.0,
        }
    }
}

impl SideCamera {
    pub fn eye(&self) -> Vec3 {
        self.center.extend(self.distance)
    }

    /// Ease the camera center toward `target`.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = (self.follow_rate * dt).clamp(0.0, 1.0);
        self.center = self.center.lerp(target, t);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(3.0, 60.0);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.center.extend(0.0), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
