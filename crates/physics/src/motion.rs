use glam::Vec2;

/// Velocity of platform `index` at time `t` seconds.
///
/// Platform 0 sways horizontally, platform 2 bobs vertically, the rest hold
/// still.
pub fn platform_velocity(index: usize, t: f64) -> Vec2 {
    match index {
        0 => Vec2::new((t * 2.0).sin() as f32, 0.0),
        2 => Vec2::new(0.0, t.cos() as f32),
        _ => Vec2::ZERO,
    }
}

/// Motor speed after checking the chassis against the turn-around bounds.
pub fn motor_speed_for(chassis_x: f32, current: f32, speed: f32, turn_x: f32) -> f32 {
    if chassis_x > turn_x {
        -speed
    } else if chassis_x < -turn_x {
        speed
    } else {
        current
    }
}

/// Spring force pulling a body at `position` toward `(0, center_y)`.
pub fn pull_force(position: Vec2, strength: f32, center_y: f32) -> Vec2 {
    Vec2::new(-position.x * strength, -(position.y - center_y) * strength)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_zero_sways() {
        let v = platform_velocity(0, std::f64::consts::FRAC_PI_4);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn platform_two_bobs() {
        let v = platform_velocity(2, 0.0);
        assert_eq!(v, Vec2::new(0.0, 1.0));
        let later = platform_velocity(2, std::f64::consts::PI);
        assert!((later.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn other_platforms_still() {
        assert_eq!(platform_velocity(1, 3.0), Vec2::ZERO);
        assert_eq!(platform_velocity(7, 3.0), Vec2::ZERO);
    }

    #[test]
    fn motor_reverses_at_bounds() {
        assert_eq!(motor_speed_for(5.1, 20.0, 20.0, 5.0), -20.0);
        assert_eq!(motor_speed_for(-5.1, -20.0, 20.0, 5.0), 20.0);
        assert_eq!(motor_speed_for(0.0, -20.0, 20.0, 5.0), -20.0);
        assert_eq!(motor_speed_for(5.0, 20.0, 20.0, 5.0), 20.0);
    }

    #[test]
    fn pull_points_at_center() {
        assert_eq!(
            pull_force(Vec2::new(2.0, 1.0), 10.0, 4.0),
            Vec2::new(-20.0, 30.0)
        );
        assert_eq!(pull_force(Vec2::new(0.0, 4.0), 10.0, 4.0), Vec2::ZERO);
    }
}
