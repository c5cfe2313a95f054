use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Starting positions of every body in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub character: Vec2,
    /// Surface of the ground half-plane.
    pub ground: Vec2,
    pub platforms: Vec<Vec2>,
    pub boxes: Vec<Vec2>,
    pub star: Vec2,
    pub chassis: Vec2,
    /// Absolute start position of each wheel (back, front).
    pub wheels: Vec<Vec2>,
}

impl Default for SceneLayout {
    fn default() -> Self {
        let chassis = Vec2::new(-4.0, 2.0);
        Self {
            character: Vec2::new(0.0, 3.0),
            ground: Vec2::new(0.0, -1.0),
            platforms: vec![
                Vec2::new(2.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-2.0, 2.0),
            ],
            boxes: vec![
                Vec2::new(2.0, 1.0),
                Vec2::new(0.0, 2.0),
                Vec2::new(-2.0, 3.0),
            ],
            star: Vec2::new(4.0, 1.0),
            chassis,
            wheels: vec![
                Vec2::new(chassis.x - 0.5, 0.7),
                Vec2::new(chassis.x + 0.5, 0.7),
            ],
        }
    }
}

/// Speeds, forces and timing for the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: Vec2,
    pub timestep: f32,
    pub walk_speed: f32,
    pub jump_speed: f32,
    /// Back-wheel motor speed in rad/s; positive drives the car toward +x.
    pub motor_speed: f32,
    /// Chassis x beyond which the motor reverses.
    pub car_turn_x: f32,
    pub pull_strength: f32,
    pub pull_center_y: f32,
    pub star_respawn_width: f32,
    pub star_respawn_height: f32,
    pub seed: u64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.78),
            timestep: 1.0 / 60.0,
            walk_speed: 2.0,
            jump_speed: 6.0,
            motor_speed: 20.0,
            car_turn_x: 5.0,
            pull_strength: 10.0,
            pull_center_y: 4.0,
            star_respawn_width: 10.0,
            star_respawn_height: 6.0,
            seed: 0x5eed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_demo() {
        let l = SceneLayout::default();
        assert_eq!(l.platforms.len(), 3);
        assert_eq!(l.boxes.len(), 3);
        assert_eq!(l.wheels, vec![Vec2::new(-4.5, 0.7), Vec2::new(-3.5, 0.7)]);
    }

    #[test]
    fn partial_tuning_fills_defaults() {
        let t: PhysicsTuning = serde_json::from_str(r#"{"jump_speed": 8.0}"#).unwrap();
        assert_eq!(t.jump_speed, 8.0);
        assert_eq!(t.walk_speed, 2.0);
    }
}
