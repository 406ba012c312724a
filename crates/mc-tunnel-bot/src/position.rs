//! The tunnel's belief about where its player is.

use mc_tunnel_proto::packets::{PlayerPosition, PlayerPositionLook};
use mc_tunnel_proto::types::Dimension;

/// Lowest stance offset above y that is kept (exclusive).
const MIN_STANCE_OFFSET: f64 = 0.15;
/// Highest stance offset above y that is kept (inclusive).
const MAX_STANCE_OFFSET: f64 = 1.6;
/// Offset the stance is reset to when it leaves the allowed range.
const DEFAULT_STANCE_OFFSET: f64 = 0.5;

/// Player position, look, ground flag, dimension and health.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Eye height, absolute (not an offset).
    pub stance: f64,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub on_ground: bool,
    pub dimension: Dimension,
    pub health: f32,
}

impl Position {
    /// Move `distance` along the current heading.
    ///
    /// Yaw 0 faces +z, yaw 90 faces -x.
    pub fn walk(&mut self, distance: f64) {
        let heading = self.yaw as f64 * std::f64::consts::PI / 180.0;
        self.x -= heading.sin() * distance;
        self.z += heading.cos() * distance;
    }

    /// Move up (or down, for negative `distance`), keeping the stance
    /// offset within (0.15, 1.6].
    pub fn ascend(&mut self, distance: f64) {
        self.y += distance;
        self.stance += distance;

        let offset = self.stance - self.y;
        if offset <= MIN_STANCE_OFFSET || offset > MAX_STANCE_OFFSET {
            self.stance = self.y + DEFAULT_STANCE_OFFSET;
        }
    }

    pub(crate) fn apply_position(&mut self, p: &PlayerPosition) {
        self.x = p.x;
        self.y = p.y;
        self.z = p.z;
        self.stance = p.stance;
        self.on_ground = p.on_ground;
    }

    pub(crate) fn apply_position_look(&mut self, p: &PlayerPositionLook) {
        self.x = p.x;
        self.y = p.y;
        self.z = p.z;
        self.stance = p.stance;
        self.yaw = p.yaw;
        self.pitch = p.pitch;
        self.on_ground = p.on_ground;
    }

    /// The packet that reports this position to the server.
    pub fn to_packet(&self) -> PlayerPositionLook {
        PlayerPositionLook {
            x: self.x,
            y: self.y,
            stance: self.stance,
            z: self.z,
            yaw: self.yaw,
            pitch: self.pitch,
            on_ground: self.on_ground,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn ascend_from_zero_resets_stance() {
        let mut pos = Position::default();
        pos.ascend(2.0);
        assert_eq!(pos.y, 2.0);
        assert!((pos.stance - 2.5).abs() < EPS);
    }

    #[test]
    fn ascend_keeps_valid_stance() {
        let mut pos = Position {
            y: 64.0,
            stance: 65.5,
            ..Default::default()
        };
        pos.ascend(1.0);
        assert_eq!(pos.y, 65.0);
        assert!((pos.stance - 66.5).abs() < EPS);
    }

    #[test]
    fn ascend_resets_server_eye_height() {
        // 1.62 is the server's eye height, just above the accepted range.
        let mut pos = Position {
            y: 64.0,
            stance: 65.62,
            ..Default::default()
        };
        pos.ascend(1.0);
        assert_eq!(pos.y, 65.0);
        assert!((pos.stance - 65.5).abs() < EPS);
    }

    #[test]
    fn stance_offset_always_in_range() {
        let mut pos = Position {
            y: 10.0,
            stance: 30.0,
            ..Default::default()
        };
        for d in [0.0, 1.5, -3.25, 100.0, -0.1, 0.0] {
            pos.ascend(d);
            let offset = pos.stance - pos.y;
            assert!(offset > MIN_STANCE_OFFSET && offset <= MAX_STANCE_OFFSET);
        }
    }

    #[test]
    fn stance_boundaries() {
        let mut at_max = Position {
            stance: 1.6,
            ..Default::default()
        };
        at_max.ascend(0.0);
        assert_eq!(at_max.stance, 1.6);

        let mut at_min = Position {
            stance: 0.15,
            ..Default::default()
        };
        at_min.ascend(0.0);
        assert_eq!(at_min.stance, 0.5);
    }

    #[test]
    fn walk_yaw_zero_moves_along_z() {
        let mut pos = Position::default();
        pos.walk(3.0);
        assert!(pos.x.abs() < EPS);
        assert!((pos.z - 3.0).abs() < EPS);
    }

    #[test]
    fn walk_yaw_ninety_moves_along_negative_x() {
        let mut pos = Position {
            yaw: 90.0,
            ..Default::default()
        };
        pos.walk(2.0);
        assert!((pos.x + 2.0).abs() < 1e-6);
        assert!(pos.z.abs() < 1e-6);
    }

    #[test]
    fn packet_updates() {
        let mut pos = Position {
            yaw: 45.0,
            health: 20.0,
            ..Default::default()
        };
        pos.apply_position(&PlayerPosition {
            x: 1.0,
            stance: 65.62,
            y: 64.0,
            z: 2.0,
            on_ground: true,
        });
        assert_eq!(pos.yaw, 45.0);
        assert_eq!(pos.stance, 65.62);
        assert!(pos.on_ground);

        let look = PlayerPositionLook {
            x: -1.0,
            y: 70.0,
            stance: 71.62,
            z: 0.5,
            yaw: 180.0,
            pitch: 10.0,
            on_ground: false,
        };
        pos.apply_position_look(&look);
        assert_eq!(pos.to_packet(), look);
        assert_eq!(pos.health, 20.0);
    }
}
