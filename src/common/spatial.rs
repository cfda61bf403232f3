//! Spatial queries over plain positions.
//!
//! Zones, pickups and enemy range checks are all ad hoc distance tests on the
//! ground plane (X/Z) or in full 3D. Nothing here touches the ECS.

use bevy::prelude::*;

/// Project a world position onto the ground plane.
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Strict 3D proximity test (`distance < radius`).
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Yaw that makes an entity at `from` face `to`, matching `atan2(dx, dz)`.
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}

/// Whether a rectangle footprint includes its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Open,
    Closed,
}

/// Ground-plane shape of a zone, centred on the zone's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    /// Strict: the rim is outside.
    Circle { radius: f32 },
    Rect { half_extents: Vec2, bounds: Bounds },
}

impl Footprint {
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let d = planar(point) - planar(center);
        match *self {
            Footprint::Circle { radius } => d.length_squared() < radius * radius,
            Footprint::Rect { half_extents, bounds: Bounds::Open } => {
                d.x.abs() < half_extents.x && d.y.abs() < half_extents.y
            }
            Footprint::Rect { half_extents, bounds: Bounds::Closed } => {
                d.x.abs() <= half_extents.x && d.y.abs() <= half_extents.y
            }
        }
    }
}
