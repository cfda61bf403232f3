use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Dart {
    /// Displacement per tick.
    pub velocity: Vec3,
    pub origin: Vec3,
}

impl Dart {
    #[inline]
    pub fn travelled(&self, position: Vec3) -> f32 {
        self.origin.distance(position)
    }
}
