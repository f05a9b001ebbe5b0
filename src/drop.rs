// Copyright (c) 2026 rezky_nightky

use crate::vec2::Vec2;

#[derive(Clone, Copy, Debug)]
pub struct Drop {
    pub position: Vec2,
    pub velocity: Vec2,
    pub length: f64,
}

impl Drop {
    pub fn new(position: Vec2, velocity: Vec2, length: f64) -> Self {
        Self {
            position,
            velocity,
            length,
        }
    }

    pub fn apply_gravity(&mut self, gravity: f64) {
        self.velocity.add_xy(0.0, gravity);
    }

    pub fn advance(&mut self) {
        self.position.add(self.velocity);
    }

    // The segment spans position.y - length ..= position.y; the drop is gone
    // once its trailing end clears the bottom edge.
    pub fn past_bottom(&self, bottom: f64) -> bool {
        self.position.y - self.length > bottom
    }
}
