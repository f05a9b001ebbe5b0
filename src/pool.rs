// Copyright (c) 2026 rezky_nightky

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::drop::Drop;
use crate::edges::ScreenEdges;
use crate::vec2::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPolicy {
    UniformRandom,
    TopEdge,
}

pub struct DropPool {
    pub(crate) drops: Vec<Drop>,
    rng: StdRng,
}

impl DropPool {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            drops: Vec::new(),
            rng,
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    fn random_range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            lo
        }
    }

    pub fn spawn(&mut self, policy: SpawnPolicy, settings: &Settings, edges: &ScreenEdges) -> Drop {
        let (x, y) = match policy {
            SpawnPolicy::UniformRandom => (
                self.random_range(edges.left, edges.right),
                self.random_range(edges.top, edges.bottom),
            ),
            SpawnPolicy::TopEdge => (self.random_range(edges.left, edges.right), 0.0),
        };
        let speed_y = self.random_range(settings.min_speed, settings.max_speed);
        let length = self.random_range(settings.min_length, settings.max_length);
        Drop::new(Vec2::new(x, y), Vec2::new(0.0, speed_y), length)
    }

    pub fn populate(&mut self, count: usize, settings: &Settings, edges: &ScreenEdges) {
        for _ in 0..count {
            let d = self.spawn(SpawnPolicy::UniformRandom, settings, edges);
            self.drops.push(d);
        }
    }

    pub fn clear(&mut self) {
        self.drops.clear();
    }

    // The only population-size adjustment path: truncation keeps the
    // earliest-created drops in order, growth appends uniform-random ones.
    pub fn resize(&mut self, target: usize, settings: &Settings, edges: &ScreenEdges) {
        if self.drops.len() >= target {
            self.drops.truncate(target);
        } else {
            let shortfall = target - self.drops.len();
            self.populate(shortfall, settings, edges);
        }
    }

    pub fn step(&mut self, gravity: f64, settings: &Settings, edges: &ScreenEdges) {
        for i in 0..self.drops.len() {
            self.drops[i].apply_gravity(gravity);
            self.drops[i].advance();
            if self.drops[i].past_bottom(edges.bottom) {
                // In-place replacement: the fresh drop keeps the slot and is
                // skipped until the next step.
                let fresh = self.spawn(SpawnPolicy::TopEdge, settings, edges);
                self.drops[i] = fresh;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings {
            count: 1200,
            gravity: 0.05,
            min_length: 7.0,
            max_length: 12.0,
            min_speed: 1.0,
            max_speed: 4.0,
            stroke_width: 1,
            margin: 0.0,
            precision: 1,
            fade: 0.1,
            show_fps: false,
        }
    }

    fn test_edges() -> ScreenEdges {
        ScreenEdges::new(800.0, 600.0, 0.0)
    }

    #[test]
    fn resize_truncates_keeping_first_in_order() {
        let settings = test_settings();
        let edges = test_edges();
        let mut pool = DropPool::new(Some(0x1234567));
        pool.populate(1200, &settings, &edges);
        assert_eq!(pool.len(), 1200);

        let kept: Vec<_> = pool.drops()[..500]
            .iter()
            .map(|d| (d.position, d.length))
            .collect();
        pool.resize(500, &settings, &edges);
        assert_eq!(pool.len(), 500);
        for (d, (pos, len)) in pool.drops().iter().zip(kept) {
            assert_eq!(d.position, pos);
            assert_eq!(d.length, len);
        }
    }

    #[test]
    fn resize_grows_to_target() {
        let settings = test_settings();
        let edges = test_edges();
        let mut pool = DropPool::new(Some(1));
        pool.populate(10, &settings, &edges);
        pool.resize(25, &settings, &edges);
        assert_eq!(pool.len(), 25);
        pool.resize(0, &settings, &edges);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn spawn_respects_policy_and_ranges() {
        let settings = test_settings();
        let edges = test_edges();
        let mut pool = DropPool::new(Some(2));

        for _ in 0..100 {
            let d = pool.spawn(SpawnPolicy::UniformRandom, &settings, &edges);
            assert!(d.position.x >= edges.left && d.position.x < edges.right);
            assert!(d.position.y >= edges.top && d.position.y < edges.bottom);
            assert_eq!(d.velocity.x, 0.0);
            assert!(d.velocity.y >= 1.0 && d.velocity.y < 4.0);
            assert!(d.length >= 7.0 && d.length < 12.0);
        }

        for _ in 0..100 {
            let d = pool.spawn(SpawnPolicy::TopEdge, &settings, &edges);
            assert_eq!(d.position.y, 0.0);
            assert!(d.position.x >= edges.left && d.position.x < edges.right);
        }
    }

    #[test]
    fn step_accelerates_and_descends() {
        let settings = test_settings();
        let edges = test_edges();
        let mut pool = DropPool::new(Some(3));
        pool.populate(50, &settings, &edges);

        let before: Vec<_> = pool.drops().to_vec();
        pool.step(settings.gravity, &settings, &edges);

        for (b, a) in before.iter().zip(pool.drops()) {
            if a.position.y == 0.0 {
                continue; // respawned this step
            }
            assert!(a.velocity.y > b.velocity.y);
            assert!(a.position.y > b.position.y);
        }
    }

    #[test]
    fn respawn_triggers_only_past_bottom() {
        let settings = test_settings();
        let edges = ScreenEdges::new(800.0, 600.0, 0.0);
        let mut pool = DropPool::new(Some(4));
        pool.populate(2, &settings, &edges);

        // 605 - 10 = 595 <= 600: stays. 615 - 10 = 605 > 600: respawns.
        pool.drops[0] = Drop::new(Vec2::new(10.0, 605.0), Vec2::new(0.0, 0.0), 10.0);
        pool.drops[1] = Drop::new(Vec2::new(10.0, 615.0), Vec2::new(0.0, 0.0), 10.0);

        pool.step(0.0, &settings, &edges);

        assert!(pool.drops[0].position.y > 600.0);
        assert_eq!(pool.drops[1].position.y, 0.0);
        // Fresh drop is not instantly off-screen again.
        assert!(pool.drops[1].position.y - pool.drops[1].length <= edges.bottom);
        assert!(pool.drops[1].velocity.y >= settings.min_speed);
    }
}
