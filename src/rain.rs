// Copyright (c) 2026 rezky_nightky

use crate::color;
use crate::config::Settings;
use crate::edges::ScreenEdges;
use crate::fps::FpsCounter;
use crate::frame::Frame;
use crate::pool::DropPool;
use crate::sampler::{Photo, PixelSampler};

pub struct Rain {
    pub settings: Settings,
    pool: DropPool,
    sampler: PixelSampler,
    edges: ScreenEdges,
    viewport: (u16, u16),
    fps: FpsCounter,
    paused: bool,
}

impl Rain {
    pub fn new(settings: Settings, viewport: (u16, u16), seed: Option<u64>) -> Self {
        let edges = ScreenEdges::new(viewport.0 as f64, viewport.1 as f64, settings.margin);
        let mut pool = DropPool::new(seed);
        pool.populate(settings.count, &settings, &edges);
        Self {
            settings,
            pool,
            sampler: PixelSampler::new(color::RAIN_DROP),
            edges,
            viewport,
            fps: FpsCounter::new(),
            paused: false,
        }
    }

    pub fn load_photo(&mut self, photo: Photo) {
        self.sampler
            .set_photo(photo, self.viewport.0, self.viewport.1, self.settings.precision);
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.edges = ScreenEdges::new(width as f64, height as f64, self.settings.margin);
        self.sampler.rebuild(width, height, self.settings.precision);
    }

    pub fn repopulate(&mut self) {
        self.pool.clear();
        self.pool
            .populate(self.settings.count, &self.settings, &self.edges);
    }

    pub fn set_count(&mut self, count: usize) {
        self.settings.count = count;
        self.pool.resize(count, &self.settings, &self.edges);
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.settings.gravity = gravity;
    }

    pub fn set_stroke_width(&mut self, width: u16) {
        self.settings.stroke_width = width;
    }

    pub fn set_precision(&mut self, precision: u32) {
        self.settings.precision = precision;
        self.sampler
            .rebuild(self.viewport.0, self.viewport.1, precision);
    }

    pub fn toggle_fps(&mut self) {
        self.settings.show_fps = !self.settings.show_fps;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    // One tick: fade, draw every drop at its pre-step position, then step
    // physics. Drawing and stepping are never interleaved per drop.
    pub fn tick(&mut self, frame: &mut Frame) {
        if self.paused {
            return;
        }

        self.fps.tick();
        frame.fade(self.settings.fade);
        self.draw_drops(frame);
        if self.settings.show_fps {
            self.draw_fps(frame);
        }
        self.pool
            .step(self.settings.gravity, &self.settings, &self.edges);
    }

    fn draw_drops(&self, frame: &mut Frame) {
        let stroke = self.settings.stroke_width.max(1);
        for d in self.pool.drops() {
            let x = d.position.x.floor();
            let y_tip = d.position.y.floor();
            if y_tip < 0.0 {
                continue;
            }
            let color = self.sampler.color_at(x, y_tip);

            let y_top = (d.position.y - d.length).floor().max(0.0) as u16;
            let y_bottom = y_tip as u16;
            for w in 0..stroke {
                let cx = x + w as f64;
                if cx >= 0.0 && cx < frame.width as f64 {
                    frame.draw_vline(cx as u16, y_top, y_bottom, color);
                }
            }
        }
    }

    fn draw_fps(&self, frame: &mut Frame) {
        let text = self.fps.frames().to_string();
        frame.draw_text(1, 0, &text, color::FPS_TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::drop::Drop;
    use crate::vec2::Vec2;

    const BG: Rgb = Rgb::new(10, 10, 10);

    fn test_settings(count: usize) -> Settings {
        Settings {
            count,
            gravity: 0.05,
            min_length: 3.0,
            max_length: 5.0,
            min_speed: 1.0,
            max_speed: 2.0,
            stroke_width: 1,
            margin: 0.0,
            precision: 1,
            fade: 0.1,
            show_fps: false,
        }
    }

    #[test]
    fn tick_draws_pre_step_position_then_steps() {
        let mut rain = Rain::new(test_settings(1), (40, 20), Some(7));
        rain.pool.drops[0] = Drop::new(Vec2::new(5.3, 10.7), Vec2::new(0.0, 1.0), 3.0);
        let mut frame = Frame::new(40, 20, BG);
        frame.clear_dirty();

        rain.tick(&mut frame);

        // Segment drawn at the floored pre-step position, fallback-tinted.
        for y in 7..=10 {
            let cell = frame.get(5, y).unwrap();
            assert_eq!(cell.ch, '█');
            assert_eq!(cell.fg, Some(color::RAIN_DROP));
        }
        assert_eq!(frame.get(5, 11).unwrap().ch, ' ');

        // Physics advanced after drawing.
        let d = &rain.pool.drops[0];
        assert!((d.velocity.y - 1.05).abs() < 1e-9);
        assert!((d.position.y - 11.75).abs() < 1e-9);
    }

    #[test]
    fn paused_tick_leaves_frame_and_pool_untouched() {
        let mut rain = Rain::new(test_settings(4), (40, 20), Some(8));
        let before: Vec<_> = rain.pool.drops().to_vec();
        let mut frame = Frame::new(40, 20, BG);
        frame.clear_dirty();

        rain.toggle_pause();
        rain.tick(&mut frame);

        assert!(!frame.is_dirty_all() && frame.dirty_indices().is_empty());
        for (b, a) in before.iter().zip(rain.pool.drops()) {
            assert_eq!(b.position, a.position);
        }

        rain.toggle_pause();
        rain.tick(&mut frame);
        assert!(!frame.dirty_indices().is_empty());
    }

    #[test]
    fn count_changes_route_through_resize() {
        let mut rain = Rain::new(test_settings(100), (40, 20), Some(9));
        rain.set_count(5);
        assert_eq!(rain.pool.len(), 5);
        rain.set_count(50);
        assert_eq!(rain.pool.len(), 50);
    }

    #[test]
    fn fps_overlay_appears_when_toggled() {
        let mut rain = Rain::new(test_settings(0), (40, 20), Some(10));
        let mut frame = Frame::new(40, 20, BG);

        rain.tick(&mut frame);
        assert_eq!(frame.get(1, 0).unwrap().ch, ' ');

        rain.toggle_fps();
        rain.tick(&mut frame);
        assert_eq!(frame.get(1, 0).unwrap().ch, '0');
        assert_eq!(frame.get(1, 0).unwrap().fg, Some(color::FPS_TEXT));
    }
}
