// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::color::Rgb;

// How close a faded foreground must get to the background before the cell
// snaps back to blank. Bounds trail length.
const FADE_EPSILON: u8 = 4;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    bg: Rgb,
    blank: Cell,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Rgb) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(Some(bg));
        Self {
            width,
            height,
            cells: vec![blank; len],
            bg,
            blank,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            if self.cells[i] == cell {
                return;
            }
            self.cells[i] = cell;
            self.mark_dirty(i);
        }
    }

    fn mark_dirty(&mut self, i: usize) {
        if !self.dirty_all && self.dirty_map.get(i).copied() == Some(false) {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
        self.dirty_all = true;
        self.dirty.clear();
    }

    // The translucent-clear analog: every lit cell drifts toward the
    // background and blanks out once it gets close enough. Rounding can
    // stall the lerp short of the background; nudge a stalled color so the
    // trail always clears.
    pub fn fade(&mut self, t: f32) {
        fn nudge(a: u8, b: u8) -> u8 {
            match a.cmp(&b) {
                std::cmp::Ordering::Greater => a - 1,
                std::cmp::Ordering::Less => a + 1,
                std::cmp::Ordering::Equal => a,
            }
        }

        for i in 0..self.cells.len() {
            let cell = self.cells[i];
            let Some(fg) = cell.fg else {
                continue;
            };
            let mut faded = fg.towards(self.bg, t);
            if faded == fg {
                faded = Rgb::new(
                    nudge(fg.r, self.bg.r),
                    nudge(fg.g, self.bg.g),
                    nudge(fg.b, self.bg.b),
                );
            }
            let next = if faded.near(self.bg, FADE_EPSILON) {
                self.blank
            } else {
                Cell {
                    ch: cell.ch,
                    fg: Some(faded),
                    bg: cell.bg,
                }
            };
            if next != cell {
                self.cells[i] = next;
                self.mark_dirty(i);
            }
        }
    }

    pub fn draw_vline(&mut self, x: u16, y_top: u16, y_bottom: u16, color: Rgb) {
        for y in y_top..=y_bottom.min(self.height.saturating_sub(1)) {
            self.set(
                x,
                y,
                Cell {
                    ch: '█',
                    fg: Some(color),
                    bg: Some(self.bg),
                },
            );
        }
    }

    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            self.set(
                x.saturating_add(i as u16),
                y,
                Cell {
                    ch,
                    fg: Some(color),
                    bg: Some(self.bg),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(10, 10, 10);

    #[test]
    fn set_and_get_round_trip() {
        let mut f = Frame::new(4, 3, BG);
        f.clear_dirty();
        f.draw_vline(1, 0, 2, Rgb::new(200, 50, 50));
        assert_eq!(f.get(1, 1).unwrap().ch, '█');
        assert_eq!(f.get(1, 1).unwrap().fg, Some(Rgb::new(200, 50, 50)));
        assert_eq!(f.dirty_indices().len(), 3);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut f = Frame::new(4, 3, BG);
        f.set(
            4,
            0,
            Cell {
                ch: 'x',
                fg: None,
                bg: None,
            },
        );
        f.draw_vline(0, 0, 200, Rgb::new(255, 255, 255));
        assert!(f.get(4, 0).is_none());
        assert_eq!(f.get(0, 2).unwrap().ch, '█');
    }

    #[test]
    fn fade_converges_to_blank() {
        let mut f = Frame::new(2, 1, BG);
        f.draw_vline(0, 0, 0, Rgb::new(255, 255, 255));
        for _ in 0..200 {
            f.fade(0.1);
        }
        assert_eq!(f.get(0, 0).unwrap(), &Cell::blank_with_bg(Some(BG)));
        assert_eq!(f.get(1, 0).unwrap(), &Cell::blank_with_bg(Some(BG)));
    }

    #[test]
    fn fade_dims_before_it_blanks() {
        let mut f = Frame::new(1, 1, BG);
        f.draw_vline(0, 0, 0, Rgb::new(255, 255, 255));
        f.fade(0.1);
        let cell = f.get(0, 0).unwrap();
        assert_eq!(cell.ch, '█');
        let fg = cell.fg.unwrap();
        assert!(fg.r < 255 && fg.r > 10);
    }
}
