// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// Palette of the sketch: near-black canvas, soft-white rain when no photo
// color is available, accent for the FPS overlay.
pub const BACKGROUND: Rgb = Rgb::new(10, 10, 10);
pub const RAIN_DROP: Rgb = Rgb::new(59, 59, 59);
pub const FPS_TEXT: Rgb = Rgb::new(237, 34, 93);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn towards(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
        }
    }

    pub fn near(self, other: Rgb, eps: u8) -> bool {
        self.r.abs_diff(other.r) <= eps
            && self.g.abs_diff(other.g) <= eps
            && self.b.abs_diff(other.b) <= eps
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let (r, g, b) = (c.r, c.g, c.b);

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (tc, (cr, cg, cb)) in TABLE {
        let d = dist2(c.r, c.g, c.b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = tc;
        }
    }
    best
}

pub fn to_terminal_color(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(rgb_to_color16(c)),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn towards_moves_every_channel() {
        let a = Rgb::new(255, 0, 100);
        let b = Rgb::new(10, 10, 10);
        let mid = a.towards(b, 0.5);
        assert!(mid.r < a.r && mid.r > b.r);
        assert!(mid.g > a.g && mid.g < b.g);
        assert!(mid.b < a.b && mid.b > b.b);
        assert_eq!(a.towards(b, 1.0), b);
        assert_eq!(a.towards(b, 0.0), a);
    }

    #[test]
    fn ansi256_hits_cube_corners() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
    }
}
