// Copyright (c) 2026 rezky_nightky

use crate::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Rgb>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
        }
    }
}
