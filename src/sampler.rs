// Copyright (c) 2026 rezky_nightky

use std::path::Path;

use image::imageops::FilterType;
use image::RgbImage;

use crate::color::Rgb;
use crate::edges::PhotoEdges;

pub struct Photo {
    pub width: u32,
    pub height: u32,
    pixels: RgbImage,
}

impl Photo {
    pub fn load(path: &Path) -> image::ImageResult<Self> {
        let pixels = image::open(path)?.to_rgb8();
        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        })
    }

    #[cfg(test)]
    fn from_pixels(pixels: RgbImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            pixels,
        }
    }
}

// Scale the photo so it fills the viewport height, keep its aspect ratio and
// center it horizontally. Pure function of the two sizes.
pub fn compute_placement(
    image_w: f64,
    image_h: f64,
    viewport_w: f64,
    viewport_h: f64,
) -> PhotoEdges {
    let center_x = viewport_w / 2.0;
    let scale = viewport_h / image_h;
    let width = image_w * scale;
    let height = image_h * scale;
    PhotoEdges {
        top: 0.0,
        bottom: height,
        left: center_x - width / 2.0,
        right: center_x + width / 2.0,
        width,
        height,
    }
}

pub struct PixelSampler {
    fallback: Rgb,
    photo: Option<Photo>,
    placement: Option<PhotoEdges>,
    // Block grid: row-major colors sampled every `precision`-th viewport
    // cell. Lookups divide by the same stride; grid and indexing never
    // disagree on density.
    grid: Vec<Vec<Rgb>>,
    precision: u32,
}

impl PixelSampler {
    pub fn new(fallback: Rgb) -> Self {
        Self {
            fallback,
            photo: None,
            placement: None,
            grid: Vec::new(),
            precision: 1,
        }
    }

    pub fn set_photo(&mut self, photo: Photo, viewport_w: u16, viewport_h: u16, precision: u32) {
        self.photo = Some(photo);
        self.rebuild(viewport_w, viewport_h, precision);
    }

    // Rasterize: draw the scaled photo onto an offscreen canvas the size of
    // the viewport, then sample it into the block grid. Called again on
    // photo load, resize, and precision changes.
    pub fn rebuild(&mut self, viewport_w: u16, viewport_h: u16, precision: u32) {
        self.precision = precision.max(1);
        self.grid.clear();

        let Some(photo) = &self.photo else {
            self.placement = None;
            return;
        };
        if viewport_w == 0 || viewport_h == 0 {
            self.placement = None;
            return;
        }

        let placement = compute_placement(
            photo.width as f64,
            photo.height as f64,
            viewport_w as f64,
            viewport_h as f64,
        );

        let scaled_w = placement.width.round().max(1.0) as u32;
        let scaled_h = placement.height.round().max(1.0) as u32;
        let scaled = image::imageops::resize(&photo.pixels, scaled_w, scaled_h, FilterType::Triangle);

        let mut canvas = RgbImage::from_pixel(
            viewport_w as u32,
            viewport_h as u32,
            image::Rgb([0, 0, 0]),
        );
        image::imageops::replace(&mut canvas, &scaled, placement.left.floor() as i64, 0);

        let stride = self.precision as usize;
        let mut rows = Vec::with_capacity((viewport_h as usize).div_ceil(stride));
        for y in (0..viewport_h as u32).step_by(stride) {
            let mut row = Vec::with_capacity((viewport_w as usize).div_ceil(stride));
            for x in (0..viewport_w as u32).step_by(stride) {
                let p = canvas.get_pixel(x, y).0;
                row.push(Rgb::new(p[0], p[1], p[2]));
            }
            rows.push(row);
        }

        self.placement = Some(placement);
        self.grid = rows;
    }

    pub fn color_at(&self, x: f64, y: f64) -> Rgb {
        let Some(placement) = self.placement else {
            return self.fallback;
        };
        if self.grid.is_empty() || x < 0.0 || y < 0.0 || !placement.contains(x, y) {
            return self.fallback;
        }

        let gx = (x / self.precision as f64).floor() as usize;
        let gy = (y / self.precision as f64).floor() as usize;
        self.grid
            .get(gy)
            .and_then(|row| row.get(gx))
            .copied()
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: Rgb = Rgb::new(59, 59, 59);
    const RED: [u8; 3] = [200, 30, 30];

    fn red_photo(w: u32, h: u32) -> Photo {
        Photo::from_pixels(RgbImage::from_pixel(w, h, image::Rgb(RED)))
    }

    #[test]
    fn fallback_without_photo() {
        let sampler = PixelSampler::new(FALLBACK);
        assert_eq!(sampler.color_at(0.0, 0.0), FALLBACK);
        assert_eq!(sampler.color_at(400.0, 300.0), FALLBACK);
        assert_eq!(sampler.color_at(-5.0, 1e9), FALLBACK);
    }

    #[test]
    fn placement_fills_height_and_centers() {
        let p = compute_placement(400.0, 300.0, 800.0, 600.0);
        assert_eq!(p.left, 0.0);
        assert_eq!(p.right, 800.0);
        assert_eq!(p.top, 0.0);
        assert_eq!(p.bottom, 600.0);
        assert_eq!(p.width, 800.0);
        assert_eq!(p.height, 600.0);

        // Wider-than-viewport image: still centered, still full height.
        let p = compute_placement(200.0, 100.0, 640.0, 480.0);
        assert_eq!(p.left + p.right, 640.0);
        assert_eq!(p.bottom, 480.0);
        assert_eq!(p.height, 480.0);
    }

    #[test]
    fn full_precision_samples_photo_color() {
        let mut sampler = PixelSampler::new(FALLBACK);
        sampler.set_photo(red_photo(8, 8), 8, 8, 1);
        assert_eq!(sampler.color_at(0.0, 0.0), Rgb::new(200, 30, 30));
        assert_eq!(sampler.color_at(7.0, 7.0), Rgb::new(200, 30, 30));
    }

    #[test]
    fn block_precision_divides_lookups() {
        let mut sampler = PixelSampler::new(FALLBACK);
        sampler.set_photo(red_photo(8, 8), 8, 8, 2);
        // Grid is 4x4; the far corner must floor-divide inside it.
        assert_eq!(sampler.color_at(7.9, 7.9), Rgb::new(200, 30, 30));
        assert_eq!(sampler.color_at(0.0, 7.0), Rgb::new(200, 30, 30));
    }

    #[test]
    fn outside_placement_is_fallback() {
        // 1x2 photo in an 8x8 viewport: scale 4, placed at x in [2, 6).
        let mut sampler = PixelSampler::new(FALLBACK);
        sampler.set_photo(red_photo(1, 2), 8, 8, 1);
        assert_eq!(sampler.color_at(0.5, 1.0), FALLBACK);
        assert_eq!(sampler.color_at(6.5, 1.0), FALLBACK);
        assert_eq!(sampler.color_at(3.0, 1.0), Rgb::new(200, 30, 30));
        assert_eq!(sampler.color_at(3.0, 9.0), FALLBACK);
    }

    #[test]
    fn rebuild_with_zero_viewport_degrades() {
        let mut sampler = PixelSampler::new(FALLBACK);
        sampler.set_photo(red_photo(4, 4), 0, 0, 1);
        assert_eq!(sampler.color_at(0.0, 0.0), FALLBACK);
    }
}
