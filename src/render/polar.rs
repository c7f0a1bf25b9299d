use std::f64::consts::PI;
use std::path::Path;

use chrono::FixedOffset;
use image::{Rgb, RgbImage};

use super::error::RenderError;
use super::font::{glyph, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::Renderer;
use crate::track::{TrackSample, Waypoint};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([176, 176, 176]);
const TEXT: Rgb<u8> = Rgb([32, 32, 32]);
const TRACK: Rgb<u8> = Rgb([31, 119, 180]);
const MARKER: Rgb<u8> = Rgb([255, 127, 14]);

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Sky plot with north up and azimuth increasing clockwise; the rim is the
/// horizon and the centre is the zenith.
pub struct PolarPlotRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PolarPlotRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl PolarPlotRenderer {
    fn plot_radius(&self) -> f64 {
        (self.width.min(self.height) as f64 / 2.0 - 40.0).max(10.0)
    }

    fn centre(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Pixel position of azimuth `theta` (radians) at zenith distance `r` (degrees).
    fn project(&self, theta: f64, r: f64) -> (f64, f64) {
        let (cx, cy) = self.centre();
        let rho = r.clamp(0.0, 90.0) / 90.0 * self.plot_radius();
        (cx + rho * theta.sin(), cy - rho * theta.cos())
    }

    fn draw_axes(&self, img: &mut RgbImage) {
        let (cx, cy) = self.centre();
        let radius = self.plot_radius();

        for r in [30.0, 60.0, 90.0] {
            draw_circle(img, cx, cy, radius * r / 90.0, GRID);
        }

        for (i, label) in COMPASS.iter().enumerate() {
            let theta = i as f64 * PI / 4.0;
            let (x, y) = self.project(theta, 90.0);
            draw_line(img, (cx, cy), (x, y), GRID);

            let lx = cx + (radius + 18.0) * theta.sin();
            let ly = cy - (radius + 18.0) * theta.cos();
            draw_text_centred(img, lx, ly, label, 2, TEXT);
        }

        // Ring labels show elevation, not zenith distance.
        let label_theta = PI / 8.0;
        for (r, label) in [(30.0, "60°"), (60.0, "30°")] {
            let (x, y) = self.project(label_theta, r);
            draw_text_centred(img, x, y, label, 1, TEXT);
        }
    }
}

impl Renderer for PolarPlotRenderer {
    fn render_polar_track(
        &self,
        track: &[TrackSample],
        waypoints: &[Waypoint],
        tz: &FixedOffset,
        path: &Path,
    ) -> Result<(), RenderError> {
        if track.is_empty() {
            return Err(RenderError::EmptyTrack(path.display().to_string()));
        }

        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        self.draw_axes(&mut img);

        let points: Vec<_> = track.iter().map(|s| self.project(s.theta, s.r)).collect();
        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], TRACK);
        }

        for waypoint in waypoints {
            let sample = &waypoint.sample;
            let (x, y) = self.project(sample.theta, sample.r);
            fill_disc(&mut img, x, y, 4.0, MARKER);

            let label = sample.at.with_timezone(tz).format("%M:%S").to_string();
            let (lx, ly) = self.project(sample.theta, sample.r - 10.0);
            draw_text_centred(&mut img, lx, ly, &label, 1, TEXT);
        }

        img.save(path)?;
        Ok(())
    }
}

fn plot(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    let (width, height) = img.dimensions();
    if x >= 0 && y >= 0 && x < width as i64 && y < height as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_circle(img: &mut RgbImage, cx: f64, cy: f64, radius: f64, color: Rgb<u8>) {
    let steps = (radius * 2.0 * PI).ceil().max(8.0) as usize;
    for step in 0..steps {
        let angle = step as f64 / steps as f64 * 2.0 * PI;
        let x = cx + radius * angle.cos();
        let y = cy + radius * angle.sin();
        plot(img, x.round() as i64, y.round() as i64, color);
    }
}

fn fill_disc(img: &mut RgbImage, cx: f64, cy: f64, radius: f64, color: Rgb<u8>) {
    let r = radius.ceil() as i64;
    let (x0, y0) = (cx.round() as i64, cy.round() as i64);
    for dy in -r..=r {
        for dx in -r..=r {
            if ((dx * dx + dy * dy) as f64) <= radius * radius {
                plot(img, x0 + dx, y0 + dy, color);
            }
        }
    }
}

fn draw_text_centred(img: &mut RgbImage, x: f64, y: f64, text: &str, scale: u32, color: Rgb<u8>) {
    let left = x - text_width(text, scale) as f64 / 2.0;
    let top = y - (GLYPH_HEIGHT * scale) as f64 / 2.0;
    draw_text(img, left.round() as i64, top.round() as i64, text, scale, color);
}

fn draw_text(img: &mut RgbImage, left: i64, top: i64, text: &str, scale: u32, color: Rgb<u8>) {
    let scale = scale as i64;
    let advance = (GLYPH_WIDTH as i64 + 1) * scale;

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let gx = left + i as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH as i64 {
                if bits & (1 << (GLYPH_WIDTH as i64 - 1 - col)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        plot(img, gx + col * scale + sx, top + row as i64 * scale + sy, color);
                    }
                }
            }
        }
    }
}
