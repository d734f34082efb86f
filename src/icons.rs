/*
 *  icons.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Procedural weather pictograms, drawn bright on a transparent canvas
 *	for the dark RT82 display
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::f32::consts::PI;

use image::{Rgb, RgbaImage};
use tiny_skia::Pixmap;

use crate::draw::{draw_line, fill_circle, fill_ellipse, fill_polygon, fill_rect, to_rgba_image};
use crate::weather::IconCategory;

const SUN_YELLOW: Rgb<u8> = Rgb([255, 210, 50]);
const CLOUD_WHITE: Rgb<u8> = Rgb([220, 220, 230]);
const CLOUD_GREY: Rgb<u8> = Rgb([160, 165, 175]);
const RAIN_BLUE: Rgb<u8> = Rgb([80, 170, 255]);
const SNOW_WHITE: Rgb<u8> = Rgb([230, 235, 255]);
const BOLT_YELLOW: Rgb<u8> = Rgb([255, 240, 80]);
const MIST_GREY: Rgb<u8> = Rgb([180, 185, 195]);

/// Drop, dot and bolt offsets are authored for an 80px icon.
const DESIGN_SIZE: f32 = 80.0;

const RAIN_DROPS: u32 = 4;
const SNOW_DOTS: u32 = 5;
const MIST_BARS: u32 = 4;

/// Draws `category` on a transparent `size` x `size` RGBA canvas.
///
/// # Panics
/// If `size` is zero.
pub fn draw_icon(category: IconCategory, size: u32) -> RgbaImage {
    assert!(size > 0, "icon size must be positive");
    let Some(mut pixmap) = Pixmap::new(size, size) else {
        return RgbaImage::new(size, size);
    };

    let s = size as f32;
    let (cx, cy) = ((size / 2) as f32, (size / 2) as f32);
    // tiny icons still get a one pixel disc
    let r = ((size / 4) as f32).max(1.0);
    let unit = s / DESIGN_SIZE;

    match category {
        IconCategory::Sun => draw_sun(&mut pixmap, cx, cy, r),
        IconCategory::PartlyCloudy => {
            let shift = (size / 8) as f32;
            draw_sun(&mut pixmap, cx - shift, cy - shift, r * 0.7);
            let shift = (size / 10) as f32;
            draw_cloud(&mut pixmap, cx + shift, cy + shift, s * 0.5, s * 0.35, CLOUD_WHITE);
        }
        IconCategory::Cloud => {
            draw_cloud(&mut pixmap, cx, cy - (size / 12) as f32, s * 0.6, s * 0.4, CLOUD_GREY);
        }
        IconCategory::Rain => {
            let shift = (size / 6) as f32;
            draw_cloud(&mut pixmap, cx, cy - shift, s * 0.55, s * 0.35, CLOUD_GREY);
            draw_rain_drops(&mut pixmap, cx, cy + shift, (s * 0.5).floor(), unit);
        }
        IconCategory::Snow => {
            let shift = (size / 6) as f32;
            draw_cloud(&mut pixmap, cx, cy - shift, s * 0.55, s * 0.35, CLOUD_WHITE);
            draw_snow_dots(&mut pixmap, cx, cy + shift, (s * 0.5).floor(), unit);
        }
        IconCategory::Thunderstorm => {
            draw_cloud(&mut pixmap, cx, cy - (size / 5) as f32, s * 0.6, s * 0.38, CLOUD_GREY);
            draw_bolt(&mut pixmap, cx, cy + (size / 8) as f32, unit);
        }
        IconCategory::Mist => draw_mist(&mut pixmap, cx, cy, s, unit),
    }

    to_rgba_image(&pixmap)
}

/// Filled disc plus eight rays at 45 degree steps.
fn draw_sun(pixmap: &mut Pixmap, cx: f32, cy: f32, r: f32) {
    fill_circle(pixmap, cx, cy, r, SUN_YELLOW);
    let ray_len = r * 0.55;
    let width = (r / 6.0).floor().max(2.0);
    for step in 0..8 {
        let a = step as f32 * PI / 4.0;
        let (sin, cos) = a.sin_cos();
        let start = (cx + cos * (r + 3.0), cy + sin * (r + 3.0));
        let end = (cx + cos * (r + 3.0 + ray_len), cy + sin * (r + 3.0 + ray_len));
        draw_line(pixmap, start, end, SUN_YELLOW, width);
    }
}

/// Three overlapping puffs on a flat base, `w` x `h` around `(cx, cy)`.
fn draw_cloud(pixmap: &mut Pixmap, cx: f32, cy: f32, w: f32, h: f32, color: Rgb<u8>) {
    let ew = w * 0.45;
    let eh = h * 0.55;

    let (x, y) = (cx - w * 0.35, cy - h * 0.15);
    fill_ellipse(pixmap, x, y, x + ew, y + eh, color);

    let (x, y) = (cx - w * 0.1, cy - h * 0.45);
    fill_ellipse(pixmap, x, y, x + ew * 1.1, y + eh * 1.1, color);

    let (x, y) = (cx + w * 0.05, cy - h * 0.2);
    fill_ellipse(pixmap, x, y, x + ew, y + eh, color);

    fill_rect(pixmap, cx - w * 0.35, cy + h * 0.05, cx + w * 0.45, cy + h * 0.25, color);
}

fn draw_rain_drops(pixmap: &mut Pixmap, cx: f32, cy: f32, w: f32, unit: f32) {
    let spacing = (w / (RAIN_DROPS + 1) as f32).floor();
    let start_x = cx - (w / 2.0).floor() + spacing;
    let width = (2.0 * unit).max(1.0);
    for i in 0..RAIN_DROPS {
        let x = start_x + i as f32 * spacing;
        draw_line(pixmap, (x, cy), (x - 3.0 * unit, cy + 10.0 * unit), RAIN_BLUE, width);
    }
}

/// Staggered two-row flake pattern.
fn draw_snow_dots(pixmap: &mut Pixmap, cx: f32, cy: f32, w: f32, unit: f32) {
    let spacing = (w / (SNOW_DOTS + 1) as f32).floor();
    let start_x = cx - (w / 2.0).floor() + spacing;
    let r = (2.0 * unit).max(1.0);
    for i in 0..SNOW_DOTS {
        let x = start_x + i as f32 * spacing;
        let y = cy + (i % 2) as f32 * 5.0 * unit;
        fill_circle(pixmap, x, y, r, SNOW_WHITE);
    }
}

fn draw_bolt(pixmap: &mut Pixmap, cx: f32, cy: f32, unit: f32) {
    let points = [(-2.0, 0.0), (-6.0, 10.0), (-1.0, 8.0), (2.0, 18.0), (4.0, 8.0), (1.0, 10.0)]
        .map(|(dx, dy): (f32, f32)| (cx + dx * unit, cy + dy * unit));
    fill_polygon(pixmap, &points, BOLT_YELLOW);
}

/// Horizontal bars, widest through the middle of the stack.
///
/// Bars are pixel-aligned and kept inside the canvas so even a 1px icon shows one.
fn draw_mist(pixmap: &mut Pixmap, cx: f32, cy: f32, s: f32, unit: f32) {
    let size = s as u32;
    let y_start = cy - (size / 6) as f32;
    let gap = (size / 8) as f32;
    let height = (3.0 * unit).max(1.0).min(s);
    let middle = (MIST_BARS - 1) as f32 / 2.0;
    for i in 0..MIST_BARS {
        let y = y_start + i as f32 * gap;
        let half_w = ((size / 3) as f32 - (i as f32 - middle).abs() * 4.0 * unit).max(1.0);
        let top = (y - height / 2.0).round().clamp(0.0, s - height);
        fill_rect(pixmap, cx - half_w, top, cx + half_w, top + height, MIST_GREY);
    }
}
