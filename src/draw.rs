/*
 *  draw.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Primitive drawing helpers shared by the icon synthesizer and the
 *	layout renderer
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
use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    text::{Baseline, Text},
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

fn paint(color: Rgb<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 255);
    paint.anti_alias = true;
    paint
}

/// Fills the ellipse inscribed in the box `(x0, y0)..(x1, y1)`.
pub fn fill_ellipse(pixmap: &mut Pixmap, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
    let Some(rect) = Rect::from_ltrb(x0, y0, x1, y1) else {
        return;
    };
    if let Some(path) = PathBuilder::from_oval(rect) {
        pixmap.fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

pub fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, r: f32, color: Rgb<u8>) {
    fill_ellipse(pixmap, cx - r, cy - r, cx + r, cy + r, color);
}

pub fn fill_rect(pixmap: &mut Pixmap, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
    if let Some(rect) = Rect::from_ltrb(x0, y0, x1, y1) {
        pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

pub fn draw_line(pixmap: &mut Pixmap, start: (f32, f32), end: (f32, f32), color: Rgb<u8>, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(start.0, start.1);
    pb.line_to(end.0, end.1);
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
}

pub fn fill_polygon(pixmap: &mut Pixmap, points: &[(f32, f32)], color: Rgb<u8>) {
    let Some((&(x, y), rest)) = points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

/// Converts tiny-skia's premultiplied pixmap into a straight-alpha RGBA image.
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Alpha-blends `overlay` onto `canvas` with its top-left corner at `(x, y)`.
pub fn composite(canvas: &mut RgbImage, overlay: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (ox, oy, src) in overlay.enumerate_pixels() {
        let (px, py) = (x + ox as i64, y + oy as i64);
        if px < 0 || py < 0 || px >= cw || py >= ch {
            continue;
        }
        let alpha = src[3] as u32;
        if alpha == 0 {
            continue;
        }
        let dst = canvas.get_pixel_mut(px as u32, py as u32);
        for i in 0..3 {
            let blended = (src[i] as u32 * alpha + dst[i] as u32 * (255 - alpha) + 127) / 255;
            dst[i] = blended as u8;
        }
    }
}

/// `embedded-graphics` draw target over an RGB canvas.
pub struct RgbCanvas<'a> {
    image: &'a mut RgbImage,
}

impl<'a> RgbCanvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self { image }
    }
}

impl OriginDimensions for RgbCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for RgbCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.image.width() as i32, self.image.height() as i32);
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            self.image.put_pixel(
                point.x as u32,
                point.y as u32,
                Rgb([color.r(), color.g(), color.b()]),
            );
        }
        Ok(())
    }
}

/// Draws `text` in a builtin monospace font with its top-left corner at `(x, y)`.
pub fn draw_mono_text(
    image: &mut RgbImage,
    text: &str,
    x: i32,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb<u8>,
) {
    let style = MonoTextStyle::new(font, Rgb888::new(color[0], color[1], color[2]));
    let mut target = RgbCanvas::new(image);
    // infallible target
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut target);
}
