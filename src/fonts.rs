/*
 *  fonts.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Font discovery with a builtin bitmap fallback
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
use std::fs;
use std::path::{Path, PathBuf};

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        iso_8859_1::{FONT_6X12, FONT_7X13_BOLD, FONT_9X15_BOLD, FONT_10X20},
    },
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    text::{Baseline, renderer::TextRenderer},
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};
use rusttype::{Font, Scale, point};

use crate::draw::draw_mono_text;

/// Environment variable naming a TTF/TTC file to try before the system paths.
pub const FONT_ENV: &str = "RT82WEATHER_FONT";

/// Sans-serif bold faces, most common first.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFCompact.ttf",
];

/// The typeface used for one render, either a TrueType file or the builtin set.
pub struct FontBook {
    font: Option<Font<'static>>,
    source: Option<PathBuf>,
}

impl FontBook {
    /// Tries `$RT82WEATHER_FONT` and then [`FONT_CANDIDATES`]; never fails.
    pub fn locate() -> Self {
        let env_path = std::env::var_os(FONT_ENV).map(PathBuf::from);
        let candidates = env_path
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
        Self::from_candidates(candidates)
    }

    /// First candidate that exists and parses wins.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in candidates {
            if let Some(font) = load_font_file(&path) {
                debug!("Using font {}", path.display());
                return Self {
                    font: Some(font),
                    source: Some(path),
                };
            }
        }
        warn!("No TrueType font found, falling back to builtin bitmap font");
        Self::builtin()
    }

    pub fn builtin() -> Self {
        Self {
            font: None,
            source: None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.font.is_none()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The face at `size` points.
    pub fn face(&self, size: f32) -> Face {
        match &self.font {
            Some(font) => Face::TrueType {
                font: font.clone(),
                scale: Scale::uniform(size),
            },
            None => Face::Mono(builtin_for(size)),
        }
    }
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    if !path.exists() {
        return None;
    }
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Can't read font {}: {}", path.display(), e);
            return None;
        }
    };
    // index 0 also covers single-face .ttf files
    let font = Font::try_from_vec_and_index(data, 0);
    if font.is_none() {
        warn!("Can't parse font {}", path.display());
    }
    font
}

fn builtin_for(size: f32) -> &'static MonoFont<'static> {
    if size >= 20.0 {
        &FONT_10X20
    } else if size >= 15.0 {
        &FONT_9X15_BOLD
    } else if size >= 13.0 {
        &FONT_7X13_BOLD
    } else {
        &FONT_6X12
    }
}

/// A font at one size.
pub enum Face {
    TrueType { font: Font<'static>, scale: Scale },
    Mono(&'static MonoFont<'static>),
}

impl Face {
    /// Inked width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> i32 {
        match self {
            Face::TrueType { font, scale } => {
                let (left, right) = ink_extent(font, *scale, text);
                right - left
            }
            Face::Mono(font) => MonoTextStyle::new(*font, Rgb888::WHITE)
                .measure_string(text, Point::zero(), Baseline::Top)
                .bounding_box
                .size
                .width as i32,
        }
    }

    /// Distance from the top of the line to the baseline.
    pub fn ascent(&self) -> i32 {
        match self {
            Face::TrueType { font, scale } => font.v_metrics(*scale).ascent.round() as i32,
            Face::Mono(font) => font.baseline as i32,
        }
    }

    /// Draws `text` with its ink starting at `x` and its line top at `y`.
    pub fn draw(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>) {
        match self {
            Face::TrueType { font, scale } => {
                let (left, _) = ink_extent(font, *scale, text);
                draw_text_mut(canvas, color, x - left, y, *scale, font, text);
            }
            Face::Mono(font) => draw_mono_text(canvas, text, x, y, font, color),
        }
    }
}

/// Horizontal pixel extent `(left, right)` of the laid-out glyphs.
fn ink_extent(font: &Font<'static>, scale: Scale, text: &str) -> (i32, i32) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

    let inked = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32)>, bb| match acc {
            Some((l, r)) => Some((l.min(bb.min.x), r.max(bb.max.x))),
            None => Some((bb.min.x, bb.max.x)),
        });

    match inked {
        Some(extent) => extent,
        // whitespace only, fall back to the advance
        None => {
            let advance = glyphs
                .last()
                .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                .unwrap_or(0.0);
            (0, advance.ceil() as i32)
        }
    }
}
