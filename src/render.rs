/*
 *  render.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Forecast to bitmap layout for the 240x136 RT82 display
 *
 *	  +--------------------------------------+
 *	  | Jun 15                          2PM  |
 *	  |  .----.                              |
 *	  | | icon |        5/22°C               |
 *	  |  '----'         Sunny                |
 *	  +--------------------------------------+
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
use chrono::{Local, NaiveDateTime};
use image::{Rgb, RgbImage};

use crate::draw::composite;
use crate::fonts::{Face, FontBook};
use crate::icons::draw_icon;
use crate::weather::{WeatherForecast, capitalize};

pub const DISPLAY_WIDTH: u32 = 240;
/// The encoder needs both dimensions divisible by 4, hence 136 and not 135.
pub const DISPLAY_HEIGHT: u32 = 136;

pub const BG_COLOR: Rgb<u8> = Rgb([10, 10, 15]);
const TEMP_MIN_COLOR: Rgb<u8> = Rgb([100, 180, 255]);
const TEMP_MAX_COLOR: Rgb<u8> = Rgb([255, 120, 80]);
const LABEL_COLOR: Rgb<u8> = Rgb([160, 160, 170]);
const HEADER_COLOR: Rgb<u8> = Rgb([110, 110, 125]);

const TEMP_FONT_SIZE: f32 = 34.0;
const LABEL_FONT_SIZE: f32 = 15.0;
const CONDITION_FONT_SIZE: f32 = 13.0;
const HEADER_FONT_SIZE: f32 = 12.0;

const HEADER_HEIGHT: i32 = 18;
const HEADER_TOP: i32 = 3;
const HEADER_MARGIN: i32 = 6;

pub const ICON_SIZE: u32 = 72;
const ICON_X: i32 = 10;
const ICON_Y: i32 = HEADER_HEIGHT + (DISPLAY_HEIGHT as i32 - HEADER_HEIGHT - ICON_SIZE as i32) / 2;

const TEXT_X: i32 = ICON_X + ICON_SIZE as i32 + 12;
const TEXT_AREA_W: i32 = DISPLAY_WIDTH as i32 - TEXT_X - 8;

const TEMP_Y: i32 = HEADER_HEIGHT + (DISPLAY_HEIGHT as i32 - HEADER_HEIGHT) / 2 - 28;
const UNIT_GAP: i32 = 4;
const UNIT_DROP: i32 = 4;
const CONDITION_OFFSET: i32 = 42;

/// Renders `forecast` onto a fresh 240x136 RGB canvas.
///
/// With `now` given the output depends only on the arguments (and the fonts
/// installed on this machine); without it the header shows the local time.
pub fn render_weather(forecast: &WeatherForecast, now: Option<NaiveDateTime>) -> RgbImage {
    render_weather_with(forecast, now, &FontBook::locate())
}

pub fn render_weather_with(
    forecast: &WeatherForecast,
    now: Option<NaiveDateTime>,
    fonts: &FontBook,
) -> RgbImage {
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let mut img = RgbImage::from_pixel(DISPLAY_WIDTH, DISPLAY_HEIGHT, BG_COLOR);

    draw_header(&mut img, now, &fonts.face(HEADER_FONT_SIZE));

    let icon = draw_icon(forecast.icon_category, ICON_SIZE);
    composite(&mut img, &icon, ICON_X as i64, ICON_Y as i64);

    let big = fonts.face(TEMP_FONT_SIZE);
    let small = fonts.face(LABEL_FONT_SIZE);
    for run in layout_temperature(forecast, &big, &small) {
        let face = if run.large { &big } else { &small };
        face.draw(&mut img, &run.text, run.x, run.y, run.color);
    }

    let condition_face = fonts.face(CONDITION_FONT_SIZE);
    let condition = capitalize(&forecast.condition);
    let cond_w = condition_face.text_width(&condition);
    let cond_x = TEXT_X + (TEXT_AREA_W - cond_w) / 2;
    condition_face.draw(&mut img, &condition, cond_x, TEMP_Y + CONDITION_OFFSET, LABEL_COLOR);

    img
}

/// Header strings: date on the left ("Jun 15"), hour on the right ("2PM").
pub fn header_text(now: NaiveDateTime) -> (String, String) {
    (now.format("%b %-d").to_string(), now.format("%-I%p").to_string())
}

fn draw_header(img: &mut RgbImage, now: NaiveDateTime, face: &Face) {
    let (date, time) = header_text(now);
    face.draw(img, &date, HEADER_MARGIN, HEADER_TOP, HEADER_COLOR);
    face.draw(img, &time, header_time_x(face, &time), HEADER_TOP, HEADER_COLOR);
}

/// Left edge of the hour so its ink ends at the right margin.
fn header_time_x(face: &Face, time: &str) -> i32 {
    DISPLAY_WIDTH as i32 - HEADER_MARGIN - face.text_width(time)
}

/// One positioned piece of the temperature line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub color: Rgb<u8>,
    /// Numerals use the large face, the slash and unit the small one.
    pub large: bool,
}

/// Lays out `min/max°C` centered in the text column beside the icon.
///
/// Every piece is measured in its own face before the whole line is centered.
pub fn layout_temperature(forecast: &WeatherForecast, big: &Face, small: &Face) -> Vec<TextRun> {
    let min_t = format!("{:.0}", forecast.temp_min_c);
    let max_t = format!("{:.0}", forecast.temp_max_c);

    let min_w = big.text_width(&min_t);
    let slash_w = small.text_width("/");
    let max_w = big.text_width(&max_t);
    let unit_w = small.text_width("°C");

    let total_w = min_w + slash_w + max_w + UNIT_GAP + unit_w;
    let start_x = TEXT_X + (TEXT_AREA_W - total_w) / 2;
    // slash sits on the numerals' baseline
    let slash_y = TEMP_Y + big.ascent() - small.ascent();

    let mut x = start_x;
    let mut runs = Vec::with_capacity(4);
    runs.push(TextRun { text: min_t, x, y: TEMP_Y, width: min_w, color: TEMP_MIN_COLOR, large: true });
    x += min_w;
    runs.push(TextRun { text: "/".into(), x, y: slash_y, width: slash_w, color: LABEL_COLOR, large: false });
    x += slash_w;
    runs.push(TextRun { text: max_t, x, y: TEMP_Y, width: max_w, color: TEMP_MAX_COLOR, large: true });
    x += max_w + UNIT_GAP;
    runs.push(TextRun {
        text: "°C".into(),
        x,
        y: TEMP_Y + UNIT_DROP,
        width: unit_w,
        color: LABEL_COLOR,
        large: false,
    });
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::IconCategory;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn sample_forecast() -> WeatherForecast {
        WeatherForecast {
            location_name: "Test City".into(),
            ..WeatherForecast::new("sunny", 5.0, 22.0, IconCategory::Sun)
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
    }

    fn distinct_non_bg_colors(img: &RgbImage) -> usize {
        img.pixels().filter(|p| **p != BG_COLOR).map(|p| p.0).collect::<HashSet<_>>().len()
    }

    #[test]
    fn dimensions_fit_the_encoder() {
        assert_eq!(DISPLAY_WIDTH, 240);
        assert_eq!(DISPLAY_HEIGHT, 136);
        assert_eq!(DISPLAY_WIDTH % 4, 0);
        assert_eq!(DISPLAY_HEIGHT % 4, 0);
    }

    #[test]
    fn icon_is_centered_below_header() {
        assert_eq!(ICON_Y, 41);
        assert_eq!(ICON_Y - HEADER_HEIGHT, DISPLAY_HEIGHT as i32 - (ICON_Y + ICON_SIZE as i32));
    }

    #[test]
    fn header_strings() {
        assert_eq!(header_text(at(2026, 6, 15, 14, 30)), ("Jun 15".into(), "2PM".into()));
        assert_eq!(header_text(at(2026, 12, 5, 8, 0)), ("Dec 5".into(), "8AM".into()));
        assert_eq!(header_text(at(2026, 1, 1, 0, 5)), ("Jan 1".into(), "12AM".into()));
    }

    #[test]
    fn temperature_line_is_centered() {
        let fonts = FontBook::builtin();
        let (big, small) = (fonts.face(TEMP_FONT_SIZE), fonts.face(LABEL_FONT_SIZE));
        let runs = layout_temperature(&sample_forecast(), &big, &small);

        let texts: Vec<_> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["5", "/", "22", "°C"]);

        let left = runs[0].x - TEXT_X;
        let last = &runs[3];
        let right = TEXT_X + TEXT_AREA_W - (last.x + last.width);
        assert!((left - right).abs() <= 1, "left {left} right {right}");
        assert_eq!(runs[1].x, runs[0].x + runs[0].width);
        assert_eq!(runs[3].x, runs[2].x + runs[2].width + UNIT_GAP);
    }

    #[test]
    fn temperatures_round_to_whole_degrees() {
        let fonts = FontBook::builtin();
        let (big, small) = (fonts.face(TEMP_FONT_SIZE), fonts.face(LABEL_FONT_SIZE));
        let fc = WeatherForecast::new("cloudy", -0.4, 21.6, IconCategory::Cloud);
        let runs = layout_temperature(&fc, &big, &small);
        assert_eq!(runs[0].text, "-0");
        assert_eq!(runs[2].text, "22");
    }

    #[test]
    fn temperatures_round_half_to_even() {
        let fonts = FontBook::builtin();
        let (big, small) = (fonts.face(TEMP_FONT_SIZE), fonts.face(LABEL_FONT_SIZE));
        let cases = [(0.5, 2.5, "0", "2"), (-2.5, 3.5, "-2", "4")];
        for (min, max, min_t, max_t) in cases {
            let fc = WeatherForecast::new("cloudy", min, max, IconCategory::Cloud);
            let runs = layout_temperature(&fc, &big, &small);
            assert_eq!(runs[0].text, min_t, "{min}");
            assert_eq!(runs[2].text, max_t, "{max}");
        }
    }

    #[test]
    fn header_time_ends_at_right_margin() {
        let fonts = FontBook::builtin();
        let face = fonts.face(HEADER_FONT_SIZE);
        let (_, time) = header_text(at(2026, 6, 15, 14, 30));
        assert_eq!(header_time_x(&face, &time) + face.text_width(&time), 234);

        let mut img = RgbImage::from_pixel(DISPLAY_WIDTH, DISPLAY_HEIGHT, BG_COLOR);
        draw_header(&mut img, at(2026, 6, 15, 14, 30), &face);
        let rightmost = img
            .enumerate_pixels()
            .filter(|(_, y, p)| (*y as i32) < HEADER_HEIGHT && **p != BG_COLOR)
            .map(|(x, _, _)| x)
            .max()
            .unwrap();
        assert!(rightmost <= DISPLAY_WIDTH - 1 - HEADER_MARGIN as u32, "ink at x={rightmost}");
        assert!(rightmost > 220, "hour not right aligned, ink ends at x={rightmost}");
    }

    #[test]
    fn header_time_ink_touches_margin_with_system_font() {
        let fonts = FontBook::locate();
        if fonts.is_builtin() {
            return;
        }
        let face = fonts.face(HEADER_FONT_SIZE);
        let mut img = RgbImage::from_pixel(DISPLAY_WIDTH, DISPLAY_HEIGHT, BG_COLOR);
        draw_header(&mut img, at(2026, 6, 15, 14, 30), &face);
        let rightmost = img
            .enumerate_pixels()
            .filter(|(_, y, p)| (*y as i32) < HEADER_HEIGHT && **p != BG_COLOR)
            .map(|(x, _, _)| x)
            .max()
            .unwrap();
        // the outermost bounding box column can carry near zero coverage
        assert!((231..=233).contains(&rightmost), "ink ends at x={rightmost}");
    }

    #[test]
    fn output_is_rgb_240_by_136() {
        let img = render_weather(&sample_forecast(), None);
        assert_eq!(img.dimensions(), (240, 136));
    }

    #[test]
    fn not_blank() {
        let img = render_weather(&sample_forecast(), Some(at(2026, 6, 15, 14, 30)));
        assert!(distinct_non_bg_colors(&img) > 10, "rendered image appears blank");
    }

    #[test]
    fn builtin_font_still_renders() {
        let img = render_weather_with(&sample_forecast(), Some(at(2026, 6, 15, 14, 30)), &FontBook::builtin());
        assert_eq!(img.dimensions(), (240, 136));
        assert!(distinct_non_bg_colors(&img) > 10);
        // min temperature numerals are drawn in the cool colour
        assert!(img.pixels().any(|p| *p == TEMP_MIN_COLOR));
        assert!(img.pixels().any(|p| *p == TEMP_MAX_COLOR));
    }

    #[test]
    fn deterministic_with_fixed_time() {
        let t = at(2026, 6, 15, 14, 30);
        let a = render_weather(&sample_forecast(), Some(t));
        let b = render_weather(&sample_forecast(), Some(t));
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn header_changes_with_time() {
        let fonts = FontBook::builtin();
        let a = render_weather_with(&sample_forecast(), Some(at(2026, 6, 15, 14, 30)), &fonts);
        let b = render_weather_with(&sample_forecast(), Some(at(2026, 12, 25, 8, 0)), &fonts);
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn every_category_and_extreme_temperatures() {
        let t = at(2026, 6, 15, 14, 30);
        for category in IconCategory::ALL {
            let fc = WeatherForecast::new("test", -10.0, 40.0, category);
            assert_eq!(render_weather(&fc, Some(t)).dimensions(), (240, 136));
        }
        let cold = WeatherForecast::new("snow", -15.0, -2.0, IconCategory::Snow);
        assert_eq!(render_weather(&cold, Some(t)).dimensions(), (240, 136));
        // min above max is passed through as-is
        let odd = WeatherForecast::new("fog", 30.0, -30.0, IconCategory::Mist);
        assert_eq!(render_weather(&odd, Some(t)).dimensions(), (240, 136));
    }

    #[test]
    fn absurd_values_do_not_panic() {
        let t = at(2026, 6, 15, 14, 30);
        let fc = WeatherForecast::new(
            "an extremely long condition description that overflows the column",
            f64::NAN,
            123456.0,
            IconCategory::Thunderstorm,
        );
        assert_eq!(render_weather(&fc, Some(t)).dimensions(), (240, 136));
    }
}
