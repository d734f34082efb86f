/*
 *  tests/render_integration.rs
 *
 *  End to end: condition text through icon and layout to a saved frame
 *
 *  rt82weather - weather on your keyboard
 *  (c) 2026 rt82weather contributors
 */

use chrono::{NaiveDate, NaiveDateTime};
use image::{Rgb, RgbImage};
use rt82weather::config::Config;
use rt82weather::device::check_frames;
use rt82weather::fonts::FontBook;
use rt82weather::render::{BG_COLOR, ICON_SIZE, render_weather_with};
use rt82weather::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, IconCategory, WeatherForecast, classify, draw_icon, render_weather,
};

fn afternoon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap().and_hms_opt(14, 30, 0).unwrap()
}

fn forecast_for(condition: &str, min: f64, max: f64) -> WeatherForecast {
    WeatherForecast {
        location_name: "London, Greater London, GB".into(),
        ..WeatherForecast::new(condition, min, max, classify(condition))
    }
}

fn count_matching(img: &RgbImage, pred: impl Fn(&Rgb<u8>) -> bool) -> usize {
    img.pixels().filter(|p| pred(p)).count()
}

#[test]
fn sunny_day_frame() {
    let fc = forecast_for("sunny", 5.0, 22.0);
    assert_eq!(fc.icon_category, IconCategory::Sun);

    let img = render_weather(&fc, Some(afternoon()));
    assert_eq!(img.dimensions(), (DISPLAY_WIDTH, DISPLAY_HEIGHT));
    assert!(check_frames(std::slice::from_ref(&img)).is_ok());

    // sun disc sits inside the icon box on the left
    let sun = count_matching(&img, |p| p.0 == [255, 210, 50]);
    assert!(sun > 100, "only {sun} sun pixels");

    // corners keep the background
    assert_eq!(*img.get_pixel(0, DISPLAY_HEIGHT - 1), BG_COLOR);
    assert_eq!(*img.get_pixel(DISPLAY_WIDTH - 1, DISPLAY_HEIGHT - 1), BG_COLOR);
}

#[test]
fn same_inputs_same_pixels() {
    let fonts = FontBook::locate();
    let fc = forecast_for("light rain showers", 7.0, 13.0);
    let a = render_weather_with(&fc, Some(afternoon()), &fonts);
    let b = render_weather_with(&fc, Some(afternoon()), &fonts);
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn every_condition_renders_with_builtin_font() {
    let fonts = FontBook::builtin();
    for condition in ["sunny", "sunny intervals", "thick cloud", "heavy rain", "sleet", "thundery showers", "fog", "hail"] {
        let img = render_weather_with(&forecast_for(condition, -12.0, 3.0), Some(afternoon()), &fonts);
        assert_eq!(img.dimensions(), (240, 136), "{condition}");
        let ink = count_matching(&img, |p| *p != BG_COLOR);
        assert!(ink > 300, "{condition} frame nearly blank");
    }
}

#[test]
fn icon_matches_category_of_condition() {
    let icon = draw_icon(classify("Light Snow"), ICON_SIZE);
    assert_eq!(icon, draw_icon(IconCategory::Snow, ICON_SIZE));
    assert_ne!(icon, draw_icon(IconCategory::Rain, ICON_SIZE));
}

#[test]
fn preview_png_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("weather_preview.png");
    let img = render_weather(&forecast_for("mist", 2.0, 9.0), Some(afternoon()));
    img.save(&out).unwrap();

    let back = image::open(&out).unwrap().to_rgb8();
    assert_eq!(back, img);
}

#[test]
fn config_marks_and_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rt82weather").join("config.json");

    let mut cfg = Config {
        location_id: "2643743".into(),
        location_name: "London, Greater London, GB".into(),
        update_hours: 2,
        ..Config::default()
    };
    cfg.mark_updated_at(afternoon());
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded.last_updated.as_deref(), Some("2026-06-15T14:30:00"));
    assert!(!loaded.needs_update_at(afternoon() + chrono::Duration::minutes(119)));
    assert!(loaded.needs_update_at(afternoon() + chrono::Duration::minutes(120)));
}
