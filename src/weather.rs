/*
 *  weather.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
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
use std::fmt::{self, Display};

/// Pictogram class a forecast is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconCategory {
    Sun,
    PartlyCloudy,
    Cloud,
    Rain,
    Snow,
    Thunderstorm,
    Mist,
}

impl IconCategory {
    pub const ALL: [IconCategory; 7] = [
        IconCategory::Sun,
        IconCategory::PartlyCloudy,
        IconCategory::Cloud,
        IconCategory::Rain,
        IconCategory::Snow,
        IconCategory::Thunderstorm,
        IconCategory::Mist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Sun => "sun",
            IconCategory::PartlyCloudy => "partly_cloudy",
            IconCategory::Cloud => "cloud",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
            IconCategory::Thunderstorm => "thunderstorm",
            IconCategory::Mist => "mist",
        }
    }
}

impl Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place returned by a provider search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub area: String,
    pub country: String,
}

impl Location {
    pub fn display_name(&self) -> String {
        format!("{}, {}, {}", self.name, self.area, self.country)
    }
}

/// Today's summarized forecast for one location.
///
/// `temp_min_c <= temp_max_c` is not guaranteed, providers pass through
/// whatever the upstream service reports.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherForecast {
    /// Lowercased free text, e.g. "sunny intervals".
    pub condition: String,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub icon_category: IconCategory,
    pub location_name: String,
    pub humidity: Option<f64>,
    pub wind_speed_kph: Option<f64>,
}

impl WeatherForecast {
    pub fn new(condition: &str, temp_min_c: f64, temp_max_c: f64, icon_category: IconCategory) -> Self {
        Self {
            condition: condition.to_string(),
            temp_min_c,
            temp_max_c,
            icon_category,
            location_name: String::new(),
            humidity: None,
            wind_speed_kph: None,
        }
    }

    /// One-line summary for console output, e.g. `Sunny  5°/22°C`.
    pub fn summary(&self) -> String {
        format!(
            "{}  {:.0}°/{:.0}°C",
            capitalize(&self.condition),
            self.temp_min_c,
            self.temp_max_c
        )
    }
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
