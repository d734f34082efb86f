/*
 *  condition.rs
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

use crate::weather::IconCategory;

/// Maps a free-text condition phrase to its icon category.
///
/// Exact match after trimming and lowercasing; anything unknown is a cloud.
pub fn classify(condition: &str) -> IconCategory {
    let key = condition.trim().to_lowercase();
    match key.as_str() {
        "sunny" | "clear" | "clear sky" => IconCategory::Sun,

        "sunny intervals" | "light cloud" | "partly cloudy" => IconCategory::PartlyCloudy,

        "cloudy" | "white cloud" | "grey cloud" | "thick cloud" => IconCategory::Cloud,

        "drizzle"
        | "light shower"
        | "light rain shower"
        | "light rain showers"
        | "light showers"
        | "light rain"
        | "heavy rain"
        | "heavy showers"
        | "heavy shower"
        | "heavy rain shower"
        | "heavy rain showers"
        | "sleet"
        | "sleet shower"
        | "sleet showers"
        | "cloudy with sleet"
        | "hail"
        | "hail shower"
        | "hail showers"
        | "cloudy with hail" => IconCategory::Rain,

        "thundery shower" | "thundery showers" | "thunderstorm" | "tropical storm" => {
            IconCategory::Thunderstorm
        }

        "misty" | "mist" | "fog" | "foggy" | "hazy" => IconCategory::Mist,

        "light snow"
        | "light snow shower"
        | "light snow showers"
        | "cloudy with light snow"
        | "heavy snow"
        | "heavy snow shower"
        | "heavy snow showers"
        | "cloudy with heavy snow" => IconCategory::Snow,

        _ => IconCategory::Cloud,
    }
}
