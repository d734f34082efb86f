/*
 *  lib.rs
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

//! Daily forecast rendered for the 240x136 screen of the RT82 keyboard.

pub mod cli;
pub mod condition;
pub mod config;
pub mod device;
pub mod draw;
pub mod fonts;
pub mod icons;
pub mod providers;
pub mod render;
pub mod service;
pub mod theme;
pub mod weather;

pub use condition::classify;
pub use icons::draw_icon;
pub use render::{DISPLAY_HEIGHT, DISPLAY_WIDTH, render_weather};
pub use weather::{IconCategory, Location, WeatherForecast};
