/*
 *  theme.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Console status lines in the rt82 palette
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
use std::io::{IsTerminal, stdout};

pub const SUCCESS: (u8, u8, u8) = (0x12, 0xC7, 0x8F);
pub const ERROR: (u8, u8, u8) = (0xEB, 0x42, 0x68);
pub const WARNING: (u8, u8, u8) = (0xE8, 0xFE, 0x96);
pub const INFO: (u8, u8, u8) = (0x00, 0xA4, 0xFF);
pub const PRIMARY: (u8, u8, u8) = (0x6B, 0x50, 0xFF);
pub const MUTED: (u8, u8, u8) = (0x85, 0x83, 0x92);
pub const HIGHLIGHT: (u8, u8, u8) = (0xF1, 0xEF, 0xEF);
pub const TERTIARY: (u8, u8, u8) = (0x68, 0xFF, 0xD6);

const RULE_WIDTH: usize = 48;

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && stdout().is_terminal()
}

/// Wraps `text` in a 24-bit foreground colour when writing to a terminal.
pub fn paint(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    if color_enabled() {
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn highlight(text: &str) -> String {
    paint(text, HIGHLIGHT)
}

pub fn success(message: &str) {
    println!("{} {}", paint("\u{2705}", SUCCESS), message);
}

/// Errors go to stderr so they survive output redirection.
pub fn error(message: &str) {
    eprintln!("{} {}", paint("\u{274c}", ERROR), message);
}

pub fn warning(message: &str) {
    println!("{} {}", paint("\u{26a0}\u{fe0f}", WARNING), message);
}

pub fn info(message: &str) {
    println!("{} {}", paint("\u{1f4a1}", INFO), message);
}

pub fn muted(message: &str) {
    println!("{}", paint(message, MUTED));
}

/// A `label: value` line for status listings.
pub fn field(label: &str, value: &str) {
    println!("  {}  {}", paint(&format!("{label}:"), TERTIARY), value);
}

pub fn print_header(title: &str, emoji: &str) {
    println!();
    println!("{}", paint(&rule(title, emoji), PRIMARY));
    println!();
}

pub fn print_banner() {
    let text = format!("\u{2601}\u{fe0f} {} \u{203a} Weather on your keyboard", paint("RT82 Weather", PRIMARY));
    let border = paint(&"\u{2500}".repeat(40), PRIMARY);
    println!("{border}");
    println!(" {text}");
    println!("{border}");
}

/// `── ☁️ Title ────` padded to a fixed width.
fn rule(title: &str, emoji: &str) -> String {
    let label = if emoji.is_empty() {
        title.to_string()
    } else {
        format!("{emoji} {title}")
    };
    let used = label.chars().count() + 4;
    let tail = RULE_WIDTH.saturating_sub(used).max(2);
    format!("\u{2500}\u{2500} {label} {}", "\u{2500}".repeat(tail))
}
