/*
 *  device.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Hands finished frames to the keyboard's screen uploader
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
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbImage;
use log::{debug, info};
use thiserror::Error;

use crate::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Overrides the uploader program name or path.
pub const DISPLAY_CMD_ENV: &str = "RT82WEATHER_DISPLAY_CMD";
pub const DEFAULT_DISPLAY_CMD: &str = "rt82display";

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Display uploader {0:?} not found; install rt82display or set RT82WEATHER_DISPLAY_CMD")]
    EncoderMissing(PathBuf),
    #[error("Bad frames: {0}")]
    FrameGeometry(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Something that can show frames on the keyboard.
pub trait DisplaySink {
    fn push(&self, frames: &[RgbImage], fps: u32) -> Result<(), DeviceError>;
}

/// Rejects empty or wrongly sized frame lists.
pub fn check_frames(frames: &[RgbImage]) -> Result<(), DeviceError> {
    if frames.is_empty() {
        return Err(DeviceError::FrameGeometry("no frames to upload".into()));
    }
    for (index, frame) in frames.iter().enumerate() {
        let (width, height) = frame.dimensions();
        if (width, height) != (DISPLAY_WIDTH, DISPLAY_HEIGHT) {
            return Err(DeviceError::FrameGeometry(format!(
                "frame {index} is {width}x{height}, expected {DISPLAY_WIDTH}x{DISPLAY_HEIGHT}"
            )));
        }
    }
    Ok(())
}

/// Drives the external `rt82display` uploader.
#[derive(Debug, Clone)]
pub struct Rt82Display {
    program: PathBuf,
}

impl Rt82Display {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// `$RT82WEATHER_DISPLAY_CMD`, else `rt82display` from `PATH`.
    pub fn from_env() -> Self {
        let program = std::env::var_os(DISPLAY_CMD_ENV)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| OsString::from(DEFAULT_DISPLAY_CMD));
        Self::new(program)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl DisplaySink for Rt82Display {
    fn push(&self, frames: &[RgbImage], fps: u32) -> Result<(), DeviceError> {
        check_frames(frames)?;

        let dir = tempfile::tempdir()?;
        let mut paths = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            let path = dir.path().join(format!("frame_{i:04}.png"));
            frame.save(&path)?;
            paths.push(path);
        }

        debug!(
            "{} upload --fps {} --width {} --height {} ({} frames)",
            self.program.display(),
            fps,
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
            paths.len()
        );
        let output = Command::new(&self.program)
            .arg("upload")
            .args(["--fps", &fps.to_string()])
            .args(["--width", &DISPLAY_WIDTH.to_string()])
            .args(["--height", &DISPLAY_HEIGHT.to_string()])
            .args(&paths)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DeviceError::EncoderMissing(self.program.clone()),
                _ => DeviceError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DeviceError::Upload(if stderr.is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr
            }));
        }

        info!("Uploaded {} frame(s) at {} fps", frames.len(), fps);
        Ok(())
    }
}
