/*
 *  service.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Periodic update service: systemd user timer on Linux,
 *	launchd agent on macOS
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
use std::process::{Command, Output};

use dirs_next::home_dir;
use log::{debug, warn};
use thiserror::Error;

pub const SYSTEMD_UNIT: &str = "rt82weather";
pub const LAUNCHD_LABEL: &str = "com.rt82weather.update";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unsupported platform: {0}")]
    Unsupported(String),
    #[error("Cannot locate home directory")]
    NoHome,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            other => Platform::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    NotInstalled,
    /// systemd timer state from `is-active`
    Timer(String),
    /// launchd agent plist present, loaded or not
    Agent { loaded: bool },
    Unsupported(String),
}

pub fn systemd_service_unit(bin: &Path) -> String {
    format!(
        "[Unit]\n\
         Description=Update RT82 keyboard weather display\n\
         \n\
         [Service]\n\
         Type=oneshot\n\
         ExecStart={} update --force\n",
        bin.display()
    )
}

pub fn systemd_timer_unit(hours: u32) -> String {
    format!(
        "[Unit]\n\
         Description=Update RT82 weather display every {hours}h\n\
         \n\
         [Timer]\n\
         OnBootSec=1min\n\
         OnUnitActiveSec={hours}h\n\
         Persistent=true\n\
         \n\
         [Install]\n\
         WantedBy=timers.target\n"
    )
}

pub fn launchd_plist(bin: &Path, hours: u32) -> String {
    let bin = xml_escape(&bin.display().to_string());
    let interval = u64::from(hours) * 3600;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>{LAUNCHD_LABEL}</string>
  <key>ProgramArguments</key>
  <array>
    <string>{bin}</string>
    <string>update</string>
    <string>--force</string>
  </array>
  <key>StartInterval</key>
  <integer>{interval}</integer>
  <key>RunAtLoad</key>
  <true/>
</dict>
</plist>
"#
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Installs, removes and inspects the update service for one user.
#[derive(Debug, Clone)]
pub struct ServiceManager {
    platform: Platform,
    home: PathBuf,
    bin: PathBuf,
}

impl ServiceManager {
    pub fn new(platform: Platform, home: PathBuf, bin: PathBuf) -> Self {
        Self { platform, home, bin }
    }

    /// Current platform, the user's home and the running executable.
    pub fn detect() -> Result<Self, ServiceError> {
        let home = home_dir().ok_or(ServiceError::NoHome)?;
        let bin = std::env::current_exe()?;
        Ok(Self::new(Platform::current(), home, bin))
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn systemd_dir(&self) -> PathBuf {
        self.home.join(".config").join("systemd").join("user")
    }

    pub fn service_path(&self) -> PathBuf {
        self.systemd_dir().join(format!("{SYSTEMD_UNIT}.service"))
    }

    pub fn timer_path(&self) -> PathBuf {
        self.systemd_dir().join(format!("{SYSTEMD_UNIT}.timer"))
    }

    pub fn plist_path(&self) -> PathBuf {
        self.home
            .join("Library")
            .join("LaunchAgents")
            .join(format!("{LAUNCHD_LABEL}.plist"))
    }

    /// Writes the unit or plist files without activating them.
    pub fn write_files(&self, hours: u32) -> Result<Vec<PathBuf>, ServiceError> {
        match &self.platform {
            Platform::Linux => {
                fs::create_dir_all(self.systemd_dir())?;
                let service = self.service_path();
                fs::write(&service, systemd_service_unit(&self.bin))?;
                let timer = self.timer_path();
                fs::write(&timer, systemd_timer_unit(hours))?;
                Ok(vec![service, timer])
            }
            Platform::MacOs => {
                let plist = self.plist_path();
                if let Some(dir) = plist.parent() {
                    fs::create_dir_all(dir)?;
                }
                fs::write(&plist, launchd_plist(&self.bin, hours))?;
                Ok(vec![plist])
            }
            Platform::Other(os) => Err(ServiceError::Unsupported(os.clone())),
        }
    }

    /// Writes and activates the service. Returns the files written.
    pub fn install(&self, hours: u32) -> Result<Vec<PathBuf>, ServiceError> {
        let written = self.write_files(hours)?;
        match &self.platform {
            Platform::Linux => {
                run_logged("systemctl", &["--user", "daemon-reload"]);
                run_logged("systemctl", &["--user", "enable", "--now", &timer_name()]);
            }
            Platform::MacOs => {
                let plist = self.plist_path().display().to_string();
                // a previous copy may not be loaded; ignore the complaint
                let _ = run("launchctl", &["unload", &plist]);
                run_logged("launchctl", &["load", &plist]);
            }
            Platform::Other(_) => {}
        }
        Ok(written)
    }

    /// Deactivates and deletes the service. Returns the files removed.
    pub fn uninstall(&self) -> Result<Vec<PathBuf>, ServiceError> {
        match &self.platform {
            Platform::Linux => {
                run_logged("systemctl", &["--user", "disable", "--now", &timer_name()]);
                let removed = remove_existing(&[self.service_path(), self.timer_path()])?;
                run_logged("systemctl", &["--user", "daemon-reload"]);
                Ok(removed)
            }
            Platform::MacOs => {
                let plist = self.plist_path();
                if plist.exists() {
                    let _ = run("launchctl", &["unload", &plist.display().to_string()]);
                }
                remove_existing(&[plist])
            }
            Platform::Other(os) => Err(ServiceError::Unsupported(os.clone())),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        match &self.platform {
            Platform::Linux => {
                if !self.timer_path().exists() {
                    return ServiceStatus::NotInstalled;
                }
                let state = run("systemctl", &["--user", "is-active", &timer_name()])
                    .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                ServiceStatus::Timer(state)
            }
            Platform::MacOs => {
                if !self.plist_path().exists() {
                    return ServiceStatus::NotInstalled;
                }
                let loaded = run("launchctl", &["list", LAUNCHD_LABEL])
                    .is_some_and(|out| out.status.success());
                ServiceStatus::Agent { loaded }
            }
            Platform::Other(os) => ServiceStatus::Unsupported(os.clone()),
        }
    }
}

fn timer_name() -> String {
    format!("{SYSTEMD_UNIT}.timer")
}

fn remove_existing(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ServiceError> {
    let mut removed = Vec::new();
    for path in paths {
        if path.exists() {
            fs::remove_file(path)?;
            removed.push(path.clone());
        }
    }
    Ok(removed)
}

/// Runs a command to completion; `None` when it could not be spawned.
fn run(program: &str, args: &[&str]) -> Option<Output> {
    debug!("{} {}", program, args.join(" "));
    match Command::new(program).args(args).output() {
        Ok(out) => Some(out),
        Err(e) => {
            warn!("Failed to run {program}: {e}");
            None
        }
    }
}

/// Like [`run`] but warns about a non-zero exit.
fn run_logged(program: &str, args: &[&str]) {
    if let Some(out) = run(program, args) {
        if !out.status.success() {
            warn!(
                "{} {} exited with {}: {}",
                program,
                args.join(" "),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
    }
}
