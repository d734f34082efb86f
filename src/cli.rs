/*
 *  cli.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Command line: configure, update, preview, install, uninstall, status
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
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueHint};
use log::{debug, info};

use crate::config::{Config, config_path};
use crate::device::{DisplaySink, Rt82Display};
use crate::providers::{Provider, WeatherProvider, get_provider};
use crate::render::render_weather;
use crate::service::{Platform, SYSTEMD_UNIT, ServiceManager, ServiceStatus};
use crate::theme;
use crate::weather::{Location, WeatherForecast};

pub const NOT_CONFIGURED: &str = "Not configured yet. Run: rt82weather configure";

/// Search results offered for picking.
const MAX_RESULTS: usize = 15;
const UPLOAD_FPS: u32 = 2;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

#[derive(Debug, Parser)]
#[command(
    name = "rt82weather",
    version,
    long_version = LONG_VERSION,
    about = "RT82 Weather - Weather on your keyboard."
)]
pub struct Cli {
    /// Enable debug log level
    #[arg(short = 'v', long = "debug", alias = "verbose", global = true)]
    pub debug: bool,

    /// Skip TLS certificate verification (corporate proxies)
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search for your city and save the weather location
    Configure {
        /// Weather provider (default: bbc)
        #[arg(long)]
        provider: Option<String>,
        /// Update interval in hours (default: 6)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        hours: Option<u32>,
    },
    /// Fetch weather and upload to the RT82 keyboard display
    Update {
        /// Update even if recently updated
        #[arg(long)]
        force: bool,
    },
    /// Generate the weather image without uploading
    Preview {
        /// Output PNG path
        #[arg(short, long, default_value = "weather_preview.png", value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Install a recurring service to update weather automatically
    Install,
    /// Remove the automatic weather update service
    Uninstall,
    /// Show current configuration and service state
    Status,
}

/// Command handlers bound to one config file.
pub struct App {
    config_path: PathBuf,
    insecure: bool,
    provider: Option<Provider>,
}

impl App {
    pub fn new(config_path: PathBuf, insecure: bool) -> Self {
        Self {
            config_path,
            insecure,
            provider: None,
        }
    }

    /// Uses `provider` instead of looking one up by the configured name.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    fn load_config(&self) -> Config {
        Config::load_from(&self.config_path)
    }

    fn save_config(&self, cfg: &Config) -> Result<()> {
        cfg.save_to(&self.config_path)
            .with_context(|| format!("Failed to save {}", self.config_path.display()))
    }

    fn provider_for(&self, cfg: &Config) -> Result<Provider> {
        if let Some(provider) = &self.provider {
            return Ok(provider.clone());
        }
        let verify_ssl = !(self.insecure || cfg.insecure);
        Ok(get_provider(&cfg.provider, verify_ssl)?)
    }

    pub async fn configure<R: BufRead>(
        &self,
        provider: Option<String>,
        hours: Option<u32>,
        input: &mut R,
    ) -> Result<Location> {
        theme::print_banner();
        println!();

        let mut cfg = self.load_config();
        if let Some(provider) = provider {
            cfg.provider = provider;
        }
        if let Some(hours) = hours {
            cfg.update_hours = hours;
        }
        if self.insecure {
            cfg.insecure = true;
        }

        let prov = self.provider_for(&cfg)?;
        theme::info(&format!("Using provider: {}", theme::highlight(prov.name())));
        println!();

        let query = prompt(input, "Search for a city")?;
        println!();
        theme::muted("  Searching...");
        let locations = prov.search_location(&query).await.context("Search failed")?;
        if locations.is_empty() {
            bail!("No locations found. Try a different search term.");
        }

        let shown = &locations[..locations.len().min(MAX_RESULTS)];
        theme::print_header("Results", "\u{1f4cd}");
        for (i, loc) in shown.iter().enumerate() {
            println!("  {} {}", theme::paint(&format!("{:2}.", i + 1), theme::INFO), loc.display_name());
        }
        println!();

        let choice = prompt_choice(input, "Pick a number", shown.len())?;
        let selected = shown[choice - 1].clone();

        cfg.location_id = selected.id.clone();
        cfg.location_name = selected.display_name();
        self.save_config(&cfg)?;
        info!("Configured location {} ({})", cfg.location_name, cfg.location_id);

        println!();
        theme::success(&format!("Saved: {}", theme::highlight(&cfg.location_name)));
        theme::muted(&format!(
            "  Provider: {}  |  ID: {}  |  Update every {}h",
            cfg.provider, selected.id, cfg.update_hours
        ));
        Ok(selected)
    }

    /// Returns whether anything was uploaded.
    pub async fn update(&self, force: bool, sink: &impl DisplaySink) -> Result<bool> {
        theme::print_banner();
        println!();

        let mut cfg = self.load_config();
        ensure_configured(&cfg)?;

        if !force && !cfg.needs_update() {
            let when = cfg
                .last_updated_dt()
                .map(|dt| dt.format("%H:%M").to_string())
                .unwrap_or_default();
            theme::info(&format!("Already up-to-date (last updated {when}). Use --force to override."));
            return Ok(false);
        }

        theme::print_header("Fetching Weather", "\u{2601}\u{fe0f}");
        theme::muted(&format!("  Location: {}", cfg.location_name));
        theme::muted(&format!("  Provider: {}", cfg.provider));
        let forecast = self.fetch(&cfg).await?;

        theme::print_header("Rendering", "\u{1f3a8}");
        let img = render_weather(&forecast, None);

        theme::print_header("Uploading", "\u{1f4e4}");
        sink.push(&[img], UPLOAD_FPS).context("Upload failed")?;

        cfg.mark_updated();
        self.save_config(&cfg)?;

        println!();
        theme::success("Weather uploaded!");
        Ok(true)
    }

    pub async fn preview(&self, output: &Path) -> Result<()> {
        theme::print_banner();
        println!();

        let cfg = self.load_config();
        ensure_configured(&cfg)?;

        theme::print_header("Fetching Weather", "\u{2601}\u{fe0f}");
        theme::muted(&format!("  Location: {}", cfg.location_name));
        let forecast = self.fetch(&cfg).await?;

        theme::print_header("Rendering", "\u{1f3a8}");
        let img = render_weather(&forecast, None);
        img.save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        println!();
        theme::success(&format!("Saved preview: {}", theme::highlight(&output.display().to_string())));
        theme::muted(&format!("  {}x{} pixels", img.width(), img.height()));
        Ok(())
    }

    async fn fetch(&self, cfg: &Config) -> Result<WeatherForecast> {
        let prov = self.provider_for(cfg)?;
        let mut forecast = prov
            .get_forecast(&cfg.location_id)
            .await
            .context("Failed to fetch weather")?;
        forecast.location_name = cfg.location_name.clone();
        debug!("{forecast:?}");
        theme::info(&forecast.summary());
        Ok(forecast)
    }

    pub fn install(&self, services: &ServiceManager) -> Result<()> {
        theme::print_banner();
        println!();

        let cfg = self.load_config();
        ensure_configured(&cfg)?;

        match services.platform() {
            Platform::Linux => theme::print_header("Installing systemd timer", "\u{2699}\u{fe0f}"),
            Platform::MacOs => theme::print_header("Installing launchd agent", "\u{2699}\u{fe0f}"),
            Platform::Other(os) => bail!("Unsupported platform: {os}"),
        }
        for path in services.install(cfg.update_hours)? {
            theme::muted(&format!("  Wrote {}", path.display()));
        }

        println!();
        match services.platform() {
            Platform::Linux => {
                theme::success("Systemd timer installed and started");
                theme::muted(&format!("  Updates every {} hours", cfg.update_hours));
                theme::muted(&format!("  Check with: systemctl --user status {SYSTEMD_UNIT}.timer"));
            }
            _ => {
                theme::success("Launch agent installed and loaded");
                theme::muted(&format!("  Updates every {} hours", cfg.update_hours));
                theme::muted(&format!("  Plist: {}", services.plist_path().display()));
            }
        }
        Ok(())
    }

    pub fn uninstall(&self, services: &ServiceManager) -> Result<()> {
        theme::print_banner();
        println!();

        let (title, done) = match services.platform() {
            Platform::Linux => ("Removing systemd timer", "Systemd timer removed"),
            Platform::MacOs => ("Removing launchd agent", "Launch agent removed"),
            Platform::Other(os) => bail!("Unsupported platform: {os}"),
        };
        theme::print_header(title, "\u{1f5d1}\u{fe0f}");
        for path in services.uninstall()? {
            theme::muted(&format!("  Removed {}", path.display()));
        }

        println!();
        theme::success(done);
        Ok(())
    }

    pub fn status(&self, services: &ServiceManager) {
        theme::print_banner();
        println!();

        let cfg = self.load_config();
        theme::print_header("Configuration", "\u{2699}\u{fe0f}");
        if !cfg.is_configured() {
            theme::warning("Not configured. Run: rt82weather configure");
            return;
        }

        theme::field("Location", &cfg.location_name);
        theme::field("Provider", &cfg.provider);
        theme::field("Location ID", &cfg.location_id);
        theme::field("Interval", &format!("every {}h", cfg.update_hours));
        match cfg.last_updated_dt() {
            Some(dt) => {
                theme::field("Last update", &dt.format("%Y-%m-%d %H:%M").to_string());
                if cfg.needs_update() {
                    theme::warning("Update is due");
                } else {
                    theme::success("Up to date");
                }
            }
            None => theme::muted("  Never updated"),
        }

        println!();
        theme::print_header("Service", "\u{1f504}");
        match services.status() {
            ServiceStatus::NotInstalled => match services.platform() {
                Platform::MacOs => theme::muted("  Launch agent not installed. Run: rt82weather install"),
                _ => theme::muted("  Systemd timer not installed. Run: rt82weather install"),
            },
            ServiceStatus::Timer(state) if state == "active" => {
                theme::success(&format!("Systemd timer is {}", theme::highlight("active")))
            }
            ServiceStatus::Timer(state) => theme::warning(&format!("Systemd timer state: {state}")),
            ServiceStatus::Agent { loaded: true } => {
                theme::success(&format!("Launch agent is {}", theme::highlight("loaded")))
            }
            ServiceStatus::Agent { loaded: false } => {
                theme::warning("Launch agent plist exists but is not loaded")
            }
            ServiceStatus::Unsupported(os) => {
                theme::muted(&format!("  Service management not supported on {os}"))
            }
        }
    }
}

fn ensure_configured(cfg: &Config) -> Result<()> {
    if cfg.is_configured() {
        Ok(())
    } else {
        Err(anyhow!(NOT_CONFIGURED))
    }
}

/// Reads one non-empty trimmed line, asking again on blank input.
pub fn prompt<R: BufRead>(input: &mut R, label: &str) -> io::Result<String> {
    loop {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
}

/// A 1-based pick in `1..=max`.
pub fn parse_choice(text: &str, max: usize) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|n| (1..=max).contains(n))
}

fn prompt_choice<R: BufRead>(input: &mut R, label: &str, max: usize) -> io::Result<usize> {
    loop {
        let text = prompt(input, label)?;
        match parse_choice(&text, max) {
            Some(n) => return Ok(n),
            None => theme::warning(&format!("{text} is not in the range 1-{max}")),
        }
    }
}

/// Dispatches a parsed command line against the user's config.
pub async fn run(cli: Cli) -> Result<()> {
    let app = App::new(config_path()?, cli.insecure);
    match cli.command {
        Commands::Configure { provider, hours } => {
            let stdin = io::stdin();
            app.configure(provider, hours, &mut stdin.lock()).await?;
        }
        Commands::Update { force } => {
            app.update(force, &Rt82Display::from_env()).await?;
        }
        Commands::Preview { output } => app.preview(&output).await?,
        Commands::Install => app.install(&ServiceManager::detect()?)?,
        Commands::Uninstall => app.uninstall(&ServiceManager::detect()?)?,
        Commands::Status => app.status(&ServiceManager::detect()?),
    }
    Ok(())
}
