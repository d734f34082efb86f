/*
 *  main.rs
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
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::debug;

use rt82weather::cli::{self, Cli};
use rt82weather::theme;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    // RUST_LOG still wins over the flag
    env_logger::Builder::from_env(Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }))
        .format_timestamp_secs()
        .init();

    debug!("v.{} built {}", env!("CARGO_PKG_VERSION"), env!("BUILD_DATE"));

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            theme::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
