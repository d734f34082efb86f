/*
 *  providers/mod.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Forecast provider interface and registry
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

pub mod bbc;

use thiserror::Error;

use crate::weather::{Location, WeatherForecast};

pub use bbc::BbcWeatherProvider;

/// Errors from location search and forecast retrieval.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No forecast data returned")]
    NoForecast,
    #[error("Forecast missing temperature data")]
    MissingTemperature,
    #[error("Unknown provider: {name:?}. Available: {available:?}")]
    UnknownProvider { name: String, available: Vec<String> },
}

/// A remote weather service.
#[allow(async_fn_in_trait)]
pub trait WeatherProvider {
    fn name(&self) -> &'static str;

    /// Places matching `query`, best match first.
    async fn search_location(&self, query: &str) -> Result<Vec<Location>, ProviderError>;

    /// Today's forecast for a location id returned by [`Self::search_location`].
    async fn get_forecast(&self, location_id: &str) -> Result<WeatherForecast, ProviderError>;
}

/// Every registered provider, dispatched by variant.
#[derive(Debug, Clone)]
pub enum Provider {
    Bbc(BbcWeatherProvider),
}

const REGISTERED: &[&str] = &[bbc::NAME];

pub fn list_providers() -> Vec<&'static str> {
    REGISTERED.to_vec()
}

/// Looks up a provider by name; `verify_ssl = false` disables certificate checks.
pub fn get_provider(name: &str, verify_ssl: bool) -> Result<Provider, ProviderError> {
    match name {
        bbc::NAME => Ok(Provider::Bbc(BbcWeatherProvider::new(verify_ssl)?)),
        _ => Err(ProviderError::UnknownProvider {
            name: name.to_string(),
            available: REGISTERED.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

impl Provider {
    pub fn verify_ssl(&self) -> bool {
        match self {
            Provider::Bbc(p) => p.verify_ssl(),
        }
    }
}

impl WeatherProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Bbc(p) => p.name(),
        }
    }

    async fn search_location(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        match self {
            Provider::Bbc(p) => p.search_location(query).await,
        }
    }

    async fn get_forecast(&self, location_id: &str) -> Result<WeatherForecast, ProviderError> {
        match self {
            Provider::Bbc(p) => p.get_forecast(location_id).await,
        }
    }
}
