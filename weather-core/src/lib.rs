//! Core library for the `weather-mcp` tool server.
//!
//! This crate defines:
//! - Configuration (provider endpoints, location file path)
//! - The location store, the only owner of persisted state
//! - Open-Meteo geocoding and forecast clients
//! - The tool registry that the protocol server dispatches into
//!
//! It is used by `weather-mcp`, but the registry can be driven by any transport.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod tools;
pub mod weather_code;

pub use config::Config;
pub use error::{DispatchError, ToolError};
pub use model::{DailyForecast, GeocodingCandidate, Location};
pub use provider::{ForecastProvider, Geocoder, ProviderId};
pub use store::{JsonFileStore, LocationStore};
pub use tools::{ToolDefinition, ToolName, ToolRegistry, ToolResult};
