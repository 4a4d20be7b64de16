//! Tool registry and dispatcher.
//!
//! Every tool is a [`ToolName`] bound to a [`ToolHandler`]. [`ToolRegistry::call`] keeps two
//! kinds of failure apart: a [`DispatchError`] means the invocation itself was wrong (unknown
//! tool, malformed arguments), while a handler's [`ToolError`] still produces a [`ToolResult`],
//! flagged with `is_error`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    Config,
    error::{DispatchError, ToolError},
    provider::{ForecastProvider, Geocoder, forecast_from_config, geocoder_from_config},
    store::{JsonFileStore, LocationStore},
};

pub mod forecast;
pub mod locations;

use forecast::GetForecast;
use locations::{AddLocation, AddLocationBySearch, DeleteLocation, ListLocations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    AddLocationBySearch,
    AddLocation,
    DeleteLocation,
    ListLocations,
    GetForecast,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AddLocationBySearch => "add_location_by_search",
            ToolName::AddLocation => "add_location",
            ToolName::DeleteLocation => "delete_location",
            ToolName::ListLocations => "list_locations",
            ToolName::GetForecast => "get_forecast",
        }
    }

    pub const fn all() -> &'static [ToolName] {
        &[
            ToolName::AddLocationBySearch,
            ToolName::AddLocation,
            ToolName::DeleteLocation,
            ToolName::ListLocations,
            ToolName::GetForecast,
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::AddLocationBySearch => {
                "Save a named location by searching for a place (city, town, landmark). \
                 The best match is stored under the given name; coordinates are kept private."
            }
            ToolName::AddLocation => {
                "Save a named location from explicit latitude and longitude in decimal degrees."
            }
            ToolName::DeleteLocation => "Delete a saved location by name.",
            ToolName::ListLocations => "List the names of all saved locations.",
            ToolName::GetForecast => {
                "Get the 7-day weather forecast for a saved location, referenced by name."
            }
        }
    }

    pub fn input_schema(&self) -> Value {
        let name = json!({
            "type": "string",
            "description": "Name of the saved location, e.g. \"Home\" (case-insensitive)"
        });

        match self {
            ToolName::AddLocationBySearch => json!({
                "type": "object",
                "properties": {
                    "name": name,
                    "search_query": {
                        "type": "string",
                        "description": "Place to search for, e.g. \"Tokyo\" or \"Springfield, Illinois\""
                    }
                },
                "required": ["name", "search_query"],
                "additionalProperties": false
            }),
            ToolName::AddLocation => json!({
                "type": "object",
                "properties": {
                    "name": name,
                    "latitude": {
                        "type": "number",
                        "minimum": -90,
                        "maximum": 90,
                        "description": "Latitude in decimal degrees"
                    },
                    "longitude": {
                        "type": "number",
                        "minimum": -180,
                        "maximum": 180,
                        "description": "Longitude in decimal degrees"
                    }
                },
                "required": ["name", "latitude", "longitude"],
                "additionalProperties": false
            }),
            ToolName::DeleteLocation | ToolName::GetForecast => json!({
                "type": "object",
                "properties": { "name": name },
                "required": ["name"],
                "additionalProperties": false
            }),
            ToolName::ListLocations => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ToolName {
    type Error = DispatchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ToolName::all()
            .iter()
            .copied()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| DispatchError::UnknownTool(value.to_string()))
    }
}

/// Tool metadata as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Payload of a completed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// All text content joined by newlines.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collaborators shared by every handler.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub store: Arc<dyn LocationStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub forecast: Arc<dyn ForecastProvider>,
}

/// Logic bound to one tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Strictly deserialized argument bundle.
    type Args: DeserializeOwned + Send;

    async fn invoke(&self, ctx: &ToolContext, args: Self::Args) -> Result<String, ToolError>;
}

/// Routes tool calls to handlers.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    ctx: ToolContext,
}

impl ToolRegistry {
    pub fn new(
        store: Arc<dyn LocationStore>,
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self {
            ctx: ToolContext {
                store,
                geocoder,
                forecast,
            },
        }
    }

    /// Wire the JSON file store and Open-Meteo clients from config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let path = config.locations_path()?;
        debug!(path = %path.display(), "Using locations file");

        Ok(Self::new(
            Arc::new(JsonFileStore::new(path)),
            geocoder_from_config(config),
            forecast_from_config(config),
        ))
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ToolName::all().iter().map(ToolName::definition).collect()
    }

    /// Run the named tool. Only unknown tools and malformed arguments are `Err`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolResult, DispatchError> {
        let tool = ToolName::try_from(name)?;
        debug!(%tool, "Tool call");

        match tool {
            ToolName::AddLocationBySearch => self.run(tool, &AddLocationBySearch, args).await,
            ToolName::AddLocation => self.run(tool, &AddLocation, args).await,
            ToolName::DeleteLocation => self.run(tool, &DeleteLocation, args).await,
            ToolName::ListLocations => self.run(tool, &ListLocations, args).await,
            ToolName::GetForecast => self.run(tool, &GetForecast, args).await,
        }
    }

    async fn run<H: ToolHandler>(
        &self,
        tool: ToolName,
        handler: &H,
        args: Value,
    ) -> Result<ToolResult, DispatchError> {
        let args = if args.is_null() { json!({}) } else { args };
        let args: H::Args =
            serde_json::from_value(args).map_err(|e| DispatchError::InvalidArguments {
                tool: tool.to_string(),
                message: e.to_string(),
            })?;

        match handler.invoke(&self.ctx, args).await {
            Ok(text) => Ok(ToolResult::text(text)),
            Err(e) => {
                warn!(%tool, error = %e, "Tool failed");
                Ok(ToolResult::error(format!("Error: {e}")))
            }
        }
    }
}
