//! Handlers that manage saved locations.
//!
//! Replies never echo coordinates.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::error::ToolError;

use super::{ToolContext, ToolHandler};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddBySearchArgs {
    pub name: String,
    pub search_query: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddArgs {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

/// Geocode a query and store the best match under a chosen name.
pub struct AddLocationBySearch;

#[async_trait]
impl ToolHandler for AddLocationBySearch {
    type Args = AddBySearchArgs;

    async fn invoke(&self, ctx: &ToolContext, args: AddBySearchArgs) -> Result<String, ToolError> {
        if args.name.trim().is_empty() {
            return Err(ToolError::EmptyName);
        }

        let best = ctx
            .geocoder
            .search(&args.search_query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::NoSearchResults(args.search_query.clone()))?;

        ctx.store.add(&args.name, best.latitude, best.longitude).await?;

        let place = best.display_name();
        info!(location = %args.name, %place, "Saved location from search");
        Ok(format!(
            "Saved \"{}\" as {place}. Use get_forecast with this name to see the weather.",
            args.name
        ))
    }
}

/// Store explicit coordinates under a chosen name.
pub struct AddLocation;

#[async_trait]
impl ToolHandler for AddLocation {
    type Args = AddArgs;

    async fn invoke(&self, ctx: &ToolContext, args: AddArgs) -> Result<String, ToolError> {
        ctx.store.add(&args.name, args.latitude, args.longitude).await?;
        Ok(format!("Saved \"{}\".", args.name))
    }
}

pub struct DeleteLocation;

#[async_trait]
impl ToolHandler for DeleteLocation {
    type Args = NameArgs;

    async fn invoke(&self, ctx: &ToolContext, args: NameArgs) -> Result<String, ToolError> {
        ctx.store.delete(&args.name).await?;
        Ok(format!("Deleted \"{}\".", args.name))
    }
}

/// Names only; coordinates stay in storage.
pub struct ListLocations;

#[async_trait]
impl ToolHandler for ListLocations {
    type Args = NoArgs;

    async fn invoke(&self, ctx: &ToolContext, _args: NoArgs) -> Result<String, ToolError> {
        let names: Vec<String> = ctx.store.list().await.into_iter().map(|loc| loc.name).collect();

        if names.is_empty() {
            return Ok(
                "No saved locations. Add one with add_location_by_search or add_location."
                    .to_string(),
            );
        }

        let mut out = format!("Saved locations ({}):", names.len());
        for name in names {
            out.push_str("\n- ");
            out.push_str(&name);
        }
        Ok(out)
    }
}
