use async_trait::async_trait;

use crate::{error::ToolError, model::DailyForecast};

use super::{ToolContext, ToolHandler, locations::NameArgs};

/// Forecast for a saved location, looked up by name.
pub struct GetForecast;

#[async_trait]
impl ToolHandler for GetForecast {
    type Args = NameArgs;

    async fn invoke(&self, ctx: &ToolContext, args: NameArgs) -> Result<String, ToolError> {
        let location = ctx
            .store
            .find(&args.name)
            .await
            .ok_or_else(|| ToolError::LocationNotFound(args.name.clone()))?;

        let days = ctx
            .forecast
            .fetch(location.latitude, location.longitude)
            .await?;

        Ok(format_report(&location.name, &days))
    }
}

/// Multi-day text report. Contains the location name but never its coordinates.
pub fn format_report(name: &str, days: &[DailyForecast]) -> String {
    if days.is_empty() {
        return format!("No forecast data available for {name}.");
    }

    let mut out = format!("Weather forecast for {name} ({} days):\n", days.len());
    for day in days {
        out.push_str(&format!(
            "\n{} {}: {}\n  Temperature: {:.1}°C to {:.1}°C\n  Precipitation: {:.1} mm\n  Max wind: {:.1} km/h\n",
            day.date.format("%a"),
            day.date,
            day.weather_description,
            day.temperature_min,
            day.temperature_max,
            day.precipitation_sum,
            day.wind_speed_max,
        ));
    }
    out
}
