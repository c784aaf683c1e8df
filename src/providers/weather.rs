//! Compact weather line from wttr.in.

use crate::providers::{FetchError, Transport};
use tracing::warn;

pub const WEATHER_FALLBACK: &str = "Weather unavailable";

/// Condition, temperature, humidity, wind.
const WTTR_FORMAT: &str = "%C+%t+%h+%w";

/// One attempt, no retries. Any failure yields the fixed fallback string.
pub fn fetch_weather(transport: &dyn Transport, location: &str) -> String {
    match try_fetch(transport, location) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(%err, location, "weather fetch failed");
            WEATHER_FALLBACK.to_string()
        }
    }
}

fn try_fetch(transport: &dyn Transport, location: &str) -> Result<String, FetchError> {
    let url = format!("https://wttr.in/{location}?format={WTTR_FORMAT}");
    let body = transport.fetch(&url)?;
    Ok(String::from_utf8_lossy(&body).trim().to_string())
}
