//! Greeting or quote text for the central message block.

use crate::config::MessageType;
use crate::providers::{FetchError, Transport};
use jiff::Zoned;
use serde::Deserialize;
use tracing::warn;

pub const QUOTE_FALLBACK: &str = "Quote unavailable";

const QUOTE_URL: &str = "https://zenquotes.io/api/random";

#[derive(Deserialize)]
struct Quote {
    q: String,
    a: String,
}

/// Produce the message text. Greetings are a pure function of the local
/// hour and never touch the network; quotes get one attempt and fall back
/// to the fixed string.
pub fn message_text(transport: &dyn Transport, kind: MessageType) -> String {
    match kind {
        MessageType::Greeting => greeting(Zoned::now().hour()).to_string(),
        MessageType::Quote => fetch_quote(transport).unwrap_or_else(|err| {
            warn!(%err, "quote fetch failed");
            QUOTE_FALLBACK.to_string()
        }),
    }
}

/// Five bands over the local hour.
pub fn greeting(hour: i8) -> &'static str {
    match hour {
        0..=4 => "Go to sleep!!",
        5..=11 => "Have a good morning!",
        12..=17 => "Have a good afternoon!",
        18..=21 => "Have a good evening!",
        _ => "Have a good night!",
    }
}

fn fetch_quote(transport: &dyn Transport) -> Result<String, FetchError> {
    let body = transport.fetch(QUOTE_URL)?;
    let quotes: Vec<Quote> =
        serde_json::from_slice(&body).map_err(|err| FetchError::Payload {
            url: QUOTE_URL.to_string(),
            detail: err.to_string(),
        })?;
    let quote = quotes.into_iter().next().ok_or_else(|| FetchError::Payload {
        url: QUOTE_URL.to_string(),
        detail: "empty quote list".to_string(),
    })?;
    Ok(format!("\"{}\"\n– {}", quote.q.trim(), quote.a.trim()))
}
