//! Background image acquisition with a bounded retry loop.

use crate::config::ImageSource;
use crate::providers::Transport;
use image::DynamicImage;
use tracing::warn;

const PICSUM_URL: &str = "https://picsum.photos/3840/2160";

/// One network fetch per attempt, retried immediately without backoff.
const MAX_ATTEMPTS: u32 = 5;

/// Fetch and decode the background photo. Returns `None` once all attempts
/// are exhausted; the caller substitutes a flat-color canvas. Response
/// bytes are only decoded on a success status, and a body that fails to
/// decode burns an attempt like any other failure.
pub fn fetch_background(
    transport: &dyn Transport,
    source: ImageSource,
    custom_url: &str,
) -> Option<DynamicImage> {
    let url = match source {
        ImageSource::Picsum => PICSUM_URL,
        ImageSource::CustomUrl => custom_url.trim(),
    };

    for attempt in 1..=MAX_ATTEMPTS {
        if url.is_empty() {
            warn!(attempt, "image source is CustomURL but no URL is configured");
            continue;
        }
        match transport.fetch(url) {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(decoded) => return Some(decoded),
                Err(err) => warn!(attempt, %err, "background image failed to decode"),
            },
            Err(err) => warn!(attempt, %err, "background fetch failed"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::{CannedTransport, FailingTransport};

    #[test]
    fn test_exhausted_attempts_return_absence() {
        let transport = FailingTransport::new();
        let background = fetch_background(&transport, ImageSource::Picsum, "");
        assert!(background.is_none());
        assert_eq!(transport.calls.get(), 5);
    }

    #[test]
    fn test_undecodable_body_burns_all_attempts() {
        let transport = CannedTransport {
            body: b"this is not an image".to_vec(),
        };
        let background = fetch_background(&transport, ImageSource::Picsum, "");
        assert!(background.is_none());
    }

    #[test]
    fn test_empty_custom_url_never_touches_the_network() {
        let transport = FailingTransport::new();
        let background = fetch_background(&transport, ImageSource::CustomUrl, "  ");
        assert!(background.is_none());
        assert_eq!(transport.calls.get(), 0);
    }

    #[test]
    fn test_valid_png_is_decoded() {
        let mut body = Vec::new();
        let canvas = image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        image::DynamicImage::ImageRgb8(canvas)
            .write_to(&mut std::io::Cursor::new(&mut body), image::ImageFormat::Png)
            .unwrap();

        let transport = CannedTransport { body };
        let background = fetch_background(
            &transport,
            ImageSource::CustomUrl,
            "https://example.com/bg.png",
        );
        let background = background.expect("decodes");
        assert_eq!((background.width(), background.height()), (4, 4));
    }
}
