//! Wallpaper composition: background, overlay tint, and text layers.

mod draw;

use crate::artifact::ArtifactStore;
use crate::config::{TimeDisplay, WallpaperConfig};
use crate::providers::{self, Transport};
use crate::textfit::{self, FitResult, TextMetrics};
use anyhow::Result;
use fontdue::Font;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use jiff::Zoned;
use std::path::PathBuf;
use tracing::{info, warn};

pub const CANVAS_WIDTH: u32 = 3840;
pub const CANVAS_HEIGHT: u32 = 2160;

/// Flat canvas color used when no background could be fetched.
const FALLBACK_BACKGROUND: Rgba<u8> = Rgba([20, 40, 60, 255]);

/// Left margin of the message and weather blocks, and the horizontal
/// inset of the message band on each side.
const SIDE_MARGIN: i64 = 100;

/// Smallest size any fitted block may shrink to.
const MIN_TEXT_SIZE: u32 = 20;

/// Fitting box for the clock and date, anchored near the top-right corner.
const CLOCK_BOX_WIDTH: f32 = 500.0;
const CLOCK_BOX_HEIGHT: f32 = 200.0;
const CLOCK_RIGHT_INSET: i64 = 600;
const CLOCK_TOP_MARGIN: i64 = 100;

/// Composes one wallpaper per [`generate`](Compositor::generate) call.
/// Every provider failure degrades to a fallback; only the artifact write
/// can fail the call.
pub struct Compositor<'a> {
    config: &'a WallpaperConfig,
    transport: &'a dyn Transport,
    store: ArtifactStore,
}

impl<'a> Compositor<'a> {
    pub fn new(
        config: &'a WallpaperConfig,
        transport: &'a dyn Transport,
        store: ArtifactStore,
    ) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    /// Run one generation and return the artifact path.
    pub fn generate(&self) -> Result<PathBuf> {
        let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();

        let mut canvas = self.background();
        if self.config.overlay_enabled {
            apply_overlay(
                &mut canvas,
                &self.config.overlay_color,
                self.config.overlay_opacity,
            );
        }

        if self.wants_text() {
            // Resolved once, before any text block renders.
            match providers::font::resolve_font(
                self.transport,
                &self.config.google_font_url,
                &self.store.font_path(&timestamp),
            ) {
                Some(font) => self.draw_text_layers(&mut canvas, &font),
                None => warn!("skipping text layers"),
            }
        }

        let path = self.store.save(canvas, &timestamp)?;
        self.store.cleanup(&path);
        Ok(path)
    }

    fn wants_text(&self) -> bool {
        self.config.show_message
            || self.config.show_weather
            || self.config.time_display != TimeDisplay::None
    }

    fn background(&self) -> RgbaImage {
        match providers::image::fetch_background(
            self.transport,
            self.config.image_source,
            &self.config.custom_url,
        ) {
            // Full-bleed stretch; aspect ratio is deliberately not kept.
            Some(photo) => photo
                .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle)
                .to_rgba8(),
            None => {
                info!("no background image, using flat fallback canvas");
                RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, FALLBACK_BACKGROUND)
            }
        }
    }

    fn draw_text_layers(&self, canvas: &mut RgbaImage, font: &Font) {
        if self.config.show_message {
            self.draw_message(canvas, font);
        }
        if self.config.show_weather {
            self.draw_weather(canvas, font);
        }
        self.draw_clock(canvas, font);
    }

    /// Message block: fitted into a band spanning the canvas minus the side
    /// margins, a third of the canvas tall, vertically centered.
    fn draw_message(&self, canvas: &mut RgbaImage, font: &Font) {
        let text = providers::message::message_text(self.transport, self.config.message_type);
        let fit = textfit::fit(
            &text,
            font,
            (CANVAS_WIDTH as i64 - 2 * SIDE_MARGIN) as f32,
            (CANVAS_HEIGHT / 3) as f32,
            self.config.font_size_message,
            MIN_TEXT_SIZE,
        );
        if matches!(fit, FitResult::Overflow { .. }) {
            warn!(size = fit.size(), "message overflows its band at the minimum font size");
        }

        let (size, lines) = fit.into_parts();
        let line_height = font.line_height(size as f32) as i64;
        let block_height = line_height * lines.len() as i64;
        let mut y = CANVAS_HEIGHT as i64 / 2 - block_height / 2;
        for line in &lines {
            draw::shadowed_line(canvas, font, size as f32, line, SIDE_MARGIN, y);
            y += line_height;
        }
    }

    /// Weather line: fixed size, no fitting or wrapping, bottom-left.
    /// Overflow to the right is accepted.
    fn draw_weather(&self, canvas: &mut RgbaImage, font: &Font) {
        let text = providers::weather::fetch_weather(self.transport, &self.config.weather_location);
        draw::shadowed_line(
            canvas,
            font,
            self.config.font_size_weather as f32,
            &text,
            SIDE_MARGIN,
            CANVAS_HEIGHT as i64 - 200,
        );
    }

    /// Clock and date blocks share one fitting box near the top-right; when
    /// both are shown the date stacks directly below the time.
    fn draw_clock(&self, canvas: &mut RgbaImage, font: &Font) {
        let display = self.config.time_display;
        if display == TimeDisplay::None {
            return;
        }

        let now = Zoned::now();
        let x = CANVAS_WIDTH as i64 - CLOCK_RIGHT_INSET;
        let mut y = CLOCK_TOP_MARGIN;

        if matches!(display, TimeDisplay::Time | TimeDisplay::Both) {
            let clock = now.strftime("%I:%M %p").to_string();
            y = self.draw_fitted_block(canvas, font, &clock, x, y);
        }
        if matches!(display, TimeDisplay::Date | TimeDisplay::Both) {
            let date = now.strftime("%A, %b %d").to_string();
            self.draw_fitted_block(canvas, font, &date, x, y);
        }
    }

    fn draw_fitted_block(
        &self,
        canvas: &mut RgbaImage,
        font: &Font,
        text: &str,
        x: i64,
        mut y: i64,
    ) -> i64 {
        let fit = textfit::fit(
            text,
            font,
            CLOCK_BOX_WIDTH,
            CLOCK_BOX_HEIGHT,
            self.config.font_size_time,
            MIN_TEXT_SIZE,
        );
        if matches!(fit, FitResult::Overflow { .. }) {
            warn!(text, size = fit.size(), "text overflows the clock box at the minimum font size");
        }

        let (size, lines) = fit.into_parts();
        let line_height = font.line_height(size as f32) as i64;
        for line in &lines {
            draw::shadowed_line(canvas, font, size as f32, line, x, y);
            y += line_height;
        }
        y
    }
}

/// Blend a uniform color layer over the whole canvas. `hex` falls back to
/// black when unparsable; `opacity` is the layer's alpha.
fn apply_overlay(canvas: &mut RgbaImage, hex: &str, opacity: u8) {
    let [r, g, b] = parse_hex_color(hex).unwrap_or_else(|| {
        warn!(hex, "invalid overlay color, falling back to black");
        [0, 0, 0]
    });
    let alpha = opacity as u32;
    let inverse = 255 - alpha;

    for pixel in canvas.pixels_mut() {
        for (channel, overlay) in [r, g, b].into_iter().enumerate() {
            let base = pixel.0[channel] as u32;
            pixel.0[channel] = ((overlay as u32 * alpha + base * inverse) / 255) as u8;
        }
    }
}

fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
