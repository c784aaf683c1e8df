//! Glyph rasterization onto the wallpaper canvas.

use fontdue::Font;
use image::{Rgb, RgbaImage};

/// Drop shadow offset for every text layer, in pixels.
const SHADOW_OFFSET: i64 = 2;

const SHADOW_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Draw one line twice: black at (+2,+2), then white in place. Keeps text
/// legible against arbitrary backgrounds.
pub fn shadowed_line(canvas: &mut RgbaImage, font: &Font, size: f32, line: &str, x: i64, y: i64) {
    draw_line(
        canvas,
        font,
        size,
        line,
        x + SHADOW_OFFSET,
        y + SHADOW_OFFSET,
        SHADOW_COLOR,
    );
    draw_line(canvas, font, size, line, x, y, TEXT_COLOR);
}

/// Rasterize `line` at `size` with its cap line at `y`, blending glyph
/// coverage over whatever is already on the canvas. Glyphs falling outside
/// the canvas are clipped, not an error.
fn draw_line(
    canvas: &mut RgbaImage,
    font: &Font,
    size: f32,
    line: &str,
    x: i64,
    y: i64,
    color: Rgb<u8>,
) {
    // Same 'A'-box metric the fitter uses for line heights, so fitted
    // blocks land where they were measured.
    let baseline = y + font.metrics('A', size).height as i64;
    let mut pen_x = x as f32;

    for ch in line.chars() {
        let (metrics, coverage) = font.rasterize(ch, size);
        let left = pen_x.round() as i64 + metrics.xmin as i64;
        let top = baseline - (metrics.height as i64 + metrics.ymin as i64);
        blit(canvas, &coverage, metrics.width, left, top, color);
        pen_x += metrics.advance_width;
    }
}

fn blit(
    canvas: &mut RgbaImage,
    coverage: &[u8],
    glyph_width: usize,
    left: i64,
    top: i64,
    color: Rgb<u8>,
) {
    if glyph_width == 0 {
        return;
    }
    let (canvas_width, canvas_height) = canvas.dimensions();

    for (row, chunk) in coverage.chunks_exact(glyph_width).enumerate() {
        let py = top + row as i64;
        if py < 0 || py >= canvas_height as i64 {
            continue;
        }
        for (col, &cov) in chunk.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let px = left + col as i64;
            if px < 0 || px >= canvas_width as i64 {
                continue;
            }
            let cov = cov as u32;
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            for channel in 0..3 {
                let src = color.0[channel] as u32;
                let dst = pixel.0[channel] as u32;
                pixel.0[channel] = ((src * cov + dst * (255 - cov)) / 255) as u8;
            }
        }
    }
}
