// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raster rendering of a plan
//!
//! Same layout as the SVG output, without text: raster text would need a
//! bundled font.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use planrec_core::PlanRecord;

use crate::error::RenderError;
use crate::frame::{Frame, PixelRect, RenderOptions};
use crate::palette::RoomKind;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

const ROOM_OUTLINE_PX: i32 = 2;
const BORDER_PX: i32 = 3;

/// Largest canvas side, in pixels, that [`render_raster`] will allocate
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Render a plan into an RGB image
///
/// Fails with [`RenderError::InvalidOptions`] when the canvas would exceed
/// [`MAX_CANVAS_PX`] on either side. Rooms reaching outside the canvas are
/// clipped.
pub fn render_raster(plan: &PlanRecord, options: &RenderOptions) -> Result<RgbImage, RenderError> {
    options.validate()?;
    let frame = Frame::new(plan, options);
    let limit = MAX_CANVAS_PX as f64;
    if !(frame.width <= limit && frame.height <= limit) {
        return Err(RenderError::InvalidOptions(format!(
            "canvas of {:.0}x{:.0} px exceeds {} px per side; lower the scale",
            frame.width, frame.height, MAX_CANVAS_PX
        )));
    }
    let width = frame.width.ceil().max(1.0) as u32;
    let height = frame.height.ceil().max(1.0) as u32;
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    for room in &plan.rooms {
        let r = frame.rect(&room.rect);
        let color = RoomKind::classify(&room.label).color();
        blend_rect(&mut img, &r, color, options.fill_opacity);
        outline_rect(&mut img, &r, BLACK, ROOM_OUTLINE_PX);
    }

    let border = PixelRect {
        x: frame.x(0.0),
        y: frame.y(plan.plot_height),
        width: frame.span(plan.plot_width),
        height: frame.span(plan.plot_height),
    };
    outline_rect(&mut img, &border, RED, BORDER_PX);

    Ok(img)
}

/// Render and write a PNG file
pub fn write_png(
    path: impl AsRef<Path>,
    plan: &PlanRecord,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let img = render_raster(plan, options)?;
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        width = img.width(),
        height = img.height(),
        "Wrote PNG"
    );
    Ok(())
}

/// Alpha-blend `color` over the pixels covered by `rect`
fn blend_rect(img: &mut RgbImage, rect: &PixelRect, color: Rgb<u8>, alpha: f64) {
    let (x0, x1) = clamp_span(rect.x, rect.x + rect.width, img.width());
    let (y0, y1) = clamp_span(rect.y, rect.y + rect.height, img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let px = img.get_pixel_mut(x, y);
            for c in 0..3 {
                let under = px.0[c] as f64;
                let over = color.0[c] as f64;
                px.0[c] = (alpha * over + (1.0 - alpha) * under).round() as u8;
            }
        }
    }
}

/// Outline of `thickness` pixels, grown outwards from the rectangle edge
///
/// Edges are clamped just outside the canvas first, so rectangles far off
/// the canvas stay within `i32` range and draw only their visible part.
fn outline_rect(img: &mut RgbImage, rect: &PixelRect, color: Rgb<u8>, thickness: i32) {
    let pad = f64::from(thickness + 1);
    let clip = |v: f64, limit: u32| v.round().clamp(-pad, limit as f64 + pad) as i32;
    let left = clip(rect.x, img.width());
    let top = clip(rect.y, img.height());
    let right = clip(rect.x + rect.width, img.width());
    let bottom = clip(rect.y + rect.height, img.height());
    let w = (right - left).max(1);
    let h = (bottom - top).max(1);
    for t in 0..thickness {
        let r = Rect::at(left - t, top - t).of_size((w + 2 * t) as u32, (h + 2 * t) as u32);
        draw_hollow_rect_mut(img, r, color);
    }
}

fn clamp_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let lo = start.round().clamp(0.0, limit as f64) as u32;
    let hi = end.round().clamp(0.0, limit as f64) as u32;
    (lo, hi.max(lo))
}
