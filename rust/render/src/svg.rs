// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVG rendering of a plan

use std::fs;
use std::path::Path;

use planrec_core::PlanRecord;

use crate::error::RenderError;
use crate::frame::{Frame, RenderOptions};
use crate::palette::RoomKind;

/// Render a plan as a standalone SVG document
///
/// Rooms are drawn in catalog order as filled rectangles with a centered
/// label and a dimension label near their bottom edge. The plot outline is
/// drawn in red on top, with a caption giving the total plot size.
pub fn render_svg(plan: &PlanRecord, options: &RenderOptions) -> Result<String, RenderError> {
    options.validate()?;
    let frame = Frame::new(plan, options);
    let (w, h) = (frame.width, frame.height);
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.1} {h:.1}">
<defs>
  <style>
    .room {{ stroke: #000000; stroke-width: 1.8; fill-opacity: {opacity}; }}
    .label {{ font-family: sans-serif; font-size: 12px; font-weight: bold; text-anchor: middle; dominant-baseline: middle; }}
    .dims {{ font-family: sans-serif; font-size: 9px; fill: gray; text-anchor: middle; }}
    .border {{ fill: none; stroke: red; stroke-width: 2.5; }}
    .caption {{ font-family: sans-serif; font-size: 13px; font-weight: bold; fill: red; text-anchor: middle; }}
    .title {{ font-family: sans-serif; font-size: 18px; font-weight: bold; text-anchor: middle; dominant-baseline: middle; }}
  </style>
</defs>
<rect width="100%" height="100%" fill="white"/>
<text x="{tx:.1}" y="{ty:.1}" class="title">Recommended Plan: {id}</text>
"#,
        opacity = options.fill_opacity,
        tx = w / 2.0,
        ty = options.title_height / 2.0,
        id = escape(&plan.plan_id),
    ));

    for room in &plan.rooms {
        let r = frame.rect(&room.rect);
        let (cx, cy) = room.rect.center();
        let fill = RoomKind::classify(&room.label).hex();
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{fill}" class="room"/>
<text x="{:.1}" y="{:.1}" class="label">{}</text>
<text x="{:.1}" y="{:.1}" class="dims">{}m × {}m</text>
"#,
            r.x,
            r.y,
            r.width,
            r.height,
            frame.x(cx),
            frame.y(cy),
            escape(&room.label),
            frame.x(cx),
            frame.y(room.rect.y + 0.2),
            room.rect.width,
            room.rect.height,
        ));
    }

    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="border"/>
<text x="{:.1}" y="{:.1}" class="caption">Total Plot: {}m × {}m</text>
</svg>
"#,
        frame.x(0.0),
        frame.y(plan.plot_height),
        frame.span(plan.plot_width),
        frame.span(plan.plot_height),
        frame.x(plan.plot_width / 2.0),
        frame.y(-0.5),
        plan.plot_width,
        plan.plot_height,
    ));

    Ok(svg)
}

/// Render and write an SVG file
pub fn write_svg(
    path: impl AsRef<Path>,
    plan: &PlanRecord,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let svg = render_svg(plan, options)?;
    fs::write(path.as_ref(), svg)?;
    tracing::debug!(path = %path.as_ref().display(), plan_id = %plan.plan_id, "Wrote SVG");
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
