// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing options and the plan-to-canvas mapping

use planrec_core::{PlanRecord, RoomRect};

use crate::error::RenderError;

/// Drawing configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Pixels per meter
    pub scale: f64,
    /// Space left, right and above the plot (meters)
    pub margin: f64,
    /// Space below the plot, holding the plot caption (meters)
    pub caption_margin: f64,
    /// Height of the title band (pixels)
    pub title_height: f64,
    /// Room fill opacity
    pub fill_opacity: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 50.0,
            margin: 1.0,
            caption_margin: 1.5,
            title_height: 40.0,
            fill_opacity: 0.7,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(RenderError::InvalidOptions(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(RenderError::InvalidOptions(format!(
                "fill opacity must be within 0..=1, got {}",
                self.fill_opacity
            )));
        }
        if self.margin < 0.0 || self.caption_margin < 0.0 || self.title_height < 0.0 {
            return Err(RenderError::InvalidOptions("margins must not be negative".into()));
        }
        Ok(())
    }
}

/// Maps plan coordinates (meters, y up) to canvas pixels (y down)
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    scale: f64,
    margin: f64,
    title_height: f64,
    plot_height: f64,
    pub width: f64,
    pub height: f64,
}

/// Canvas-space rectangle (top-left corner and size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(plan: &PlanRecord, options: &RenderOptions) -> Self {
        let scale = options.scale;
        Self {
            scale,
            margin: options.margin,
            title_height: options.title_height,
            plot_height: plan.plot_height,
            width: (plan.plot_width + 2.0 * options.margin) * scale,
            height: options.title_height
                + (plan.plot_height + options.margin + options.caption_margin) * scale,
        }
    }

    pub fn x(&self, x: f64) -> f64 {
        (x + self.margin) * self.scale
    }

    pub fn y(&self, y: f64) -> f64 {
        self.title_height + (self.margin + self.plot_height - y) * self.scale
    }

    pub fn span(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    pub fn rect(&self, rect: &RoomRect) -> PixelRect {
        PixelRect {
            x: self.x(rect.x),
            y: self.y(rect.y + rect.height),
            width: self.span(rect.width),
            height: self.span(rect.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planrec_core::{Room, Uiiv};

    fn plan() -> PlanRecord {
        PlanRecord {
            plan_id: "F".into(),
            plot_width: 10.0,
            plot_height: 8.0,
            uiiv: Uiiv::from([10.0, 8.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
            rooms: vec![Room {
                label: "Living".into(),
                rect: RoomRect::new(0.0, 0.0, 10.0, 8.0),
            }],
        }
    }

    #[test]
    fn test_frame_flips_y() {
        let options = RenderOptions {
            scale: 10.0,
            title_height: 0.0,
            ..Default::default()
        };
        let frame = Frame::new(&plan(), &options);
        assert_eq!(frame.width, 120.0);
        assert_eq!(frame.height, 105.0);
        // Plot origin is bottom-left
        assert_eq!((frame.x(0.0), frame.y(0.0)), (10.0, 90.0));
        assert_eq!(frame.y(8.0), 10.0);

        let r = frame.rect(&RoomRect::new(2.0, 1.0, 3.0, 2.0));
        assert_eq!(
            r,
            PixelRect {
                x: 30.0,
                y: 60.0,
                width: 30.0,
                height: 20.0
            }
        );
    }

    #[test]
    fn test_invalid_options() {
        let options = RenderOptions {
            scale: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        let options = RenderOptions {
            fill_opacity: 1.5,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        assert!(RenderOptions::default().validate().is_ok());
    }
}
