// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation of recommended plans
//!
//! - [`render_svg`] / [`write_svg`]: scaled 2D diagram with room labels,
//!   dimensions, a red plot border and a title
//! - [`render_raster`] / [`write_png`]: the same diagram as an RGB image
//! - [`format_summary`]: console summary of a match
//!
//! Rooms are colored by type, see [`RoomKind`].

pub mod error;
pub mod frame;
pub mod palette;
pub mod raster;
pub mod summary;
pub mod svg;

pub use error::RenderError;
pub use frame::RenderOptions;
pub use palette::RoomKind;
pub use raster::{render_raster, write_png, MAX_CANVAS_PX};
pub use summary::format_summary;
pub use svg::{render_svg, write_svg};
