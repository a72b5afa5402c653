// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room type classification and fill colors

use image::Rgb;

/// Room type derived from a room label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomKind {
    Bedroom,
    Toilet,
    Parking,
    Sitout,
    Living,
    Kitchen,
    Dining,
    Other,
}

impl RoomKind {
    /// Kinds recognised from labels, in lookup order
    pub const KNOWN: [RoomKind; 7] = [
        RoomKind::Bedroom,
        RoomKind::Toilet,
        RoomKind::Parking,
        RoomKind::Sitout,
        RoomKind::Living,
        RoomKind::Kitchen,
        RoomKind::Dining,
    ];

    fn prefix(self) -> Option<&'static str> {
        match self {
            RoomKind::Bedroom => Some("bedroom"),
            RoomKind::Toilet => Some("toilet"),
            RoomKind::Parking => Some("parking"),
            RoomKind::Sitout => Some("sitout"),
            RoomKind::Living => Some("living"),
            RoomKind::Kitchen => Some("kitchen"),
            RoomKind::Dining => Some("dining"),
            RoomKind::Other => None,
        }
    }

    /// Classify by the first word of the label, matched case-insensitively by prefix
    ///
    /// `"Living Room"`, `"bedroom 2"` and `"Toilet1"` are recognised;
    /// `"Store"` and `"Master Bedroom"` are [`RoomKind::Other`].
    pub fn classify(label: &str) -> Self {
        let word = label
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.prefix().is_some_and(|p| word.starts_with(p)))
            .unwrap_or(RoomKind::Other)
    }

    pub fn color(self) -> Rgb<u8> {
        match self {
            RoomKind::Bedroom => Rgb([0xFF, 0xB6, 0xC1]),
            RoomKind::Toilet => Rgb([0xD3, 0xD3, 0xD3]),
            RoomKind::Parking => Rgb([0xFF, 0xE4, 0xB5]),
            RoomKind::Sitout => Rgb([0xE0, 0xF8, 0xE0]),
            RoomKind::Living => Rgb([0xB0, 0xE0, 0xE6]),
            RoomKind::Kitchen => Rgb([0xF0, 0xE6, 0x8C]),
            RoomKind::Dining => Rgb([0xDD, 0xA0, 0xDD]),
            RoomKind::Other => Rgb([0xF5, 0xF5, 0xF5]),
        }
    }

    /// Color as `#RRGGBB`
    pub fn hex(self) -> String {
        let Rgb([r, g, b]) = self.color();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}
