// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for plan records and user queries

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of components in a feature vector
pub const FEATURE_DIM: usize = 9;

/// Feature vector: `[width, height, parking, sitout, living_room, bedroom, kitchen, dining, toilet]`
pub type Uiiv = SVector<f64, FEATURE_DIM>;

/// Component names, positionally aligned with [`Uiiv`]
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "width",
    "height",
    "parking",
    "sitout",
    "living_room",
    "bedroom",
    "kitchen",
    "dining",
    "toilet",
];

/// Axis-aligned room rectangle in plan-local coordinates (meters, y up)
///
/// Serialized as a `[x, y, width, height]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct RoomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RoomRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl From<[f64; 4]> for RoomRect {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<RoomRect> for [f64; 4] {
    fn from(rect: RoomRect) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

/// A labelled room of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub label: String,
    pub rect: RoomRect,
}

/// One pre-authored floor plan of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub plan_id: String,
    /// Plot width in meters
    pub plot_width: f64,
    /// Plot height in meters
    pub plot_height: f64,
    #[serde(with = "uiiv_serde")]
    pub uiiv: Uiiv,
    /// Rooms in source document order
    #[serde(with = "ordered_rooms")]
    pub rooms: Vec<Room>,
}

impl PlanRecord {
    pub fn room(&self, label: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.label == label)
    }

    /// Check the record invariants, returning a description of the first violation
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.plan_id.is_empty() {
            return Err("plan_id is empty".into());
        }
        if !(self.plot_width.is_finite() && self.plot_width > 0.0)
            || !(self.plot_height.is_finite() && self.plot_height > 0.0)
        {
            return Err(format!(
                "plan {}: plot size {}x{} must be positive",
                self.plan_id, self.plot_width, self.plot_height
            ));
        }
        for (i, value) in self.uiiv.iter().enumerate() {
            let positive_required = i < 2;
            let ok = value.is_finite() && if positive_required { *value > 0.0 } else { *value >= 0.0 };
            if !ok {
                return Err(format!(
                    "plan {}: uiiv component {} ({}) is {}",
                    self.plan_id, i, FEATURE_NAMES[i], value
                ));
            }
        }
        if self.rooms.is_empty() {
            return Err(format!("plan {}: no rooms", self.plan_id));
        }
        if let Some(room) = self.rooms.iter().find(|r| !r.rect.is_finite()) {
            return Err(format!(
                "plan {}: room {} has a non-finite rectangle",
                self.plan_id, room.label
            ));
        }
        Ok(())
    }
}

/// Requested room counts of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomCounts {
    pub parking: u32,
    pub sitout: u32,
    pub living_room: u32,
    pub bedroom: u32,
    pub kitchen: u32,
    pub dining: u32,
    pub toilet: u32,
}

/// A validated user request, mapped onto the feature space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserQuery {
    plot_width: f64,
    plot_height: f64,
    rooms: RoomCounts,
}

impl UserQuery {
    pub fn new(plot_width: f64, plot_height: f64, rooms: RoomCounts) -> Result<Self> {
        for (field, value) in [("plot_width", plot_width), ("plot_height", plot_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidQuery { field, value });
            }
        }
        Ok(Self {
            plot_width,
            plot_height,
            rooms,
        })
    }

    pub fn plot_width(&self) -> f64 {
        self.plot_width
    }

    pub fn plot_height(&self) -> f64 {
        self.plot_height
    }

    pub fn rooms(&self) -> &RoomCounts {
        &self.rooms
    }

    /// Feature vector in catalog order
    pub fn uiiv(&self) -> Uiiv {
        let r = &self.rooms;
        Uiiv::from([
            self.plot_width,
            self.plot_height,
            r.parking as f64,
            r.sitout as f64,
            r.living_room as f64,
            r.bedroom as f64,
            r.kitchen as f64,
            r.dining as f64,
            r.toilet as f64,
        ])
    }
}

mod uiiv_serde {
    use super::{Uiiv, FEATURE_DIM};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(uiiv: &Uiiv, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(uiiv.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uiiv, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        if values.len() != FEATURE_DIM {
            return Err(D::Error::invalid_length(values.len(), &"9 feature values"));
        }
        Ok(Uiiv::from_column_slice(&values))
    }
}

/// Rooms are a JSON object; keep the document order instead of hashing it away.
mod ordered_rooms {
    use super::{Room, RoomRect};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(rooms: &[Room], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(rooms.len()))?;
        for room in rooms {
            map.serialize_entry(&room.label, &room.rect)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Room>, D::Error> {
        struct RoomsVisitor;

        impl<'de> Visitor<'de> for RoomsVisitor {
            type Value = Vec<Room>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of room label to [x, y, width, height]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut rooms = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, rect)) = access.next_entry::<String, RoomRect>()? {
                    rooms.push(Room { label, rect });
                }
                Ok(rooms)
            }
        }

        deserializer.deserialize_map(RoomsVisitor)
    }
}
