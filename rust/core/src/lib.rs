// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # planrec core
//!
//! Selects the pre-authored floor plan that best matches a requested plot
//! size and room program.
//!
//! Every plan and every query is mapped to a 9-dimensional feature vector
//! (the UIIV):
//!
//! ```text
//! [width, height, parking, sitout, living_room, bedroom, kitchen, dining, toilet]
//! ```
//!
//! and the plan with the smallest Euclidean distance to the query wins,
//! optionally after narrowing the catalog with k-means groups.
//!
//! ```rust,ignore
//! use planrec_core::{find_best_match, MatchConfig, PlanCatalog, RoomCounts, UserQuery};
//!
//! let catalog = PlanCatalog::load("plan_db_simple.json")?;
//! let query = UserQuery::new(10.0, 8.0, RoomCounts { bedroom: 2, toilet: 1, ..Default::default() })?;
//! let found = find_best_match(&catalog, query.uiiv().as_slice(), &MatchConfig::default())?;
//! println!("{} at distance {:.2}", found.plan.plan_id, found.distance);
//! ```

pub mod catalog;
pub mod error;
pub mod kmeans;
pub mod matcher;
pub mod types;

pub use catalog::PlanCatalog;
pub use error::{Error, Result};
pub use kmeans::{KMeans, KMeansConfig, KMeansModel};
pub use matcher::{find_best_match, MatchConfig, Matcher, PlanMatch, SearchStrategy};
pub use types::{
    PlanRecord, Room, RoomCounts, RoomRect, Uiiv, UserQuery, FEATURE_DIM, FEATURE_NAMES,
};
