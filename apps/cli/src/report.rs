// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON report for `--json`.

use planrec_core::{PlanMatch, PlanRecord, SearchStrategy, UserQuery};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub strategy: SearchStrategy,
    pub query: Vec<f64>,
    pub plan_id: &'a str,
    pub index: usize,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    pub candidates: usize,
    pub plan: &'a PlanRecord,
}

impl<'a> MatchReport<'a> {
    pub fn new(found: &PlanMatch<'a>, query: &UserQuery, strategy: SearchStrategy) -> Self {
        Self {
            strategy,
            query: query.uiiv().iter().copied().collect(),
            plan_id: &found.plan.plan_id,
            index: found.index,
            distance: found.distance,
            group: found.group,
            candidates: found.candidates,
            plan: found.plan,
        }
    }
}
