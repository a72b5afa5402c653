// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only catalog of pre-authored plans
//!
//! The catalog source is a JSON array of plan objects:
//!
//! ```json
//! [
//!   {
//!     "plan_id": "P1",
//!     "plot_width": 10,
//!     "plot_height": 8,
//!     "uiiv": [10, 8, 1, 0, 1, 2, 1, 1, 1],
//!     "rooms": { "Living Room": [0, 0, 5, 4], "Bedroom 1": [5, 0, 5, 4] }
//!   }
//! ]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::types::{PlanRecord, Uiiv};

/// Plans loaded once at startup; index positions are stable for the catalog's lifetime
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<PlanRecord>,
}

impl PlanCatalog {
    /// Build a catalog from already parsed records
    ///
    /// Unlike the loaders, an empty list is accepted here; matching against it
    /// reports [`Error::EmptyCatalog`].
    pub fn from_records(plans: Vec<PlanRecord>) -> Result<Self> {
        Self::check_records("<records>", &plans)?;
        Ok(Self { plans })
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::load(&name, e.to_string()))?;
        let catalog = Self::parse(&name, BufReader::new(file))?;
        tracing::debug!(path = %name, plans = catalog.len(), "Loaded plan catalog");
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse("<reader>", reader)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse("<string>", text.as_bytes())
    }

    fn parse<R: Read>(name: &str, reader: R) -> Result<Self> {
        let plans: Vec<PlanRecord> =
            serde_json::from_reader(reader).map_err(|e| Error::load(name, e.to_string()))?;
        if plans.is_empty() {
            return Err(Error::load(name, "catalog is empty"));
        }
        Self::check_records(name, &plans)?;
        Ok(Self { plans })
    }

    fn check_records(name: &str, plans: &[PlanRecord]) -> Result<()> {
        let mut seen = FxHashSet::default();
        for plan in plans {
            plan.validate().map_err(|reason| Error::load(name, reason))?;
            if !seen.insert(plan.plan_id.as_str()) {
                return Err(Error::load(
                    name,
                    format!("duplicate plan_id {}", plan.plan_id),
                ));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlanRecord> {
        self.plans.get(index)
    }

    pub fn find(&self, plan_id: &str) -> Option<&PlanRecord> {
        self.plans.iter().find(|p| p.plan_id == plan_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanRecord> {
        self.plans.iter()
    }

    /// Feature vectors aligned by index with the records
    pub fn feature_matrix(&self) -> Vec<Uiiv> {
        self.plans.iter().map(|p| p.uiiv).collect()
    }
}

impl<'a> IntoIterator for &'a PlanCatalog {
    type Item = &'a PlanRecord;
    type IntoIter = std::slice::Iter<'a, PlanRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.plans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PLANS: &str = r#"[
        {
            "plan_id": "P1", "plot_width": 10, "plot_height": 8,
            "uiiv": [10, 8, 1, 0, 1, 2, 1, 1, 1],
            "rooms": {"Living Room": [0, 0, 5, 4], "Bedroom 1": [5, 0, 5, 4]}
        },
        {
            "plan_id": "P2", "plot_width": 20, "plot_height": 15,
            "uiiv": [20, 15, 2, 1, 1, 3, 1, 1, 2],
            "rooms": {"Parking": [0, 0, 5, 5]},
            "notes": "extra fields are ignored"
        }
    ]"#;

    fn load_err(text: &str) -> String {
        match PlanCatalog::from_json_str(text) {
            Err(Error::Load { reason, .. }) => reason,
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_string() {
        let catalog = PlanCatalog::from_json_str(TWO_PLANS).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().plan_id, "P2");
        assert!(catalog.get(2).is_none());
        assert_eq!(catalog.find("P1").unwrap().rooms.len(), 2);

        let matrix = catalog.feature_matrix();
        assert_eq!(matrix.len(), 2);
        for (row, plan) in matrix.iter().zip(&catalog) {
            assert_eq!(row, &plan.uiiv);
        }
    }

    #[test]
    fn test_empty_catalog_is_load_error() {
        assert!(load_err("[]").contains("empty"));
    }

    #[test]
    fn test_malformed_sources() {
        // Not JSON at all
        load_err("plans: none");
        // Missing field
        load_err(r#"[{"plan_id": "A", "plot_width": 1, "uiiv": [1,1,0,0,0,0,0,0,0], "rooms": {}}]"#);
        // Non-numeric feature
        load_err(
            r#"[{"plan_id": "A", "plot_width": 1, "plot_height": 1,
                 "uiiv": [1,1,"two",0,0,0,0,0,0], "rooms": {"Hall": [0,0,1,1]}}]"#,
        );
        // Wrong rectangle arity
        load_err(
            r#"[{"plan_id": "A", "plot_width": 1, "plot_height": 1,
                 "uiiv": [1,1,0,0,0,0,0,0,0], "rooms": {"Hall": [0,0,1]}}]"#,
        );
    }

    #[test]
    fn test_duplicate_plan_id() {
        let text = r#"[
            {"plan_id": "A", "plot_width": 1, "plot_height": 1,
             "uiiv": [1,1,0,0,0,0,0,0,0], "rooms": {"Hall": [0,0,1,1]}},
            {"plan_id": "A", "plot_width": 2, "plot_height": 2,
             "uiiv": [2,2,0,0,0,0,0,0,0], "rooms": {"Hall": [0,0,2,2]}}
        ]"#;
        assert!(load_err(text).contains("duplicate plan_id A"));
    }

    #[test]
    fn test_from_records_allows_empty() {
        let catalog = PlanCatalog::from_records(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.feature_matrix().is_empty());
    }

    #[test]
    fn test_unreadable_file() {
        let err = PlanCatalog::load("/nonexistent/plan_db_simple.json").unwrap_err();
        match err {
            Error::Load { source_name, .. } => assert!(source_name.contains("plan_db_simple")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
