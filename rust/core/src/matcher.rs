// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-plan selection in feature space
//!
//! Two strategies sit behind [`Matcher`]:
//!
//! - [`SearchStrategy::Exact`] scans every plan and always returns the global
//!   nearest neighbor. This is the default.
//! - [`SearchStrategy::Clustered`] first groups the catalog with k-means
//!   (`min(max_clusters, catalog size)` groups), assigns the query to the
//!   nearest centroid and scans only that group. It can miss the global
//!   nearest neighbor when that plan sits in another group; this behavior is
//!   kept as is and never patched up by a fallback search.
//!
//! Ties on distance resolve to the lowest catalog index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::PlanCatalog;
use crate::error::{Error, Result};
use crate::kmeans::{KMeans, KMeansConfig, KMeansModel};
use crate::types::{PlanRecord, Uiiv, UserQuery, FEATURE_DIM, FEATURE_NAMES};

/// Which candidates a query is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Linear scan over the whole catalog
    #[default]
    Exact,
    /// Linear scan over the query's k-means group only
    Clustered,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Exact => f.write_str("exact"),
            SearchStrategy::Clustered => f.write_str("clustered"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "global" => Ok(SearchStrategy::Exact),
            "clustered" | "kmeans" => Ok(SearchStrategy::Clustered),
            other => Err(format!(
                "unknown search strategy '{}' (expected 'exact' or 'clustered')",
                other
            )),
        }
    }
}

/// Matcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub strategy: SearchStrategy,
    /// Upper bound on the number of k-means groups
    pub max_clusters: usize,
    /// k-means restarts
    pub n_init: usize,
    /// k-means iteration cap per restart
    pub max_iter: usize,
    /// k-means convergence tolerance
    pub tol: f64,
    /// Seed for k-means initialisation
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let kmeans = KMeansConfig::default();
        Self {
            strategy: SearchStrategy::Exact,
            max_clusters: kmeans.n_clusters,
            n_init: kmeans.n_init,
            max_iter: kmeans.max_iter,
            tol: kmeans.tol,
            seed: kmeans.seed,
        }
    }
}

impl MatchConfig {
    pub fn clustered() -> Self {
        Self {
            strategy: SearchStrategy::Clustered,
            ..Default::default()
        }
    }

    /// k-means parameters for a catalog of `catalog_size` plans
    pub fn kmeans_config(&self, catalog_size: usize) -> KMeansConfig {
        KMeansConfig {
            n_clusters: self.max_clusters.min(catalog_size),
            n_init: self.n_init,
            max_iter: self.max_iter,
            tol: self.tol,
            seed: self.seed,
        }
    }
}

/// The selected plan and how well it matches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanMatch<'c> {
    /// Catalog index of the selected plan
    pub index: usize,
    pub plan: &'c PlanRecord,
    /// Euclidean distance between query and plan feature vectors
    pub distance: f64,
    /// k-means group searched, for the clustered strategy
    pub group: Option<usize>,
    /// Number of plans compared against the query
    pub candidates: usize,
}

enum SearchIndex {
    Exact,
    Clustered {
        model: KMeansModel,
        members: Vec<Vec<usize>>,
    },
}

/// Matches queries against one catalog
pub struct Matcher<'c> {
    catalog: &'c PlanCatalog,
    features: Vec<Uiiv>,
    index: SearchIndex,
}

impl<'c> Matcher<'c> {
    /// Prepare a matcher; fits the k-means grouping for the clustered strategy
    pub fn new(catalog: &'c PlanCatalog, config: &MatchConfig) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let features = catalog.feature_matrix();

        let index = match config.strategy {
            SearchStrategy::Exact => SearchIndex::Exact,
            SearchStrategy::Clustered => {
                let model = KMeans::new(config.kmeans_config(features.len())).fit(&features)?;
                let members = (0..model.n_clusters()).map(|g| model.members(g)).collect();
                SearchIndex::Clustered { model, members }
            }
        };

        Ok(Self {
            catalog,
            features,
            index,
        })
    }

    pub fn strategy(&self) -> SearchStrategy {
        match self.index {
            SearchIndex::Exact => SearchStrategy::Exact,
            SearchIndex::Clustered { .. } => SearchStrategy::Clustered,
        }
    }

    /// Fitted grouping, when the clustered strategy is in use
    pub fn groups(&self) -> Option<&KMeansModel> {
        match &self.index {
            SearchIndex::Exact => None,
            SearchIndex::Clustered { model, .. } => Some(model),
        }
    }

    pub fn find_query(&self, query: &UserQuery) -> Result<PlanMatch<'c>> {
        self.find(query.uiiv().as_slice())
    }

    /// Select the plan nearest to `query`
    ///
    /// The query must have [`FEATURE_DIM`] finite components; NaN or infinite
    /// values are rejected with [`Error::InvalidQuery`].
    pub fn find(&self, query: &[f64]) -> Result<PlanMatch<'c>> {
        if query.len() != FEATURE_DIM {
            return Err(Error::DimensionMismatch {
                expected: FEATURE_DIM,
                actual: query.len(),
            });
        }
        if let Some(i) = query.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidQuery {
                field: FEATURE_NAMES[i],
                value: query[i],
            });
        }
        let query = Uiiv::from_column_slice(query);

        let found = match &self.index {
            SearchIndex::Exact => self.nearest(&query, 0..self.features.len(), None),
            SearchIndex::Clustered { model, members } => {
                let group = nearest_populated_group(model, members, &query);
                self.nearest(&query, members[group].iter().copied(), Some(group))
            }
        };

        let found = found.ok_or(Error::EmptyCatalog)?;
        tracing::debug!(
            plan_id = %found.plan.plan_id,
            distance = found.distance,
            group = ?found.group,
            candidates = found.candidates,
            "Selected plan"
        );
        Ok(found)
    }

    fn nearest(
        &self,
        query: &Uiiv,
        candidates: impl Iterator<Item = usize>,
        group: Option<usize>,
    ) -> Option<PlanMatch<'c>> {
        let mut best: Option<(usize, f64)> = None;
        let mut count = 0;
        for i in candidates {
            count += 1;
            let d = (query - self.features[i]).norm();
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }

        let (index, distance) = best?;
        Some(PlanMatch {
            index,
            plan: self.catalog.get(index)?,
            distance,
            group,
            candidates: count,
        })
    }
}

/// Nearest centroid among groups that still own plans. A group can end up
/// empty when its centroid was kept through a refinement step.
fn nearest_populated_group(model: &KMeansModel, members: &[Vec<usize>], query: &Uiiv) -> usize {
    let predicted = model.predict(query);
    if !members[predicted].is_empty() {
        return predicted;
    }
    let mut best = predicted;
    let mut best_dist = f64::INFINITY;
    for (g, centroid) in model.centroids().iter().enumerate() {
        if members[g].is_empty() {
            continue;
        }
        let d = (query - centroid).norm_squared();
        if d < best_dist {
            best = g;
            best_dist = d;
        }
    }
    best
}

/// One-shot convenience: build a [`Matcher`] and run a single query
pub fn find_best_match<'c>(
    catalog: &'c PlanCatalog,
    query: &[f64],
    config: &MatchConfig,
) -> Result<PlanMatch<'c>> {
    Matcher::new(catalog, config)?.find(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmeans::lloyd;

    const THREE_PLANS: &str = r#"[
        {"plan_id": "P1", "plot_width": 10, "plot_height": 8,
         "uiiv": [10, 8, 1, 0, 1, 2, 1, 1, 1], "rooms": {"Bedroom 1": [0, 0, 5, 4]}},
        {"plan_id": "P2", "plot_width": 10.5, "plot_height": 8,
         "uiiv": [10.5, 8, 1, 0, 1, 2, 1, 1, 1], "rooms": {"Bedroom 1": [0, 0, 5, 4]}},
        {"plan_id": "P3", "plot_width": 30, "plot_height": 25,
         "uiiv": [30, 25, 2, 1, 1, 4, 1, 1, 3], "rooms": {"Bedroom 1": [0, 0, 5, 4]}}
    ]"#;

    #[test]
    fn test_strategy_parse() {
        assert_eq!("exact".parse::<SearchStrategy>().unwrap(), SearchStrategy::Exact);
        assert_eq!(
            " Clustered ".parse::<SearchStrategy>().unwrap(),
            SearchStrategy::Clustered
        );
        assert!("fuzzy".parse::<SearchStrategy>().is_err());
        assert_eq!(SearchStrategy::Clustered.to_string(), "clustered");
    }

    #[test]
    fn test_default_is_exact() {
        let config = MatchConfig::default();
        assert_eq!(config.strategy, SearchStrategy::Exact);
        assert_eq!(config.max_clusters, 4);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_kmeans_config_caps_clusters() {
        let config = MatchConfig::clustered();
        assert_eq!(config.kmeans_config(2).n_clusters, 2);
        assert_eq!(config.kmeans_config(5).n_clusters, 4);
        assert_eq!(config.kmeans_config(500).n_clusters, 4);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = PlanCatalog::default();
        for config in [MatchConfig::default(), MatchConfig::clustered()] {
            assert!(matches!(
                Matcher::new(&catalog, &config),
                Err(Error::EmptyCatalog)
            ));
            // Checked before the query shape
            assert!(matches!(
                find_best_match(&catalog, &[1.0], &config),
                Err(Error::EmptyCatalog)
            ));
        }
    }

    #[test]
    fn test_query_on_empty_group_searches_nearest_populated_group() {
        let catalog = PlanCatalog::from_json_str(THREE_PLANS).unwrap();
        let features = catalog.feature_matrix();
        let far = Uiiv::from([100.0, 100.0, 2.0, 1.0, 1.0, 4.0, 1.0, 1.0, 3.0]);

        // Third starting centroid attracts no plan and stays where it was
        let model = lloyd(&features, vec![features[0], features[2], far], 300, 0.0);
        let members: Vec<Vec<usize>> = (0..model.n_clusters()).map(|g| model.members(g)).collect();
        assert_eq!(members, vec![vec![0, 1], vec![2], vec![]]);

        let matcher = Matcher {
            catalog: &catalog,
            features,
            index: SearchIndex::Clustered { model, members },
        };
        let query = [95.0, 95.0, 2.0, 1.0, 1.0, 4.0, 1.0, 1.0, 3.0];
        let groups = matcher.groups().unwrap();
        assert_eq!(groups.predict(&Uiiv::from(query)), 2);

        let found = matcher.find(&query).unwrap();
        assert_eq!(found.group, Some(1));
        assert_eq!(found.plan.plan_id, "P3");
        assert_eq!(found.candidates, 1);
    }

    #[test]
    fn test_rejects_non_finite_query() {
        let catalog = PlanCatalog::from_json_str(THREE_PLANS).unwrap();
        for config in [MatchConfig::default(), MatchConfig::clustered()] {
            let matcher = Matcher::new(&catalog, &config).unwrap();
            let mut query = [10.0, 8.0, 1.0, 0.0, 1.0, 2.0, 1.0, 1.0, 1.0];
            assert_eq!(matcher.find(&query).unwrap().plan.plan_id, "P1");

            query[5] = f64::NAN;
            assert!(matches!(
                matcher.find(&query),
                Err(Error::InvalidQuery { field: "bedroom", .. })
            ));
            query[5] = 2.0;
            query[0] = f64::INFINITY;
            assert!(matches!(
                matcher.find(&query),
                Err(Error::InvalidQuery { field: "width", .. })
            ));
        }
    }
}
