//! Category relationship and emergence analysis
//!
//! This module provides functionality for:
//! - Building a symmetric category co-occurrence matrix from period aggregates
//! - Extracting strongly related pairs and clustering them into components
//! - Scoring category centrality within the relation graph
//! - Detecting emerging categories (rapid view growth above a volume floor)
//!
//! Two categories are related when they trend together: the relation score
//! is the fraction of periods in which both rank in the top-K by views,
//! taken over the periods where at least one of them ranks there.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::aggregate::{PeriodAggregate, PeriodKey, PeriodType};
use crate::config::CategoryConfig;
use crate::models::Platform;

/// Errors that can occur during category analysis
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Aggregate missing category label for period {period}")]
    MissingCategory { period: String },

    #[error("Deadline exceeded during {operation}")]
    DeadlineExceeded { operation: String },

    #[error("Internal computation error in {operation}: {detail}")]
    Internal { operation: String, detail: String },
}

/// Result type for category analysis operations
pub type CategoryResult<T> = Result<T, CategoryError>;

/// Symmetric relation matrix; the diagonal is excluded by construction
pub type RelationMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// A scored relationship between two categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRelation {
    pub category_a: String,
    pub category_b: String,
    /// Co-trending strength, [0, 1]
    pub relation_score: f64,
}

/// A set of mutually strongly-related categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCluster {
    pub categories: Vec<String>,
}

/// Full relationship analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationReport {
    pub matrix: RelationMatrix,
    /// Pairs at or above the strong-relation threshold, strongest first
    pub strong_relations: Vec<CategoryRelation>,
    /// Disjoint connected components over the strong-relation graph
    pub clusters: Vec<CategoryCluster>,
    /// Mean relation strength of each category to the categories it touches
    pub centrality: BTreeMap<String, f64>,
}

/// A category exhibiting rapid growth with non-trivial volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergingCategory {
    pub name: String,
    /// Evidence strength combining growth magnitude and volume, [0, 1]
    pub confidence: f64,
    /// Latest-period total views
    pub estimated_size: u64,
    pub platforms: BTreeSet<Platform>,
}

/// Category analyzer operating on pre-aggregated period metrics
#[derive(Debug, Clone)]
pub struct CategoryAnalyzer {
    config: CategoryConfig,
}

impl CategoryAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: CategoryConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> Self {
        Self::new(CategoryConfig::default())
    }

    /// Analyze category relationships over the given aggregates
    ///
    /// # Arguments
    /// * `aggregates` - Period aggregates grouped by platform and category
    /// * `platform` - Restrict to one platform, or None for all combined
    /// * `period_type` - Period granularity to analyze; aggregates at any
    ///   other granularity are skipped so weeks and months never mix into
    ///   one period sequence
    /// * `deadline` - Optional cutoff; pair scoring checks it and aborts
    ///   with [`CategoryError::DeadlineExceeded`] once passed. The deadline
    ///   only bounds runtime, it never changes the values produced.
    pub fn analyze_relations(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
        period_type: PeriodType,
        deadline: Option<Instant>,
    ) -> CategoryResult<RelationReport> {
        let trending = self.trending_sets(aggregates, platform, period_type)?;

        let mut categories: BTreeSet<String> = BTreeSet::new();
        for set in trending.values() {
            categories.extend(set.iter().cloned());
        }
        let categories: Vec<String> = categories.into_iter().collect();

        let mut matrix: RelationMatrix = BTreeMap::new();
        let mut strong_relations = Vec::new();

        for (i, a) in categories.iter().enumerate() {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(CategoryError::DeadlineExceeded {
                        operation: "analyze_relations".to_string(),
                    });
                }
            }

            for b in categories.iter().skip(i + 1) {
                let score = Self::relation_score(&trending, a, b);
                if score <= 0.0 {
                    continue;
                }

                matrix
                    .entry(a.clone())
                    .or_default()
                    .insert(b.clone(), score);
                matrix
                    .entry(b.clone())
                    .or_default()
                    .insert(a.clone(), score);

                if score >= self.config.strong_relation_threshold {
                    strong_relations.push(CategoryRelation {
                        category_a: a.clone(),
                        category_b: b.clone(),
                        relation_score: score,
                    });
                }
            }
        }

        // Strongest first, ties by pair name for a deterministic order
        strong_relations.sort_by(|x, y| {
            y.relation_score
                .partial_cmp(&x.relation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| x.category_a.cmp(&y.category_a))
                .then_with(|| x.category_b.cmp(&y.category_b))
        });

        let clusters = Self::clusters(&strong_relations);
        let centrality = Self::centrality(&matrix);

        debug!(
            categories = categories.len(),
            strong = strong_relations.len(),
            clusters = clusters.len(),
            "category relation analysis complete"
        );

        Ok(RelationReport {
            matrix,
            strong_relations,
            clusters,
            centrality,
        })
    }

    /// Detect emerging categories from the two most recent periods
    ///
    /// A category is emerging when its view growth between the prior and
    /// latest period meets the growth threshold AND its latest volume
    /// clears the minimum floor. Growth uses the relative-change formula
    /// with the denominator floored at one view, so a category appearing
    /// from nothing does not divide by zero. Aggregates whose granularity
    /// differs from `period_type` are skipped.
    pub fn detect_emerging(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
        period_type: PeriodType,
    ) -> CategoryResult<Vec<EmergingCategory>> {
        let mut views: BTreeMap<PeriodKey, HashMap<String, u64>> = BTreeMap::new();
        let mut platforms: HashMap<String, BTreeSet<Platform>> = HashMap::new();

        for agg in aggregates {
            if agg.period.period_type != period_type {
                continue;
            }
            if platform.is_some() && agg.platform != platform {
                continue;
            }
            let category = agg.category.clone().ok_or_else(|| {
                CategoryError::MissingCategory {
                    period: agg.period.to_string(),
                }
            })?;

            *views
                .entry(agg.period)
                .or_default()
                .entry(category.clone())
                .or_insert(0) += agg.total_views;

            if let Some(p) = agg.platform {
                platforms.entry(category).or_default().insert(p);
            }
        }

        if views.len() < 2 {
            debug!("fewer than two periods available, no emergence signal");
            return Ok(Vec::new());
        }

        let mut periods = views.keys().copied().collect::<Vec<_>>();
        let latest_key = periods.pop().ok_or_else(|| CategoryError::Internal {
            operation: "detect_emerging".to_string(),
            detail: "period set emptied unexpectedly".to_string(),
        })?;
        let prior_key = periods.pop().ok_or_else(|| CategoryError::Internal {
            operation: "detect_emerging".to_string(),
            detail: "period set emptied unexpectedly".to_string(),
        })?;

        let latest = &views[&latest_key];
        let prior = &views[&prior_key];

        let mut emerging = Vec::new();
        for (category, &latest_views) in latest {
            if latest_views < self.config.min_emerging_volume {
                continue;
            }

            let prior_views = prior.get(category).copied().unwrap_or(0);
            let growth =
                (latest_views as f64 - prior_views as f64) / (prior_views as f64).max(1.0);

            if growth < self.config.emerging_growth_threshold {
                continue;
            }

            let growth_component = (growth / self.config.growth_saturation).clamp(0.0, 1.0);
            let volume_component =
                (latest_views as f64 / self.config.volume_saturation).min(1.0);
            let confidence = self.config.emerging_growth_weight * growth_component
                + self.config.emerging_volume_weight * volume_component;

            emerging.push(EmergingCategory {
                name: category.clone(),
                confidence,
                estimated_size: latest_views,
                platforms: platforms.get(category).cloned().unwrap_or_default(),
            });
        }

        emerging.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(emerging = emerging.len(), "emergence detection complete");
        Ok(emerging)
    }

    /// Per-period sets of top-K categories by views
    fn trending_sets(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
        period_type: PeriodType,
    ) -> CategoryResult<BTreeMap<PeriodKey, BTreeSet<String>>> {
        let mut period_views: BTreeMap<PeriodKey, HashMap<String, u64>> = BTreeMap::new();

        for agg in aggregates {
            if agg.period.period_type != period_type {
                continue;
            }
            if platform.is_some() && agg.platform != platform {
                continue;
            }
            let category = agg.category.clone().ok_or_else(|| {
                CategoryError::MissingCategory {
                    period: agg.period.to_string(),
                }
            })?;

            *period_views
                .entry(agg.period)
                .or_default()
                .entry(category)
                .or_insert(0) += agg.total_views;
        }

        let mut trending = BTreeMap::new();
        for (period, categories) in period_views {
            let mut ranked: Vec<_> = categories.into_iter().collect();
            // Views descending, ties by name ascending
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(self.config.trending_top_k);

            trending.insert(period, ranked.into_iter().map(|(c, _)| c).collect());
        }

        Ok(trending)
    }

    /// Fraction of periods where both categories trend, over periods where
    /// at least one of them does
    fn relation_score(
        trending: &BTreeMap<PeriodKey, BTreeSet<String>>,
        a: &str,
        b: &str,
    ) -> f64 {
        let mut either = 0u64;
        let mut both = 0u64;

        for set in trending.values() {
            let has_a = set.contains(a);
            let has_b = set.contains(b);
            if has_a || has_b {
                either += 1;
            }
            if has_a && has_b {
                both += 1;
            }
        }

        if either == 0 {
            0.0
        } else {
            both as f64 / either as f64
        }
    }

    /// Connected components over the strong-relation graph
    ///
    /// BFS in sorted category order, so component membership and ordering
    /// are deterministic. Every category appearing in a strong relation
    /// lands in exactly one cluster.
    fn clusters(strong_relations: &[CategoryRelation]) -> Vec<CategoryCluster> {
        let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for rel in strong_relations {
            adjacency
                .entry(&rel.category_a)
                .or_default()
                .insert(&rel.category_b);
            adjacency
                .entry(&rel.category_b)
                .or_default()
                .insert(&rel.category_a);
        }

        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut clusters = Vec::new();

        for &start in adjacency.keys() {
            if visited.contains(start) {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            visited.insert(start);

            while let Some(node) = queue.pop_front() {
                component.push(node.to_string());
                if let Some(neighbors) = adjacency.get(node) {
                    for &next in neighbors {
                        if visited.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }

            component.sort();
            clusters.push(CategoryCluster {
                categories: component,
            });
        }

        clusters.sort_by(|a, b| a.categories[0].cmp(&b.categories[0]));
        clusters
    }

    /// Mean relation strength of each category to its connected neighbors
    fn centrality(matrix: &RelationMatrix) -> BTreeMap<String, f64> {
        matrix
            .iter()
            .map(|(category, row)| {
                let mean = if row.is_empty() {
                    0.0
                } else {
                    row.values().sum::<f64>() / row.len() as f64
                };
                (category.clone(), mean)
            })
            .collect()
    }
}

impl Default for CategoryAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
