//! Item recommendations from user interaction histories.
//!
//! Two strategies are available:
//!
//! - **Collaborative**: user-user cosine similarity over commonly rated
//!   items, with predictions taken as a similarity-weighted average of the
//!   neighbours' ratings.
//! - **Content-based**: items are described by their numeric attributes and
//!   one-hot category/tag indicators; each user gets a rating-weighted
//!   profile which is matched against unseen items by cosine similarity.
//!
//! Neither strategy ever recommends an item the user already interacted with.

mod collaborative;
mod content;

pub use content::item_features;

use crate::config::{RecommendationConfig, RecommendationMethod};
use crate::error::{AnalyticsError, Result};
use crate::types::{ItemAttributes, ItemId, RecommendationScore, UserId, UserInteractions};
use std::collections::BTreeMap;
use tracing::debug;

/// Recommendations per user, in descending score order.
pub type Recommendations = BTreeMap<UserId, Vec<RecommendationScore>>;

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommendationConfig,
}

impl Recommender {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn recommend(
        &self,
        users: &BTreeMap<UserId, UserInteractions>,
        items: &BTreeMap<ItemId, ItemAttributes>,
    ) -> Result<Recommendations> {
        if users.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "no user interaction data provided",
            ));
        }
        if items.is_empty() {
            return Err(AnalyticsError::invalid_input("no item data provided"));
        }

        let scored = match self.config.method {
            RecommendationMethod::Collaborative => {
                collaborative::score(users, items, self.config.similarity_threshold)
            }
            RecommendationMethod::ContentBased => content::score(users, items),
        };

        debug!(
            "{:?} recommender scored candidates for {} users over {} items",
            self.config.method,
            users.len(),
            items.len()
        );

        Ok(scored
            .into_iter()
            .map(|(user, candidates)| {
                (user, rank(candidates, items, self.config.max_recommendations))
            })
            .collect())
    }
}

/// Sort `(item, score)` pairs by descending score, keep the first `limit`
/// and attach each item's attributes. Equal scores keep item-id order.
fn rank(
    mut candidates: Vec<(ItemId, f64)>,
    items: &BTreeMap<ItemId, ItemAttributes>,
    limit: usize,
) -> Vec<RecommendationScore> {
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates
        .into_iter()
        .take(limit)
        .map(|(item_id, score)| RecommendationScore {
            attributes: items.get(&item_id).cloned().unwrap_or_default(),
            item_id,
            score,
        })
        .collect()
}
