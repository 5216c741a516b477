//! Content-based filtering over item attributes.

use crate::types::{FeatureVector, ItemAttributes, ItemId, UserId, UserInteractions};
use crate::utils::{EPSILON, sparse_cosine_similarity};
use std::collections::BTreeMap;

/// Feature vector of one item: numeric attributes as-is, plus a 1.0
/// indicator per category (`category_<name>`) and tag (`tag_<name>`).
pub fn item_features(attributes: &ItemAttributes) -> FeatureVector {
    let mut features: FeatureVector = attributes
        .numeric()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    for category in attributes.labels("categories") {
        features.insert(format!("category_{category}"), 1.0);
    }
    for tag in attributes.labels("tags") {
        features.insert(format!("tag_{tag}"), 1.0);
    }

    features
}

/// Rating-weighted average of the features of the items a user touched,
/// normalized by the user's total rating weight.
fn user_profile(
    history: &UserInteractions,
    features: &BTreeMap<&ItemId, FeatureVector>,
) -> FeatureVector {
    let mut profile = FeatureVector::new();
    for interaction in &history.interactions {
        let Some(item) = features.get(&interaction.item_id) else {
            continue;
        };
        let weight = interaction.effective_rating();
        for (name, value) in item {
            *profile.entry(name.clone()).or_insert(0.0) += value * weight;
        }
    }

    let total: f64 = history
        .interactions
        .iter()
        .map(|i| i.effective_rating())
        .sum();
    if total.abs() > EPSILON {
        profile.values_mut().for_each(|v| *v /= total);
    }

    profile
}

/// Cosine score of every unseen item against each user's profile.
pub(super) fn score(
    users: &BTreeMap<UserId, UserInteractions>,
    items: &BTreeMap<ItemId, ItemAttributes>,
) -> BTreeMap<UserId, Vec<(ItemId, f64)>> {
    let features: BTreeMap<&ItemId, FeatureVector> = items
        .iter()
        .map(|(id, attributes)| (id, item_features(attributes)))
        .collect();

    users
        .iter()
        .map(|(user, history)| {
            let profile = user_profile(history, &features);
            let candidates = features
                .iter()
                .filter(|(item, _)| !history.has_interacted(item))
                .map(|(item, vector)| {
                    ((*item).clone(), sparse_cosine_similarity(&profile, vector))
                })
                .collect();
            (user.clone(), candidates)
        })
        .collect()
}
