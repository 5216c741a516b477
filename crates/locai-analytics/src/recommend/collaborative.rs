//! User-user collaborative filtering.

use crate::types::{ItemAttributes, ItemId, UserId, UserInteractions};
use crate::utils::{EPSILON, sparse_cosine_similarity};
use std::collections::BTreeMap;

type Ratings<'a> = BTreeMap<&'a str, f64>;

/// Per-user rating lookup. Later interactions with the same item win.
fn rating_lookup(history: &UserInteractions) -> Ratings<'_> {
    history
        .interactions
        .iter()
        .map(|i| (i.item_id.as_str(), i.effective_rating()))
        .collect()
}

/// Explicit positive ratings only; an unrated latest interaction casts no vote.
fn explicit_lookup(history: &UserInteractions) -> Ratings<'_> {
    let latest: BTreeMap<&str, Option<f64>> = history
        .interactions
        .iter()
        .map(|i| (i.item_id.as_str(), i.explicit_rating()))
        .collect();
    latest
        .into_iter()
        .filter_map(|(item, rating)| rating.map(|r| (item, r)))
        .collect()
}

/// Cosine similarity over the items both users rated; 0 without overlap.
pub(super) fn user_similarity(a: &Ratings<'_>, b: &Ratings<'_>) -> f64 {
    let (common_a, common_b): (BTreeMap<String, f64>, BTreeMap<String, f64>) = a
        .iter()
        .filter_map(|(item, &ra)| b.get(item).map(|&rb| (*item, ra, rb)))
        .map(|(item, ra, rb)| ((item.to_string(), ra), (item.to_string(), rb)))
        .unzip();

    if common_a.is_empty() {
        return 0.0;
    }
    sparse_cosine_similarity(&common_a, &common_b)
}

/// Predicted ratings for every unseen item with positive score.
pub(super) fn score(
    users: &BTreeMap<UserId, UserInteractions>,
    items: &BTreeMap<ItemId, ItemAttributes>,
    threshold: f64,
) -> BTreeMap<UserId, Vec<(ItemId, f64)>> {
    let ratings: Vec<(&UserId, Ratings<'_>)> =
        users.iter().map(|(id, h)| (id, rating_lookup(h))).collect();
    let votes: Vec<Ratings<'_>> = users.values().map(explicit_lookup).collect();

    // Symmetric, so only the upper triangle is computed.
    let n = ratings.len();
    let mut similarity = vec![vec![0.0; n]; n];
    for i in 0..n {
        similarity[i][i] = 1.0;
        for j in (i + 1)..n {
            let s = user_similarity(&ratings[i].1, &ratings[j].1);
            similarity[i][j] = s;
            similarity[j][i] = s;
        }
    }

    ratings
        .iter()
        .enumerate()
        .map(|(i, (user, own))| {
            let candidates = items
                .keys()
                .filter(|item| !own.contains_key(item.as_str()))
                .filter_map(|item| {
                    let mut weighted_sum = 0.0;
                    let mut weight = 0.0;
                    for (j, other) in votes.iter().enumerate() {
                        if i == j || similarity[i][j] <= threshold {
                            continue;
                        }
                        if let Some(&rating) = other.get(item.as_str()) {
                            weighted_sum += similarity[i][j] * rating;
                            weight += similarity[i][j];
                        }
                    }

                    if weight.abs() <= EPSILON {
                        return None;
                    }
                    let predicted = weighted_sum / weight;
                    (predicted > 0.0).then(|| (item.clone(), predicted))
                })
                .collect();
            ((*user).clone(), candidates)
        })
        .collect()
}
