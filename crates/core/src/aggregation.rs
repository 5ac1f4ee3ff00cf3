//! Vote aggregation.
//!
//! Winner takes all; a tie at the top is reported and never broken.

use std::collections::BTreeMap;

use serde::Serialize;

/// Votes counted for one restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantTally {
    pub restaurant_id: i32,
    pub vote_count: u32,
}

/// Outcome of aggregating a set of votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationResult {
    /// No votes were given.
    NoVotes,
    /// Two or more restaurants share the highest count.
    Tie {
        vote_count: u32,
        /// Every restaurant holding the top count, by ascending id.
        restaurant_ids: Vec<i32>,
    },
    /// A single restaurant holds the highest count.
    Winner { restaurant_id: i32, vote_count: u32 },
}

/// Count votes per restaurant, highest count first.
///
/// Restaurants with equal counts come out by ascending id. That order only
/// keeps output stable; no rule depends on it.
pub fn tally<I>(restaurant_ids: I) -> Vec<RestaurantTally>
where
    I: IntoIterator<Item = i32>,
{
    let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
    for id in restaurant_ids {
        *counts.entry(id).or_default() += 1;
    }

    let mut tallies: Vec<RestaurantTally> = counts
        .into_iter()
        .map(|(restaurant_id, vote_count)| RestaurantTally {
            restaurant_id,
            vote_count,
        })
        .collect();
    // stable: equal counts keep ascending id order
    tallies.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    tallies
}

/// Decide the winner of a set of votes, given as the restaurant id of each vote.
pub fn aggregate<I>(restaurant_ids: I) -> AggregationResult
where
    I: IntoIterator<Item = i32>,
{
    let tallies = tally(restaurant_ids);

    let Some(top) = tallies.first().copied() else {
        return AggregationResult::NoVotes;
    };

    let tied: Vec<i32> = tallies
        .iter()
        .take_while(|t| t.vote_count == top.vote_count)
        .map(|t| t.restaurant_id)
        .collect();

    if tied.len() > 1 {
        AggregationResult::Tie {
            vote_count: top.vote_count,
            restaurant_ids: tied,
        }
    } else {
        AggregationResult::Winner {
            restaurant_id: top.restaurant_id,
            vote_count: top.vote_count,
        }
    }
}
