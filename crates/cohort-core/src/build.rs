//! Follow-graph construction from user records.
//!
//! # Overview
//!
//! Raw follow lists are noisy: most followed accounts are followed by a
//! single collected user and contribute nothing to community structure. The
//! builder counts how many users follow each account and keeps only accounts
//! followed by **more than** `min_common` users.
//!
//! ```text
//! Vec<UserRecord>
//!        ↓  count_friends()
//! FriendCounts (account → number of followers among the users)
//!        ↓  build_follow_graph(users, counts, min_common)
//! FollowGraph (user ids + shared accounts, user–account edges)
//!        ↓  min_degree_subgraph()   (optional pruning)
//! FollowGraph
//! ```
//!
//! Every user id is a node even if none of its follows survive the filter.
//! When a collected user follows another collected user, the followed user's
//! id is the same node, so the two users are joined directly.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::FollowGraph;
use crate::records::UserRecord;

// ---------------------------------------------------------------------------
// FriendCounts
// ---------------------------------------------------------------------------

/// How many users follow each account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FriendCounts {
    counts: BTreeMap<String, usize>,
}

impl FriendCounts {
    /// Number of users following `account`; zero if unseen.
    #[must_use]
    pub fn get(&self, account: &str) -> usize {
        self.counts.get(account).copied().unwrap_or(0)
    }

    /// Number of distinct followed accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most followed accounts, by descending count then ascending id.
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(account, &count)| (account.as_str(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Accounts followed by more than `min_common` users, in id order.
    pub fn shared(&self, min_common: usize) -> impl Iterator<Item = &str> + '_ {
        self.counts
            .iter()
            .filter(move |&(_, &count)| count > min_common)
            .map(|(account, _)| account.as_str())
    }
}

/// Count how many users follow each account.
#[must_use]
pub fn count_friends(users: &[UserRecord]) -> FriendCounts {
    let mut counts = BTreeMap::new();
    for user in users {
        for friend in &user.friends {
            *counts.entry(friend.clone()).or_insert(0) += 1;
        }
    }
    FriendCounts { counts }
}

// ---------------------------------------------------------------------------
// Friend overlap
// ---------------------------------------------------------------------------

/// Number of followed accounts shared by a pair of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub first: String,
    pub second: String,
    pub shared: usize,
}

/// Shared-follow counts for every unordered pair of users.
///
/// Pairs are labelled with screen names where available (ids otherwise).
/// Within a pair the smaller label comes first. The result is sorted by
/// descending `shared`, then by `first`, then by `second`.
#[must_use]
pub fn friend_overlap(users: &[UserRecord]) -> Vec<Overlap> {
    let mut overlaps = Vec::with_capacity(users.len() * users.len().saturating_sub(1) / 2);
    for (i, a) in users.iter().enumerate() {
        for b in &users[i + 1..] {
            let shared = a.friends.intersection(&b.friends).count();
            let (first, second) = if a.label() <= b.label() {
                (a.label(), b.label())
            } else {
                (b.label(), a.label())
            };
            overlaps.push(Overlap {
                first: first.to_string(),
                second: second.to_string(),
                shared,
            });
        }
    }
    overlaps.sort_by(|x, y| {
        y.shared
            .cmp(&x.shared)
            .then_with(|| x.first.cmp(&y.first))
            .then_with(|| x.second.cmp(&y.second))
    });
    overlaps
}

// ---------------------------------------------------------------------------
// Graph construction
// ---------------------------------------------------------------------------

/// Build the follow graph.
///
/// Every user id becomes a node. Each account followed by more than
/// `min_common` users becomes a node joined to every user following it.
#[must_use]
#[instrument(skip(users, counts), fields(users = users.len()))]
pub fn build_follow_graph(
    users: &[UserRecord],
    counts: &FriendCounts,
    min_common: usize,
) -> FollowGraph {
    let shared: BTreeSet<&str> = counts.shared(min_common).collect();

    let mut graph = FollowGraph::new();
    for account in &shared {
        graph.add_node(*account);
    }
    for user in users {
        graph.add_node(user.id.as_str());
        for friend in &user.friends {
            if shared.contains(friend.as_str()) {
                graph.add_edge(&user.id, friend);
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        shared_accounts = shared.len(),
        "built follow graph"
    );
    graph
}

/// The subgraph induced by nodes whose degree is at least `min_degree`.
///
/// Degrees are measured in the input graph, so pruning is a single pass.
#[must_use]
pub fn min_degree_subgraph(graph: &FollowGraph, min_degree: usize) -> FollowGraph {
    let keep: Vec<&str> = graph
        .nodes()
        .filter(|id| graph.degree(id) >= min_degree)
        .collect();
    graph.induced_subgraph(keep)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
