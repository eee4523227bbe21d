use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::ir::Edge;

pub(super) struct Ranking {
    pub ranks: HashMap<String, usize>,
    /// Indices into the ranked edge slice that point backwards in the chosen
    /// topological order.
    pub back_edges: HashSet<usize>,
}

/// Neighbours split by flow: `upper` lists a node's neighbours in earlier
/// ranks, `lower` those in later ranks.
pub(super) struct Adjacency {
    pub upper: HashMap<String, Vec<String>>,
    pub lower: HashMap<String, Vec<String>>,
}

impl Adjacency {
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

impl Ranking {
    pub fn max_rank(&self) -> usize {
        self.ranks.values().copied().max().unwrap_or(0)
    }

    /// Nodes grouped by rank, each bucket in declaration order.
    pub fn buckets(&self, node_ids: &[String]) -> Vec<Vec<String>> {
        if node_ids.is_empty() {
            return Vec::new();
        }
        let mut rank_nodes: Vec<Vec<String>> = vec![Vec::new(); self.max_rank() + 1];
        for node_id in node_ids {
            let rank = *self.ranks.get(node_id).unwrap_or(&0);
            if let Some(bucket) = rank_nodes.get_mut(rank) {
                bucket.push(node_id.clone());
            }
        }
        rank_nodes
    }

    /// The edge oriented along the flow, or `None` when both ends share a rank.
    pub fn oriented<'a>(&self, idx: usize, edge: &'a Edge) -> Option<(&'a str, &'a str)> {
        let from_rank = self.ranks.get(&edge.from).copied().unwrap_or(0);
        let to_rank = self.ranks.get(&edge.to).copied().unwrap_or(0);
        if from_rank == to_rank {
            return None;
        }
        if self.back_edges.contains(&idx) || from_rank > to_rank {
            Some((edge.to.as_str(), edge.from.as_str()))
        } else {
            Some((edge.from.as_str(), edge.to.as_str()))
        }
    }

    /// Upper/lower neighbour lists with back-edges flipped, so reversed edges
    /// still pull their ends together during ordering.
    pub fn adjacency(&self, edges: &[Edge]) -> Adjacency {
        let mut adjacency = Adjacency {
            upper: HashMap::new(),
            lower: HashMap::new(),
        };
        for (idx, edge) in edges.iter().enumerate() {
            let Some((upper, lower)) = self.oriented(idx, edge) else {
                continue;
            };
            adjacency
                .lower
                .entry(upper.to_string())
                .or_default()
                .push(lower.to_string());
            adjacency
                .upper
                .entry(lower.to_string())
                .or_default()
                .push(upper.to_string());
        }
        adjacency
    }
}

/// Longest-path ranking over a topological order. When a cycle stalls the
/// order, the next source is the earliest-declared pending node of a strongly
/// connected component that no pending node outside it feeds into. Only its
/// incoming edges from inside that component become back-edges, so every edge
/// that is not part of a cycle keeps increasing rank.
pub(super) fn compute_ranks(
    node_ids: &[String],
    edges: &[Edge],
    node_order: &HashMap<String, usize>,
) -> Ranking {
    let set: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut preds: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut indeg: HashMap<&str, usize> = node_ids.iter().map(|id| (id.as_str(), 0)).collect();

    for edge in edges {
        if !set.contains(edge.from.as_str()) || !set.contains(edge.to.as_str()) {
            continue;
        }
        adj.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        preds.entry(edge.to.as_str()).or_default().push(edge.from.as_str());
        *indeg.entry(edge.to.as_str()).or_default() += 1;
    }

    let order_key = |id: &str| -> usize { node_order.get(id).copied().unwrap_or(usize::MAX) };

    let mut ready: BinaryHeap<Reverse<(usize, &str)>> = BinaryHeap::new();
    for id in node_ids {
        if indeg.get(id.as_str()).copied().unwrap_or(0) == 0 {
            ready.push(Reverse((order_key(id.as_str()), id.as_str())));
        }
    }

    let mut components: Option<HashMap<&str, usize>> = None;
    let mut order: Vec<&str> = Vec::with_capacity(set.len());
    let mut processed: HashSet<&str> = HashSet::new();
    loop {
        while let Some(Reverse((_key, id))) = ready.pop() {
            if !processed.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(nexts) = adj.get(id) {
                for next in nexts {
                    if processed.contains(next) {
                        continue;
                    }
                    if let Some(deg) = indeg.get_mut(next) {
                        *deg = deg.saturating_sub(1);
                        if *deg == 0 {
                            ready.push(Reverse((order_key(*next), *next)));
                        }
                    }
                }
            }
        }

        if processed.len() >= set.len() {
            break;
        }

        let components = components.get_or_insert_with(|| strongly_connected(node_ids, &adj));
        let pending: Vec<&str> = node_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !processed.contains(id))
            .collect();
        let fed_from_outside: HashSet<usize> = pending
            .iter()
            .filter(|id| {
                let own = components.get(**id);
                preds
                    .get(**id)
                    .into_iter()
                    .flatten()
                    .any(|pred| !processed.contains(pred) && components.get(pred) != own)
            })
            .filter_map(|id| components.get(*id).copied())
            .collect();
        let entry = pending
            .iter()
            .copied()
            .filter(|id| {
                components
                    .get(id)
                    .is_some_and(|component| !fed_from_outside.contains(component))
            })
            .min_by_key(|id| order_key(*id))
            .or_else(|| pending.first().copied());
        match entry {
            Some(id) => {
                tracing::trace!(node = id, "breaking cycle");
                ready.push(Reverse((order_key(id), id)));
            }
            None => break,
        }
    }

    let order_index: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx))
        .collect();

    let mut back_edges = HashSet::new();
    for (idx, edge) in edges.iter().enumerate() {
        let (Some(from_idx), Some(to_idx)) = (
            order_index.get(edge.from.as_str()),
            order_index.get(edge.to.as_str()),
        ) else {
            continue;
        };
        if to_idx <= from_idx {
            back_edges.insert(idx);
        }
    }

    let mut ranks: HashMap<String, usize> = HashMap::with_capacity(order.len());
    for node in &order {
        let rank = *ranks.entry(node.to_string()).or_insert(0);
        let Some(nexts) = adj.get(node) else {
            continue;
        };
        let from_idx = order_index[node];
        for next in nexts {
            let to_idx = order_index.get(next).copied().unwrap_or(from_idx);
            if to_idx <= from_idx {
                continue;
            }
            let entry = ranks.entry(next.to_string()).or_insert(0);
            *entry = (*entry).max(rank + 1);
        }
    }

    Ranking { ranks, back_edges }
}

/// Tarjan's algorithm with an explicit frame stack. Returns the component
/// index of every node.
fn strongly_connected<'a>(
    node_ids: &'a [String],
    adj: &HashMap<&'a str, Vec<&'a str>>,
) -> HashMap<&'a str, usize> {
    let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(node_ids.len());
    let mut low: HashMap<&'a str, usize> = HashMap::with_capacity(node_ids.len());
    let mut on_stack: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = Vec::new();
    let mut component: HashMap<&'a str, usize> = HashMap::with_capacity(node_ids.len());
    let mut next_index = 0usize;
    let mut next_component = 0usize;

    for root in node_ids {
        let root = root.as_str();
        if index.contains_key(root) {
            continue;
        }
        index.insert(root, next_index);
        low.insert(root, next_index);
        next_index += 1;
        stack.push(root);
        on_stack.insert(root);
        let mut frames: Vec<(&'a str, usize)> = vec![(root, 0)];

        while let Some(&(node, cursor)) = frames.last() {
            let children: &[&'a str] = adj.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&child) = children.get(cursor) {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                if !index.contains_key(child) {
                    index.insert(child, next_index);
                    low.insert(child, next_index);
                    next_index += 1;
                    stack.push(child);
                    on_stack.insert(child);
                    frames.push((child, 0));
                } else if on_stack.contains(child) {
                    let child_index = index[child];
                    if let Some(node_low) = low.get_mut(node) {
                        *node_low = (*node_low).min(child_index);
                    }
                }
                continue;
            }

            frames.pop();
            let node_low = low[node];
            if let Some(&(parent, _)) = frames.last() {
                if let Some(parent_low) = low.get_mut(parent) {
                    *parent_low = (*parent_low).min(node_low);
                }
            }
            if node_low == index[node] {
                while let Some(member) = stack.pop() {
                    on_stack.remove(member);
                    component.insert(member, next_component);
                    if member == node {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }
    component
}

/// Median-heuristic crossing reduction with alternating down/up sweeps. The
/// ordering with the fewest crossings seen is kept.
pub(super) fn order_rank_nodes(
    rank_nodes: &mut [Vec<String>],
    edges: &[Edge],
    ranking: &Ranking,
    passes: usize,
) {
    if rank_nodes.len() <= 1 {
        return;
    }
    let adjacency = ranking.adjacency(edges);
    if adjacency.is_empty() {
        return;
    }

    let mut positions = slot_positions(rank_nodes);
    let mut best = rank_nodes.to_vec();
    let mut best_crossings = count_crossings(rank_nodes, &adjacency.lower);
    for pass in 0..passes.max(1) {
        if best_crossings == 0 {
            break;
        }
        for rank in 1..rank_nodes.len() {
            reorder_by_median(&mut rank_nodes[rank], &adjacency.upper, &mut positions);
        }
        for rank in (0..rank_nodes.len() - 1).rev() {
            reorder_by_median(&mut rank_nodes[rank], &adjacency.lower, &mut positions);
        }
        let crossings = count_crossings(rank_nodes, &adjacency.lower);
        tracing::trace!(pass, crossings, "ordering sweep");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = rank_nodes.to_vec();
        }
    }
    rank_nodes.clone_from_slice(&best);
}

/// Each node's slot within its own rank.
fn slot_positions(rank_nodes: &[Vec<String>]) -> HashMap<String, usize> {
    rank_nodes
        .iter()
        .flat_map(|bucket| bucket.iter().enumerate().map(|(slot, id)| (id.clone(), slot)))
        .collect()
}

/// Stable sort of one rank by the median slot of each node's neighbours.
/// Nodes without placed neighbours keep their current slot as the key.
fn reorder_by_median(
    bucket: &mut Vec<String>,
    neighbors: &HashMap<String, Vec<String>>,
    positions: &mut HashMap<String, usize>,
) {
    if bucket.len() <= 1 {
        return;
    }
    let mut keyed: Vec<(f32, String)> = bucket
        .drain(..)
        .enumerate()
        .map(|(slot, id)| {
            let slots: Vec<usize> = neighbors
                .get(&id)
                .into_iter()
                .flatten()
                .filter_map(|neighbor| positions.get(neighbor).copied())
                .collect();
            (median(slots).unwrap_or(slot as f32), id)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (slot, (_, id)) in keyed.into_iter().enumerate() {
        positions.insert(id.clone(), slot);
        bucket.push(id);
    }
}

fn median(mut slots: Vec<usize>) -> Option<f32> {
    if slots.is_empty() {
        return None;
    }
    slots.sort_unstable();
    let mid = slots.len() / 2;
    if slots.len() % 2 == 1 {
        Some(slots[mid] as f32)
    } else {
        Some((slots[mid - 1] + slots[mid]) as f32 / 2.0)
    }
}

/// Crossings between edges joining adjacent ranks. Edges spanning more than
/// one rank are not counted.
pub(super) fn count_crossings(
    rank_nodes: &[Vec<String>],
    outgoing: &HashMap<String, Vec<String>>,
) -> usize {
    let mut total = 0usize;
    for pair in rank_nodes.windows(2) {
        let lower_pos: HashMap<&str, usize> = pair[1]
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), idx))
            .collect();
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for (upper_idx, upper) in pair[0].iter().enumerate() {
            for target in outgoing.get(upper).into_iter().flatten() {
                if let Some(&lower_idx) = lower_pos.get(target.as_str()) {
                    segments.push((upper_idx, lower_idx));
                }
            }
        }
        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a0, a1) = segments[i];
                let (b0, b1) = segments[j];
                if (a0 < b0 && a1 > b1) || (a0 > b0 && a1 < b1) {
                    total += 1;
                }
            }
        }
    }
    total
}
