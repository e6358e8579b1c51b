//! One pass of the greedy merge algorithm: consumes a zoom level's node set
//! and its neighbor index, produces the next coarser level's node set.

use crate::matrix::DistanceMatrix;
use crate::node::{Node, NodeArena, NodeId};
use crate::projection::point_to_coordinate;
use crate::types::{Coordinate, Point};

/// Build the node set for zoom `z` from the node set of zoom `z + 1`.
///
/// `index` is the neighbor index over `level_nodes`' points and `radius` is
/// already in planar units for zoom `z`. The pass is single-threaded and
/// order-dependent by design: each anchor's neighbor query is filtered
/// against the nodes that earlier anchors have not yet consumed, so anchors
/// must be visited in the original array order.
pub(crate) fn build_level<T, F>(
    arena: &mut NodeArena<T>,
    level_nodes: &[NodeId],
    index: &DistanceMatrix,
    radius: f64,
    min_points: usize,
    data_factory: &F,
) -> Vec<NodeId>
where
    F: Fn(Coordinate, &[Node<'_, T>]) -> T,
{
    let mut result = Vec::with_capacity(level_nodes.len());
    // The candidate pool: position-keyed active flags instead of a set of
    // node identities.
    let mut active = vec![true; level_nodes.len()];

    for position in 0..level_nodes.len() {
        if !active[position] {
            // Already consumed by an earlier anchor's merge.
            continue;
        }
        active[position] = false;

        let anchor = level_nodes[position];
        let own_count = arena.node(anchor).count();

        // Nearby nodes that are still available at this point of the pass.
        let neighbors: Vec<usize> = index
            .within(position, radius)
            .iter()
            .map(|entry| entry.index)
            .filter(|&neighbor| active[neighbor])
            .collect();

        let total: usize = own_count
            + neighbors
                .iter()
                .map(|&neighbor| arena.node(level_nodes[neighbor]).count())
                .sum::<usize>();

        if total > own_count && total >= min_points {
            // Merge: consume the neighbors and emit one aggregate placed at
            // the count-weighted centroid of everything it contains.
            let mut weighted_x = arena.node(anchor).point().x * own_count as f64;
            let mut weighted_y = arena.node(anchor).point().y * own_count as f64;

            let mut children = Vec::with_capacity(1 + neighbors.len());
            children.push(anchor);
            for &neighbor in &neighbors {
                active[neighbor] = false;

                let node = arena.node(level_nodes[neighbor]);
                let count = node.count() as f64;
                weighted_x += node.point().x * count;
                weighted_y += node.point().y * count;
                children.push(level_nodes[neighbor]);
            }

            let point = Point {
                x: weighted_x / total as f64,
                y: weighted_y / total as f64,
            };
            let coordinate = point_to_coordinate(point);

            let data = {
                let child_nodes: Vec<Node<'_, T>> =
                    children.iter().map(|&id| arena.node(id)).collect();
                data_factory(coordinate, &child_nodes)
            };

            result.push(arena.push_aggregate(point, coordinate, children, data));
        } else {
            // Not enough points to merge: the anchor passes through
            // unclustered, and any neighbors it found are consumed and
            // passed through as well. They never get a turn as anchors at
            // this level, even if a later anchor could have absorbed them.
            result.push(anchor);

            if total > 1 {
                for &neighbor in &neighbors {
                    active[neighbor] = false;
                    result.push(level_nodes[neighbor]);
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Manhattan;
    use crate::types::Rectangle;

    const EXTENT: Rectangle = Rectangle {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    fn seed_level(arena: &mut NodeArena<u32>, points: &[(f64, f64)]) -> Vec<NodeId> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let point = Point { x, y };
                arena.push_leaf(point, point_to_coordinate(point), i as u32)
            })
            .collect()
    }

    fn index_for(arena: &NodeArena<u32>, nodes: &[NodeId]) -> DistanceMatrix {
        let points = nodes.iter().map(|&id| arena.node(id).point()).collect();
        DistanceMatrix::try_new(points, &EXTENT, &Manhattan, 64).unwrap()
    }

    fn synthesize(_: Coordinate, children: &[Node<'_, u32>]) -> u32 {
        1000 + children.iter().map(|child| child.data()).sum::<u32>()
    }

    #[test]
    fn merges_neighbors_into_weighted_centroid() {
        let mut arena = NodeArena::new();
        let nodes = seed_level(&mut arena, &[(0.1, 0.1), (0.2, 0.1), (0.8, 0.9)]);
        let index = index_for(&arena, &nodes);

        let next = build_level(&mut arena, &nodes, &index, 0.15, 2, &synthesize);
        assert_eq!(next.len(), 2);

        let cluster = arena.node(next[0]);
        assert_eq!(cluster.count(), 2);
        assert_eq!(cluster.children().len(), 2);
        assert_eq!(*cluster.data(), 1001, "factory saw both children");
        assert!((cluster.point().x - 0.15).abs() < 1e-9);
        assert!((cluster.point().y - 0.1).abs() < 1e-9);

        // The far point passes through untouched.
        assert_eq!(next[1], nodes[2]);
        assert!(arena.node(next[1]).is_leaf());
    }

    #[test]
    fn centroid_weights_by_contained_leaves() {
        let mut arena = NodeArena::new();
        let nodes = seed_level(&mut arena, &[(0.2, 0.5), (0.2, 0.5), (0.5, 0.5)]);
        let index = index_for(&arena, &nodes);

        // First pass glues the two coincident leaves into a count-2 cluster.
        let mid = build_level(&mut arena, &nodes, &index, 0.01, 2, &synthesize);
        assert_eq!(mid.len(), 2);
        assert_eq!(arena.node(mid[0]).count(), 2);

        // Second pass merges that cluster with the single leaf; the centroid
        // sits twice as close to the heavier side.
        let index = index_for(&arena, &mid);
        let top = build_level(&mut arena, &mid, &index, 0.5, 2, &synthesize);
        assert_eq!(top.len(), 1);
        let root = arena.node(top[0]);
        assert_eq!(root.count(), 3);
        assert!((root.point().x - 0.3).abs() < 1e-9);
    }

    #[test]
    fn below_min_points_consumes_neighbors_unclustered() {
        let mut arena = NodeArena::new();
        let nodes = seed_level(&mut arena, &[(0.5, 0.5), (0.52, 0.5), (0.9, 0.9)]);
        let index = index_for(&arena, &nodes);

        // min_points of 5 cannot be met, so the pair passes through as two
        // standalone nodes, but the neighbor is still consumed.
        let next = build_level(&mut arena, &nodes, &index, 0.1, 5, &synthesize);
        assert_eq!(next, vec![nodes[0], nodes[1], nodes[2]]);
        assert!(next.iter().all(|&id| arena.node(id).is_leaf()));
    }

    #[test]
    fn consumed_neighbors_never_anchor() {
        // Three points in a row, 0.1 apart, radius reaching only the direct
        // neighbor. The first anchor consumes the middle point, so the
        // middle point never anchors a merge with the third; the third ends
        // up alone even though in isolation it had a partner.
        let mut arena = NodeArena::new();
        let nodes = seed_level(&mut arena, &[(0.3, 0.5), (0.4, 0.5), (0.5, 0.5)]);
        let index = index_for(&arena, &nodes);

        let next = build_level(&mut arena, &nodes, &index, 0.11, 2, &synthesize);
        assert_eq!(next.len(), 2);
        assert_eq!(arena.node(next[0]).count(), 2);
        assert_eq!(next[1], nodes[2]);
    }

    #[test]
    fn merged_children_point_at_the_aggregate() {
        let mut arena = NodeArena::new();
        let nodes = seed_level(&mut arena, &[(0.5, 0.5), (0.51, 0.5)]);
        let index = index_for(&arena, &nodes);

        let next = build_level(&mut arena, &nodes, &index, 0.05, 2, &synthesize);
        assert_eq!(next.len(), 1);
        for &leaf in &nodes {
            assert_eq!(arena.node(leaf).parent().unwrap().id(), next[0]);
        }
    }

    #[test]
    fn empty_level_stays_empty() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let index = DistanceMatrix::try_new(vec![], &EXTENT, &Manhattan, 64).unwrap();
        let next = build_level(&mut arena, &[], &index, 0.1, 2, &synthesize);
        assert!(next.is_empty());
    }
}
