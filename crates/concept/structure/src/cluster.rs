//! Cutting a dendrogram into flat clusters.

use std::collections::BTreeMap;

use crate::types::LinkageStep;

/// Flat cluster assignment for `leaves` points.
///
/// Every merge with `distance <= threshold` joins its two sides. Cluster ids
/// start at 1 and are numbered by each cluster's lowest member index.
pub fn cut_tree(steps: &[LinkageStep], leaves: usize, threshold: f64) -> Vec<usize> {
    // union-find over leaves plus the internal nodes created by each step
    let mut parent: Vec<usize> = (0..leaves + steps.len()).collect();

    fn root(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }

    for (k, step) in steps.iter().enumerate() {
        let merged = leaves + k;
        if step.distance <= threshold {
            let l = root(&mut parent, step.left);
            let r = root(&mut parent, step.right);
            parent[l] = merged;
            parent[r] = merged;
        }
    }

    let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
    (0..leaves)
        .map(|leaf| {
            let r = root(&mut parent, leaf);
            let next = ids.len() + 1;
            *ids.entry(r).or_insert(next)
        })
        .collect()
}

/// Cluster id → ascending member indices.
pub fn hierarchy(clusters: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &cluster) in clusters.iter().enumerate() {
        map.entry(cluster).or_default().push(index);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(left: usize, right: usize, distance: f64, size: usize) -> LinkageStep {
        LinkageStep {
            left,
            right,
            distance,
            size,
        }
    }

    #[test]
    fn cut_keeps_merges_at_or_below_threshold() {
        // leaves 0..4: {1,3} at 0.2, {0,2} at 0.5, everything at 0.9
        let steps = vec![step(1, 3, 0.2, 2), step(0, 2, 0.5, 2), step(4, 5, 0.9, 4)];
        assert_eq!(cut_tree(&steps, 4, 0.5), vec![1, 2, 1, 2]);
        assert_eq!(cut_tree(&steps, 4, 0.3), vec![1, 2, 3, 2]);
        assert_eq!(cut_tree(&steps, 4, 1.0), vec![1, 1, 1, 1]);
        assert_eq!(cut_tree(&steps, 4, 0.0), vec![1, 2, 3, 4]);
    }

    #[test]
    fn hierarchy_groups_members() {
        let h = hierarchy(&[1, 2, 1, 3]);
        assert_eq!(h.len(), 3);
        assert_eq!(h[&1], vec![0, 2]);
        assert_eq!(h[&2], vec![1]);
        assert_eq!(h[&3], vec![3]);
    }

    #[test]
    fn no_leaves_no_clusters() {
        assert!(cut_tree(&[], 0, 0.5).is_empty());
        assert_eq!(cut_tree(&[], 1, 0.5), vec![1]);
    }
}
