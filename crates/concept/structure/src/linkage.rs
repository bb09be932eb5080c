//! Agglomerative hierarchical clustering.
//!
//! Each input row is a point; distances are Euclidean between rows. Clusters
//! are merged closest-first and inter-cluster distances are maintained with
//! the Lance–Williams update of the chosen [`LinkageMethod`]. Ties go to the
//! pair that comes first in cluster order.

use crate::error::{StructureError, StructureResult};
use crate::types::{LinkageMethod, LinkageStep};

/// Euclidean distance between two equally long rows.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Full pairwise distance matrix between the rows of `points`.
pub fn pairwise_distances(points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut d = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..i {
            let v = euclidean(&points[i], &points[j]);
            d[i][j] = v;
            d[j][i] = v;
        }
    }
    d
}

/// Cluster the rows of `points`, returning `n - 1` merge steps.
///
/// Step `k` creates cluster id `n + k`; `left < right` in every step.
pub fn linkage(points: &[Vec<f64>], method: LinkageMethod) -> StructureResult<Vec<LinkageStep>> {
    let n = points.len();
    if let Some(row) = points.iter().find(|r| r.iter().any(|v| !v.is_finite())) {
        return Err(StructureError::Linkage(format!(
            "non-finite coordinate in point {:?}",
            row
        )));
    }

    let mut dist = pairwise_distances(points);
    // slot -> (cluster id, leaf count); a merged cluster takes the lower slot
    let mut active: Vec<(usize, usize)> = (0..n).map(|i| (i, 1)).collect();
    let mut steps = Vec::with_capacity(n.saturating_sub(1));

    while active.len() > 1 {
        let mut best = (0, 1, f64::INFINITY);
        for a in 0..active.len() {
            for b in (a + 1)..active.len() {
                if dist[a][b] < best.2 {
                    best = (a, b, dist[a][b]);
                }
            }
        }
        let (a, b, distance) = best;
        if !distance.is_finite() {
            return Err(StructureError::Linkage(format!(
                "no finite merge distance left with {} clusters",
                active.len()
            )));
        }

        let (id_a, size_a) = active[a];
        let (id_b, size_b) = active[b];
        for k in 0..active.len() {
            if k != a && k != b {
                let updated = method.update(dist[a][k], dist[b][k], size_a, size_b);
                dist[a][k] = updated;
                dist[k][a] = updated;
            }
        }
        dist.remove(b);
        for row in dist.iter_mut() {
            row.remove(b);
        }

        steps.push(LinkageStep {
            left: id_a.min(id_b),
            right: id_a.max(id_b),
            distance,
            size: size_a + size_b,
        });
        active[a] = (n + steps.len() - 1, size_a + size_b);
        active.remove(b);
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|x| vec![*x]).collect()
    }

    #[test]
    fn merges_closest_first_with_scipy_ids() {
        let steps = linkage(&points(&[0.0, 0.1, 5.0, 5.3]), LinkageMethod::Single).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!((steps[0].left, steps[0].right), (0, 1));
        assert!((steps[0].distance - 0.1).abs() < 1e-12);
        assert_eq!(steps[0].size, 2);
        assert_eq!((steps[1].left, steps[1].right), (2, 3));
        assert_eq!((steps[2].left, steps[2].right), (4, 5));
        assert!((steps[2].distance - 4.9).abs() < 1e-12);
        assert_eq!(steps[2].size, 4);
    }

    #[test]
    fn complete_and_average_use_far_and_mean_distances() {
        let pts = points(&[0.0, 1.0, 3.0]);
        let complete = linkage(&pts, LinkageMethod::Complete).unwrap();
        assert!((complete[1].distance - 3.0).abs() < 1e-12);
        let average = linkage(&pts, LinkageMethod::Average).unwrap();
        assert!((average[1].distance - 2.5).abs() < 1e-12);
        let single = linkage(&pts, LinkageMethod::Single).unwrap();
        assert!((single[1].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distances_are_monotone() {
        let pts = points(&[0.0, 0.4, 1.1, 2.9, 3.0, 7.5, 8.0]);
        for method in [LinkageMethod::Single, LinkageMethod::Complete, LinkageMethod::Average] {
            let steps = linkage(&pts, method).unwrap();
            assert_eq!(steps.len(), pts.len() - 1);
            assert!(steps.windows(2).all(|w| w[0].distance <= w[1].distance + 1e-12));
            assert_eq!(steps.last().unwrap().size, pts.len());
        }
    }

    #[test]
    fn trivial_inputs() {
        assert!(linkage(&[], LinkageMethod::Single).unwrap().is_empty());
        assert!(linkage(&points(&[1.0]), LinkageMethod::Single).unwrap().is_empty());
        assert!(linkage(&points(&[1.0, f64::NAN]), LinkageMethod::Single).is_err());
    }
}
