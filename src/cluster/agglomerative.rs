// Distance-threshold agglomerative clustering with average linkage.
//
// Operates on a precomputed distance matrix: repeatedly merge the two
// closest clusters (by average inter-cluster distance) until the minimum
// remaining distance exceeds the cutoff. The number of clusters is not
// fixed in advance — it emerges from the cutoff.
//
// Determinism: for equal distances the first (lowest-index) pair found
// wins, and every returned cluster lists its members in ascending input
// order so downstream tie-breaks see input order.
//
// O(n³) worst case over the merge loop, which is fine for the tens to
// low hundreds of keywords a single clustering call sees.

/// Partition items into clusters of indices given a square distance
/// matrix and a distance cutoff.
///
/// Merging continues while the best average-linkage distance is at or
/// below `cutoff`. An empty matrix yields no clusters; a 1×1 matrix
/// yields a single singleton.
pub fn cluster_by_distance(distance: &[Vec<f64>], cutoff: f64) -> Vec<Vec<usize>> {
    let n = distance.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![vec![0]];
    }

    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    while clusters.len() > 1 {
        let mut best_i = 0;
        let mut best_j = 0;
        let mut best_dist = f64::INFINITY;

        // Strict < keeps the earliest pair on ties
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let dist = average_linkage(distance, &clusters[i], &clusters[j]);
                if dist < best_dist {
                    best_dist = dist;
                    best_i = i;
                    best_j = j;
                }
            }
        }

        if best_dist > cutoff {
            break;
        }

        let mut merged = clusters.remove(best_j);
        clusters[best_i].append(&mut merged);
    }

    for cluster in &mut clusters {
        cluster.sort_unstable();
    }

    clusters
}

/// Average pairwise distance between the members of two clusters.
fn average_linkage(distance: &[Vec<f64>], a: &[usize], b: &[usize]) -> f64 {
    let mut sum = 0.0;
    for &i in a {
        for &j in b {
            sum += distance[i][j];
        }
    }
    sum / (a.len() * b.len()) as f64
}
