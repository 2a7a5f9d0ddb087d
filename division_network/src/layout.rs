use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::PI;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::*;
use crate::network::VoteGraph;

pub type Position = (f64, f64);

const SPRING_ITERATIONS: usize = 100;
const JACOBI_SWEEPS: usize = 100;
const JACOBI_TOLERANCE: f64 = 1e-24;

/// Computes a position for every node of the graph.
///
/// The seed only matters for the random and spring layouts.
pub fn compute_layout(
    graph: &VoteGraph,
    algorithm: LayoutAlgorithm,
    seed: u64,
) -> BTreeMap<NodeId, Position> {
    let ids = graph.node_ids();
    let positions: Vec<Position> = match ids.len() {
        0 => vec![],
        1 => vec![(0.0, 0.0)],
        _ => match algorithm {
            LayoutAlgorithm::Circular => circular_layout(ids.len(), 1.0),
            LayoutAlgorithm::Random => {
                let mut rng = StdRng::seed_from_u64(seed);
                random_layout(ids.len(), &mut rng)
            }
            LayoutAlgorithm::Shell => shell_layout(graph, &ids),
            LayoutAlgorithm::Spring => {
                let mut rng = StdRng::seed_from_u64(seed);
                spring_layout(&adjacency_lists(graph, &ids), SPRING_ITERATIONS, &mut rng)
            }
            LayoutAlgorithm::Spectral => spectral_layout(&adjacency_lists(graph, &ids)),
        },
    };
    debug!(
        "compute_layout: {} positions with the {} layout",
        positions.len(),
        algorithm
    );
    ids.into_iter().zip(positions.into_iter()).collect()
}

// The neighbours of every node, by index in `ids`.
fn adjacency_lists(graph: &VoteGraph, ids: &[NodeId]) -> Vec<Vec<usize>> {
    let index: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    ids.iter()
        .map(|id| {
            graph
                .neighbors(*id)
                .filter_map(|n| index.get(n).cloned())
                .collect()
        })
        .collect()
}

fn circular_layout(n: usize, radius: f64) -> Vec<Position> {
    (0..n)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (n as f64);
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn random_layout(n: usize, rng: &mut StdRng) -> Vec<Position> {
    (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect()
}

/// Divisions on an inner circle, legislators on the outer one.
fn shell_layout(graph: &VoteGraph, ids: &[NodeId]) -> Vec<Position> {
    let is_division: Vec<bool> = ids
        .iter()
        .map(|id| graph.node(*id).map(|n| n.is_division()).unwrap_or(false))
        .collect();
    let num_divisions = is_division.iter().filter(|b| **b).count();
    let num_legislators = ids.len() - num_divisions;
    if num_divisions == 0 || num_legislators == 0 {
        return circular_layout(ids.len(), 1.0);
    }

    let inner: Vec<Position> = if num_divisions == 1 {
        vec![(0.0, 0.0)]
    } else {
        circular_layout(num_divisions, 0.5)
    };
    let outer = circular_layout(num_legislators, 1.0);
    let mut inner_it = inner.into_iter();
    let mut outer_it = outer.into_iter();
    is_division
        .iter()
        .map(|d| {
            let p = if *d { inner_it.next() } else { outer_it.next() };
            p.unwrap_or((0.0, 0.0))
        })
        .collect()
}

/// Fruchterman-Reingold force-directed placement.
///
/// Nodes repel each other with a force k²/d and linked nodes attract with
/// d²/k, where k = 1/sqrt(n) is the optimal distance. The displacement of
/// every step is capped by a temperature that cools down linearly.
fn spring_layout(adjacency: &[Vec<usize>], iterations: usize, rng: &mut StdRng) -> Vec<Position> {
    let n = adjacency.len();
    let mut pos = random_layout(n, rng);
    let k = (1.0 / n as f64).sqrt();

    let (min_x, max_x, min_y, max_y) = bounds(&pos);
    let mut t = f64::max(max_x - min_x, max_y - min_y) * 0.1;
    let dt = t / (iterations as f64 + 1.0);

    let linked: Vec<HashSet<usize>> = adjacency
        .iter()
        .map(|ns| ns.iter().cloned().collect())
        .collect();

    for iteration in 0..iterations {
        let mut displacement: Vec<Position> = vec![(0.0, 0.0); n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                let attraction = if linked[i].contains(&j) {
                    distance / k
                } else {
                    0.0
                };
                let f = k * k / (distance * distance) - attraction;
                displacement[i].0 += dx * f;
                displacement[i].1 += dy * f;
            }
        }

        let mut total_move = 0.0;
        for i in 0..n {
            let (dx, dy) = displacement[i];
            let length = (dx * dx + dy * dy).sqrt().max(0.01);
            let step = (dx * t / length, dy * t / length);
            pos[i].0 += step.0;
            pos[i].1 += step.1;
            total_move += (step.0 * step.0 + step.1 * step.1).sqrt();
        }
        t -= dt;
        if total_move / (n as f64) < 1e-4 {
            debug!("spring_layout: converged after {} iterations", iteration + 1);
            break;
        }
    }
    rescale(&mut pos);
    pos
}

/// Places the nodes with the two eigenvectors of the graph laplacian that
/// follow the constant one (the smallest eigenvalues after 0).
fn spectral_layout(adjacency: &[Vec<usize>]) -> Vec<Position> {
    let n = adjacency.len();
    if n < 3 {
        return circular_layout(n, 1.0);
    }
    let (values, vectors) = symmetric_eigen(laplacian(adjacency), n);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    let (cx, cy) = (order[1], order[2]);
    debug!(
        "spectral_layout: eigenvalues {:.6} and {:.6}",
        values[cx], values[cy]
    );

    let mut pos: Vec<Position> = (0..n)
        .map(|i| (vectors[i * n + cx], vectors[i * n + cy]))
        .collect();
    rescale(&mut pos);
    pos
}

// Dense laplacian, row-major.
fn laplacian(adjacency: &[Vec<usize>]) -> Vec<f64> {
    let n = adjacency.len();
    let mut l = vec![0.0; n * n];
    for (i, ns) in adjacency.iter().enumerate() {
        for j in ns.iter() {
            if *j != i {
                l[i * n + j] = -1.0;
            }
        }
    }
    for i in 0..n {
        let degree: f64 = (0..n).filter(|j| *j != i).map(|j| -l[i * n + j]).sum();
        l[i * n + i] = degree;
    }
    l
}

/// Eigen decomposition of a symmetric n×n matrix (row-major) with cyclic
/// Jacobi rotations.
///
/// Returns the eigenvalues and the eigenvectors, as the columns of a
/// row-major matrix: component `i` of eigenvector `j` is at `i * n + j`.
fn symmetric_eigen(mut a: Vec<f64>, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }
    let scale: f64 = a.iter().map(|x| x * x).sum::<f64>().max(f64::MIN_POSITIVE);

    for sweep in 0..JACOBI_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[p * n + q] * a[p * n + q];
            }
        }
        if off <= JACOBI_TOLERANCE * scale {
            debug!("symmetric_eigen: converged after {} sweeps", sweep);
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
                let t = if theta.abs() > 1e150 {
                    0.5 / theta
                } else {
                    theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                // A <- A J
                for k in 0..n {
                    let akp = a[k * n + p];
                    let akq = a[k * n + q];
                    a[k * n + p] = c * akp - s * akq;
                    a[k * n + q] = s * akp + c * akq;
                }
                // A <- Jt A
                for k in 0..n {
                    let apk = a[p * n + k];
                    let aqk = a[q * n + k];
                    a[p * n + k] = c * apk - s * aqk;
                    a[q * n + k] = s * apk + c * aqk;
                }
                // V <- V J
                for k in 0..n {
                    let vkp = v[k * n + p];
                    let vkq = v[k * n + q];
                    v[k * n + p] = c * vkp - s * vkq;
                    v[k * n + q] = s * vkp + c * vkq;
                }
            }
        }
    }
    let values: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
    (values, v)
}

fn bounds(pos: &[Position]) -> (f64, f64, f64, f64) {
    pos.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), (x, y)| {
            (min_x.min(*x), max_x.max(*x), min_y.min(*y), max_y.max(*y))
        },
    )
}

/// Centers the positions on the origin and scales them into [-1, 1].
fn rescale(pos: &mut [Position]) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.1).sum::<f64>() / n;
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= mean_x;
        p.1 -= mean_y;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
}
