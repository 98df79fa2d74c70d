//! Randomized minimum cut via Karger's contraction algorithm
//!
//! Each trial deep-copies the input graph and contracts uniformly
//! random edges until two nodes remain; the edges between those two
//! nodes are a candidate cut. The minimum over enough independent
//! trials is the true minimum cut with high probability: a single
//! trial succeeds with probability at least 2 / (V * (V - 1)), so
//! `ceil(V^2 * ln V)` trials push the failure probability below 1/V.
//!
//! This is a probabilistic estimator, never a guaranteed optimum; not
//! finding the true minimum within the trial budget is an accuracy
//! tradeoff, not an error. Each trial is O(V^2) (V contractions, each
//! O(V + E)), so the default budget costs O(V^4 log V) overall --
//! acceptable only for modest graphs. Trials share no mutable state
//! and fan out across rayon workers when [`MinCutConfig::parallel`]
//! is set, with the running minimum taken as a reduction afterwards.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::graph::{Graph, Label, NodeId};

/// Configuration for the min-cut estimator
#[derive(Debug, Clone)]
pub struct MinCutConfig {
    /// Number of independent contraction trials; `None` uses
    /// [`recommended_trials`]. Capping this trades success
    /// probability for time (an external-deadline policy).
    pub trials: Option<usize>,
    /// Seed for reproducible runs; `None` draws one from the thread
    /// RNG. Each trial derives its own RNG from seed + trial index,
    /// so results are deterministic even when run in parallel.
    pub seed: Option<u64>,
    /// Fan trials out across rayon workers
    pub parallel: bool,
}

impl Default for MinCutConfig {
    fn default() -> Self {
        Self {
            trials: None,
            seed: None,
            parallel: true,
        }
    }
}

/// Best cut found across all trials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinCutEstimate<L: Label> {
    /// Smallest number of crossing edges found
    pub cut_size: usize,
    /// The two node groups left by the best trial's final contraction;
    /// `None` for graphs that short-circuited (fewer than two nodes)
    pub partition: Option<(BTreeSet<L>, BTreeSet<L>)>,
    /// Number of trials actually run
    pub trials_run: usize,
    /// Index of the first trial that achieved the best cut
    pub best_trial: usize,
}

/// Standard trial budget: `ceil(V^2 * ln V)`, at least 1.
pub fn recommended_trials(node_count: usize) -> usize {
    if node_count < 2 {
        return 1;
    }
    let v = node_count as f64;
    let trials = (v * v * v.ln()).ceil() as usize;
    trials.max(1)
}

/// Karger randomized contraction estimator.
///
/// Holds a [`MinCutConfig`]; the input graph is only read (every trial
/// works on its own deep copy), so one estimator can serve many graphs.
#[derive(Debug, Clone, Default)]
pub struct MinCutEstimator {
    config: MinCutConfig,
}

struct Trial<L: Label> {
    cut: usize,
    partition: Option<(BTreeSet<L>, BTreeSet<L>)>,
}

impl MinCutEstimator {
    /// Create an estimator with the given configuration
    pub fn new(config: MinCutConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &MinCutConfig {
        &self.config
    }

    /// Estimate the minimum cut of `g` (undirected view: `g` should be
    /// built with mirrored arcs).
    ///
    /// Graphs with fewer than two nodes short-circuit to cut 0 with no
    /// trials; disconnected graphs report cut 0 with an honest
    /// partition. Never fails: probabilistic inexactness is not an
    /// error condition.
    pub fn estimate<L: Label + Send + Sync>(&self, g: &Graph<L>) -> MinCutEstimate<L> {
        if g.node_count() < 2 {
            return MinCutEstimate {
                cut_size: 0,
                partition: None,
                trials_run: 0,
                best_trial: 0,
            };
        }

        let trials = self
            .config
            .trials
            .unwrap_or_else(|| recommended_trials(g.node_count()))
            .max(1);
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        debug!(
            nodes = g.node_count(),
            edges = g.edge_count(),
            trials,
            "starting contraction trials"
        );

        let (best, best_trial) = if self.config.parallel && trials > 1 {
            self.run_parallel(g, trials, base_seed)
        } else {
            self.run_sequential(g, trials, base_seed)
        };

        debug!(cut = best.cut, best_trial, "contraction trials finished");

        MinCutEstimate {
            cut_size: best.cut,
            partition: best.partition,
            trials_run: trials,
            best_trial,
        }
    }

    fn run_sequential<L: Label>(
        &self,
        g: &Graph<L>,
        trials: usize,
        base_seed: u64,
    ) -> (Trial<L>, usize) {
        let mut best: Option<(Trial<L>, usize)> = None;
        for t in 0..trials {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(t as u64));
            let outcome = run_trial(g, &mut rng);
            trace!(trial = t, cut = outcome.cut, "trial finished");
            if best.as_ref().map_or(true, |(b, _)| outcome.cut < b.cut) {
                debug!(trial = t, cut = outcome.cut, "new best cut");
                best = Some((outcome, t));
            }
        }
        // trials >= 1, so the loop ran at least once.
        best.unwrap_or_else(|| {
            (
                Trial {
                    cut: 0,
                    partition: None,
                },
                0,
            )
        })
    }

    fn run_parallel<L: Label + Send + Sync>(
        &self,
        g: &Graph<L>,
        trials: usize,
        base_seed: u64,
    ) -> (Trial<L>, usize) {
        (0..trials)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(t as u64));
                let outcome = run_trial(g, &mut rng);
                trace!(trial = t, cut = outcome.cut, "trial finished");
                (outcome, t)
            })
            // Tie-break on trial index so parallel runs are
            // deterministic for a given seed.
            .min_by(|(a, ta), (b, tb)| (a.cut, ta).cmp(&(b.cut, tb)))
            .unwrap_or_else(|| {
                (
                    Trial {
                        cut: 0,
                        partition: None,
                    },
                    0,
                )
            })
    }
}

/// One contraction trial on a private deep copy of `g`.
fn run_trial<L: Label>(g: &Graph<L>, rng: &mut StdRng) -> Trial<L> {
    let mut gc = g.clone();
    while gc.node_count() > 2 {
        let (u, v) = match gc.pick_random_edge(rng) {
            Ok(edge) => edge,
            // Out of arcs with more than two nodes left: the input
            // was disconnected, so the cut is empty.
            Err(_) => break,
        };
        // Endpoints of a freshly picked arc are alive by construction.
        if gc.contract_nodes(u, v).is_err() {
            break;
        }
    }
    Trial {
        cut: gc.edge_count(),
        partition: final_partition(&gc),
    }
}

fn final_partition<L: Label>(gc: &Graph<L>) -> Option<(BTreeSet<L>, BTreeSet<L>)> {
    let ids: Vec<NodeId> = gc.nodes().collect();
    match ids.as_slice() {
        [a, b] => Some((gc.labels_of(*a)?.clone(), gc.labels_of(*b)?.clone())),
        _ => None,
    }
}

/// Exact minimum cut by exhaustive bipartition, O(2^V * V^2).
///
/// The correctness oracle for the randomized estimator; only usable on
/// small graphs (about 20 nodes at most). Counts each mirrored arc
/// pair once, so parallel edges each contribute to the cut.
pub fn brute_force_min_cut<L: Label>(g: &Graph<L>) -> usize {
    let ids: Vec<NodeId> = g.nodes().collect();
    let n = ids.len();
    if n < 2 {
        return 0;
    }
    debug_assert!(n < 64, "bipartition enumeration needs n < 64");

    let index_of: std::collections::HashMap<NodeId, usize> =
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut best = usize::MAX;
    for mask in 1..(1u64 << n) - 1 {
        let mut crossing_arcs = 0usize;
        for (i, &u) in ids.iter().enumerate() {
            let side = (mask >> i) & 1;
            for dest in g.neighbors(u) {
                if (mask >> index_of[dest]) & 1 != side {
                    crossing_arcs += 1;
                }
            }
        }
        best = best.min(crossing_arcs / 2);
    }
    best
}

/// Estimate the minimum cut of `g`, optionally overriding the trial
/// budget; see [`MinCutEstimator`].
pub fn estimate_min_cut<L: Label + Send + Sync>(
    g: &Graph<L>,
    trials: Option<usize>,
) -> MinCutEstimate<L> {
    MinCutEstimator::new(MinCutConfig {
        trials,
        ..MinCutConfig::default()
    })
    .estimate(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;

    fn seeded(trials: Option<usize>, seed: u64) -> MinCutEstimator {
        MinCutEstimator::new(MinCutConfig {
            trials,
            seed: Some(seed),
            parallel: false,
        })
    }

    #[test]
    fn test_recommended_trials() {
        assert_eq!(recommended_trials(0), 1);
        assert_eq!(recommended_trials(1), 1);
        // 4 * ln(2) = 2.77 -> 3
        assert_eq!(recommended_trials(2), 3);
        // 16 * ln(4) = 22.18 -> 23
        assert_eq!(recommended_trials(4), 23);
    }

    #[test]
    fn test_empty_graph_short_circuits() {
        let g: Graph<u32> = Graph::new();
        let estimate = estimate_min_cut(&g, None);
        assert_eq!(estimate.cut_size, 0);
        assert_eq!(estimate.trials_run, 0);
        assert!(estimate.partition.is_none());
    }

    #[test]
    fn test_single_node_short_circuits() {
        let mut g = Graph::new();
        g.add_node(1);
        let estimate = estimate_min_cut(&g, None);
        assert_eq!(estimate.cut_size, 0);
        assert_eq!(estimate.trials_run, 0);
    }

    #[test]
    fn test_two_nodes_parallel_edges() {
        // No contraction happens; the cut is just the edge bundle.
        let g = build_graph(vec![(1, 2), (1, 2), (1, 2)], true);
        let estimate = seeded(Some(1), 9).estimate(&g);
        assert_eq!(estimate.cut_size, 3);
        let (a, b) = estimate.partition.unwrap();
        assert_eq!(a.len() + b.len(), 2);
    }

    #[test]
    fn test_triangle_cut_is_two() {
        // Any contraction sequence on a cycle yields the exact cut,
        // so a single trial suffices.
        let g = build_graph(vec![("a", "b"), ("b", "c"), ("c", "a")], true);
        let estimate = seeded(Some(1), 1).estimate(&g);
        assert_eq!(estimate.cut_size, 2);
    }

    #[test]
    fn test_path_cut_is_one() {
        let g = build_graph(vec![("a", "b"), ("b", "c")], true);
        let estimate = seeded(Some(1), 1).estimate(&g);
        assert_eq!(estimate.cut_size, 1);
    }

    #[test]
    fn test_disconnected_graph_cut_is_zero() {
        let g = build_graph(vec![(1, 2), (2, 3), (4, 5)], true);
        let estimate = seeded(None, 5).estimate(&g);
        assert_eq!(estimate.cut_size, 0);
    }

    #[test]
    fn test_partition_covers_all_labels() {
        let g = build_graph(vec![(1, 2), (2, 3), (3, 4), (4, 1)], true);
        let estimate = seeded(None, 11).estimate(&g);
        let (a, b) = estimate.partition.unwrap();
        assert!(a.is_disjoint(&b));
        let union: BTreeSet<i32> = a.union(&b).copied().collect();
        assert_eq!(union, BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let g = build_graph(
            vec![(1, 2), (2, 3), (3, 4), (4, 1), (1, 3), (2, 4)],
            true,
        );
        let config = MinCutConfig {
            trials: Some(40),
            seed: Some(77),
            parallel: true,
        };
        let first = MinCutEstimator::new(config.clone()).estimate(&g);
        let second = MinCutEstimator::new(config).estimate(&g);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let g = build_graph(vec![(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)], true);
        let seq = MinCutEstimator::new(MinCutConfig {
            trials: Some(60),
            seed: Some(3),
            parallel: false,
        })
        .estimate(&g);
        let par = MinCutEstimator::new(MinCutConfig {
            trials: Some(60),
            seed: Some(3),
            parallel: true,
        })
        .estimate(&g);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_brute_force_fixtures() {
        let triangle = build_graph(vec![(1, 2), (2, 3), (3, 1)], true);
        assert_eq!(brute_force_min_cut(&triangle), 2);

        let square = build_graph(vec![(1, 2), (2, 3), (3, 4), (4, 1)], true);
        assert_eq!(brute_force_min_cut(&square), 2);

        let path = build_graph(vec![(1, 2), (2, 3)], true);
        assert_eq!(brute_force_min_cut(&path), 1);

        let disconnected = build_graph(vec![(1, 2), (3, 4)], true);
        assert_eq!(brute_force_min_cut(&disconnected), 0);

        let single: Graph<u32> = build_graph(vec![], true);
        assert_eq!(brute_force_min_cut(&single), 0);
    }

    #[test]
    fn test_brute_force_counts_parallel_edges() {
        let g = build_graph(vec![(1, 2), (1, 2), (2, 3)], true);
        assert_eq!(brute_force_min_cut(&g), 1);

        let g = build_graph(vec![(1, 2), (1, 2)], true);
        assert_eq!(brute_force_min_cut(&g), 2);
    }
}
