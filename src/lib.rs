//! # cutgraph
//!
//! Contractible graph structure with the two classic algorithms built
//! on top of it: strongly connected components (Kosaraju) and
//! randomized minimum cut (Karger).
//!
//! ## Quick Start
//!
//! ```rust
//! use cutgraph::{build_graph, estimate_min_cut, find_scc};
//!
//! // Undirected triangle: isolating any vertex cuts two edges, and
//! // no smaller cut disconnects it.
//! let g = build_graph(vec![("a", "b"), ("b", "c"), ("c", "a")], true);
//! let estimate = estimate_min_cut(&g, None);
//! assert_eq!(estimate.cut_size, 2);
//!
//! // Directed one-way path: no two nodes reach each other, so every
//! // component is a singleton.
//! let g = build_graph(vec![("a", "b"), ("b", "c")], false);
//! let sccs = find_scc(&g);
//! assert_eq!(sccs.len(), 3);
//! ```
//!
//! ## Architecture
//!
//! - [`graph`]: arena-based graph with label interning, contraction,
//!   uniform random edge selection, and independent deep copies
//! - [`scc`]: two-pass explicit-stack Kosaraju traversal
//! - [`karger`]: repeated-contraction estimator with a rayon fan-out
//!   over trials, plus the exhaustive oracle used by tests
//!
//! Graphs are built from an abstract edge list ([`build_graph`]); file
//! parsing and display formatting belong to the caller. Min-cut treats
//! the graph as undirected (build with `bidirectional = true`), SCC as
//! directed.
//!
//! ## Determinism
//!
//! Contraction trials are randomized. [`MinCutConfig::seed`] pins the
//! whole run; per-trial RNGs are derived from seed + trial index, so a
//! seeded run returns identical results sequentially and in parallel.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod graph;
pub mod karger;
pub mod scc;

pub use error::{GraphError, Result};
pub use graph::{build_graph, Graph, GraphStats, Label, NodeId};
pub use karger::{
    brute_force_min_cut, estimate_min_cut, recommended_trials, MinCutConfig, MinCutEstimate,
    MinCutEstimator,
};
pub use scc::{find_scc, SccResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module with commonly used types
///
/// ```rust
/// use cutgraph::prelude::*;
///
/// let g = build_graph(vec![(1, 2), (2, 3)], true);
/// assert_eq!(g.node_count(), 3);
/// ```
pub mod prelude {
    //! Commonly used types and entry points

    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{build_graph, Graph, GraphStats, Label, NodeId};
    pub use crate::karger::{
        brute_force_min_cut, estimate_min_cut, recommended_trials, MinCutConfig, MinCutEstimate,
        MinCutEstimator,
    };
    pub use crate::scc::{find_scc, SccResult};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "cutgraph");
    }

    #[test]
    fn test_basic_workflow() {
        let g = build_graph(vec![("a", "b"), ("b", "c"), ("c", "a")], true);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);

        let sccs = find_scc(&g);
        assert_eq!(sccs.len(), 1);

        let estimate = estimate_min_cut(&g, None);
        assert_eq!(estimate.cut_size, 2);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let g: Graph<u8> = build_graph(vec![], true);
        let estimate = estimate_min_cut(&g, Some(1));
        assert_eq!(estimate.cut_size, 0);
    }
}
