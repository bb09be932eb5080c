//! # concept-structure
//!
//! Correlational structure discovery over a concept population.
//!
//! ## Architecture
//!
//! ```text
//!   concepts (level-major)      observation scalars
//!            │                          │
//!            └────────────┬─────────────┘
//!                         ▼
//!              evaluate (concepts × observations)
//!                         ▼
//!              Pearson correlation matrix
//!                         ▼
//!              agglomerative linkage on correlation rows
//!              (Euclidean, single | complete | average)
//!                         ▼
//!              cut at threshold (merge distance ≤ t)
//!                         ▼
//!              StructureReport { correlation, linkage, clusters, hierarchy }
//! ```

#![deny(unsafe_code)]

pub mod cluster;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod linkage;
pub mod types;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use cluster::{cut_tree, hierarchy};
pub use correlation::{evaluate_concepts, pearson_matrix, ZERO_VARIANCE_TOLERANCE};
pub use engine::StructureDiscovery;
pub use error::{StructureError, StructureResult};
pub use linkage::{euclidean, linkage, pairwise_distances};
pub use types::{
    CorrelationMatrix, LinkageMethod, LinkageStep, StructureConfig, StructureReport,
    DEFAULT_CUT_THRESHOLD,
};
