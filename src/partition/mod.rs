//! The generic BSP-tree region engine.
//!
//! [`BspTree`] is the dimension-agnostic arena tree; [`RegionBspTree`]
//! layers inside/outside semantics and boolean set operations on top of
//! it. Concrete hyperplane types for Euclidean 1/2/3-space live in
//! [`crate::shape`].

pub use self::hyperplane::{Hyperplane, HyperplaneConvexSubset, Side, Split};
pub use self::merge::{MergeOutcome, MergeRule, Operand};
pub use self::region::{RegionBspTree, RegionCutBoundary, RegionCutRule, RegionLocation};
pub use self::tree::{BspTree, NodeId, Nodes, RejectedCutError};

mod hyperplane;
mod merge;
mod region;
mod tree;
