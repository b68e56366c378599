/*!
regioncut
=========

**regioncut** is a computational-geometry library representing regions of
1, 2, and 3-dimensional Euclidean space as binary space partitioning (BSP)
trees.

The engine is dimension-agnostic: any type implementing the
[`partition::Hyperplane`] and [`partition::HyperplaneConvexSubset`] traits
can drive a [`partition::BspTree`] or a [`partition::RegionBspTree`].
Euclidean instantiations live in [`shape`]: oriented points on the number
line (1D), lines (2D), and planes (3D). The [`path`] module assembles
unordered boundary pieces into connected polylines.

All geometric comparisons are mediated by a caller-supplied
[`math::Tolerance`]; the engine never hardcodes an epsilon. The library is
single-threaded by design: trees exclusively own their nodes and every
cross-tree operation copies.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

pub extern crate nalgebra as na;

pub mod math;
pub mod partition;
pub mod path;
pub mod shape;
