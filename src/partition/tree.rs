//! Arena-backed binary space partitioning tree.

use smallvec::{smallvec, SmallVec};

use crate::math::Tolerance;
use crate::partition::{Hyperplane, HyperplaneConvexSubset, Side, Split};

/// The point type of the space a subset type partitions.
pub(crate) type PointOf<C> =
    <<C as HyperplaneConvexSubset>::Hyperplane as Hyperplane>::Point;

/// The index of one node of a [`BspTree`].
///
/// Node ids are only meaningful for the tree that produced them. Clearing a
/// cut invalidates the ids of the discarded subtree; dereferencing a stale
/// id yields unspecified (but memory-safe) results.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn invalid() -> Self {
        NodeId(u32::MAX)
    }

    pub(crate) fn is_invalid(&self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Error returned by [`BspTree::try_cut`] when the requested cut does not pass
/// through the interior of the node's cell.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("the cutting hyperplane does not pass through the interior of the node's cell")]
pub struct RejectedCutError;

#[derive(Clone, Debug)]
pub(crate) struct CutData<C> {
    pub cut: C,
    pub minus: NodeId,
    pub plus: NodeId,
}

/// A node is a leaf exactly when `cut` is `None`; the cut and the child
/// pair always exist together.
#[derive(Clone, Debug)]
pub(crate) struct NodeData<C, T> {
    pub parent: NodeId,
    pub cut: Option<CutData<C>>,
    pub value: T,
}

/// A binary space partitioning tree over a Euclidean space.
///
/// Nodes live in an arena `Vec` and are addressed by [`NodeId`] handles;
/// parent/child relationships are ids rather than pointers. Internal nodes
/// carry a *cut*: a convex subset of a hyperplane, trimmed to the node's
/// cell by every ancestor cut. Leaves carry no cut.
///
/// Every node stores a value of type `T`. Splitting a leaf initializes both
/// children with clones of the parent's value; region trees overwrite these
/// according to their cut rule.
///
/// A tree exclusively owns its nodes: there is no sharing across trees and
/// all cross-tree operations (merging, splitting, subtree import) copy.
/// This type is not thread-safe for concurrent mutation; it is meant to be
/// used from a single thread.
#[derive(Clone, Debug)]
pub struct BspTree<C: HyperplaneConvexSubset, T> {
    nodes: Vec<NodeData<C, T>>,
    root: NodeId,
    tol: Tolerance,
}

impl<C: HyperplaneConvexSubset, T: Clone> BspTree<C, T> {
    /// Creates a tree consisting of a single leaf carrying `value`.
    ///
    /// All geometric comparisons performed by this tree go through `tol`.
    pub fn new(tol: Tolerance, value: T) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId::invalid(),
            tol,
        };
        tree.root = tree.push_node(NodeId::invalid(), value);
        tree
    }

    /// The tolerance context used by this tree.
    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// The root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns `true` if `node` has no cut (and therefore no children).
    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.idx()].cut.is_none()
    }

    /// The value stored on `node`.
    #[inline]
    pub fn value(&self, node: NodeId) -> &T {
        &self.nodes[node.idx()].value
    }

    /// Overwrites the value stored on `node`.
    #[inline]
    pub fn set_value(&mut self, node: NodeId, value: T) {
        self.nodes[node.idx()].value = value;
    }

    /// The parent of `node`, or `None` for the root.
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let p = self.nodes[node.idx()].parent;
        (!p.is_invalid()).then_some(p)
    }

    /// The cut of `node`, or `None` if it is a leaf.
    #[inline]
    pub fn cut(&self, node: NodeId) -> Option<&C> {
        self.nodes[node.idx()].cut.as_ref().map(|c| &c.cut)
    }

    /// The minus-side child of `node`, or `None` if it is a leaf.
    #[inline]
    pub fn minus_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.idx()].cut.as_ref().map(|c| c.minus)
    }

    /// The plus-side child of `node`, or `None` if it is a leaf.
    #[inline]
    pub fn plus_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.idx()].cut.as_ref().map(|c| c.plus)
    }

    /// The number of nodes reachable from the root.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over all nodes in depth-first order, visiting each internal
    /// node before its minus subtree, and the minus subtree before the plus
    /// subtree.
    ///
    /// The traversal is lazy and restartable; each call starts a fresh
    /// walk.
    pub fn iter(&self) -> Nodes<'_, C, T> {
        Nodes {
            tree: self,
            stack: smallvec![self.root],
        }
    }

    /// Finds the leaf node whose cell contains `pt`.
    ///
    /// The walk classifies `pt` against each internal node's cut hyperplane
    /// and descends accordingly; points lying on a cut (within tolerance)
    /// descend to the minus child so that the result is always a leaf.
    pub fn find_node(&self, pt: &PointOf<C>) -> NodeId {
        let mut node = self.root;
        while let Some(cut_data) = &self.nodes[node.idx()].cut {
            node = match cut_data.cut.hyperplane().classify(pt, &self.tol) {
                Side::Plus => cut_data.plus,
                Side::Minus | Side::On => cut_data.minus,
            };
        }
        node
    }

    /// Attempts to cut `node` with `hyperplane`.
    ///
    /// The hyperplane's span is trimmed by every ancestor cut. If the
    /// trimmed portion is empty (the hyperplane does not pass through the
    /// node's cell, or coincides with an existing boundary), this returns
    /// `false` and leaves the node **unchanged** — including any
    /// pre-existing children. Otherwise any previous subtree is discarded,
    /// the trimmed subset becomes the node's cut, two fresh leaf children
    /// are created (each cloning the node's value), and `true` is
    /// returned.
    pub fn insert_cut(&mut self, node: NodeId, hyperplane: &C::Hyperplane) -> bool {
        match self.trim_to_cell(node, hyperplane.span()) {
            Some(trimmed) => {
                self.clear_cut(node);
                self.set_cut(node, trimmed);
                true
            }
            None => false,
        }
    }

    /// Chaining form of [`insert_cut`](Self::insert_cut): cuts `node` and
    /// returns its id, or an error if the cut was rejected.
    pub fn try_cut(
        &mut self,
        node: NodeId,
        hyperplane: &C::Hyperplane,
    ) -> Result<NodeId, RejectedCutError> {
        if self.insert_cut(node, hyperplane) {
            Ok(node)
        } else {
            Err(RejectedCutError)
        }
    }

    /// Removes the cut of `node`, reverting it to a leaf.
    ///
    /// The discarded subtree's ids become invalid. Returns `true` if a cut
    /// was actually removed.
    pub fn clear_cut(&mut self, node: NodeId) -> bool {
        self.nodes[node.idx()].cut.take().is_some()
    }

    /// Inserts a convex boundary subset into the tree.
    ///
    /// The subset is recursively split along existing cuts, each piece
    /// descending into the corresponding subtree; leaves reached by a
    /// non-degenerate piece are cut by the subset's hyperplane trimmed to
    /// the leaf cell. Pieces lying on an existing cut hyperplane are
    /// absorbed. Non-convex or disjoint inputs must be decomposed into
    /// convex pieces by the caller before insertion.
    pub fn insert(&mut self, subset: &C) {
        let _ = self.insert_collecting(subset);
    }

    /// Like [`insert`](Self::insert), returning the ids of the nodes that
    /// received a new cut.
    pub(crate) fn insert_collecting(&mut self, subset: &C) -> Vec<NodeId> {
        let mut new_cuts = Vec::new();
        if !subset.is_degenerate(&self.tol) {
            let span = subset.hyperplane().span();
            self.insert_recursive(self.root, subset.clone(), span, &mut new_cuts);
        }
        new_cuts
    }

    fn insert_recursive(
        &mut self,
        node: NodeId,
        piece: C,
        trimmed: C,
        new_cuts: &mut Vec<NodeId>,
    ) {
        let Some(cut_data) = &self.nodes[node.idx()].cut else {
            if !trimmed.is_degenerate(&self.tol) {
                self.set_cut(node, trimmed);
                new_cuts.push(node);
            }
            return;
        };

        let hyperplane = cut_data.cut.hyperplane().clone();
        let minus = cut_data.minus;
        let plus = cut_data.plus;

        match piece.split(&hyperplane, &self.tol) {
            // The piece lies on an existing cut; it is already represented.
            Split::On => {}
            Split::Minus(m) => {
                if let Some(tm) = trimmed.split(&hyperplane, &self.tol).minus() {
                    self.insert_recursive(minus, m, tm, new_cuts);
                }
            }
            Split::Plus(p) => {
                if let Some(tp) = trimmed.split(&hyperplane, &self.tol).plus() {
                    self.insert_recursive(plus, p, tp, new_cuts);
                }
            }
            Split::Both { minus: pm, plus: pp } => {
                let trimmed_split = trimmed.split(&hyperplane, &self.tol);
                let (tm, tp) = match trimmed_split {
                    Split::Both { minus, plus } => (Some(minus), Some(plus)),
                    Split::Minus(m) => (Some(m), None),
                    Split::Plus(p) => (None, Some(p)),
                    Split::On => (None, None),
                };
                if let Some(tm) = tm {
                    self.insert_recursive(minus, pm, tm, new_cuts);
                }
                if let Some(tp) = tp {
                    self.insert_recursive(plus, pp, tp, new_cuts);
                }
            }
        }
    }

    /// Trims `subset` to the cell of `node` by splitting it against every
    /// ancestor cut and keeping the piece on the node's side.
    ///
    /// Returns `None` when nothing remains: the subset misses the cell,
    /// coincides with an ancestor cut, or degenerates to a point.
    pub(crate) fn trim_to_cell(&self, node: NodeId, subset: C) -> Option<C> {
        let mut piece = subset;
        let mut child = node;
        while let Some(parent) = self.parent(child) {
            let cut_data = self.nodes[parent.idx()].cut.as_ref()?;
            let on_minus_side = cut_data.minus == child;
            let hyperplane = cut_data.cut.hyperplane();
            piece = match piece.split(hyperplane, &self.tol) {
                Split::On => return None,
                Split::Minus(m) if on_minus_side => m,
                Split::Plus(p) if !on_minus_side => p,
                Split::Both { minus, plus } => {
                    if on_minus_side {
                        minus
                    } else {
                        plus
                    }
                }
                _ => return None,
            };
            child = parent;
        }

        (!piece.is_degenerate(&self.tol)).then_some(piece)
    }

    /// Installs `cut` on `node` (assumed to be a leaf) with two fresh leaf
    /// children cloning the node's value.
    pub(crate) fn set_cut(&mut self, node: NodeId, cut: C) {
        debug_assert!(self.nodes[node.idx()].cut.is_none());
        let value = self.nodes[node.idx()].value.clone();
        let minus = self.push_node(node, value.clone());
        let plus = self.push_node(node, value);
        self.nodes[node.idx()].cut = Some(CutData { cut, minus, plus });
    }

    /// Appends a fresh leaf node.
    pub(crate) fn push_node(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            parent,
            cut: None,
            value,
        });
        id
    }

    /// Turns `node` into an internal node with the given cut and children.
    pub(crate) fn link_children(&mut self, node: NodeId, cut: C, minus: NodeId, plus: NodeId) {
        self.nodes[minus.idx()].parent = node;
        self.nodes[plus.idx()].parent = node;
        self.nodes[node.idx()].cut = Some(CutData { cut, minus, plus });
    }

    /// Deep-copies the subtree of `src` rooted at `src_node` into `self`,
    /// mapping every leaf value through `map_leaf` (internal node values
    /// are copied verbatim). Returns the id of the copied root, which is
    /// left unparented.
    pub(crate) fn import_subtree(
        &mut self,
        src: &Self,
        src_node: NodeId,
        map_leaf: &mut impl FnMut(&T) -> T,
    ) -> NodeId {
        let src_data = &src.nodes[src_node.idx()];
        match &src_data.cut {
            None => self.push_node(NodeId::invalid(), map_leaf(&src_data.value)),
            Some(cut_data) => {
                let cut = cut_data.cut.clone();
                let minus = self.import_subtree(src, cut_data.minus, map_leaf);
                let plus = self.import_subtree(src, cut_data.plus, map_leaf);
                let node = self.push_node(NodeId::invalid(), src_data.value.clone());
                self.link_children(node, cut, minus, plus);
                node
            }
        }
    }

    /// Deep-copies one of this tree's own subtrees, mapping leaf values.
    /// Returns the unparented copy's root id.
    pub(crate) fn copy_subtree_within(
        &mut self,
        node: NodeId,
        map_leaf: &mut impl FnMut(&T) -> T,
    ) -> NodeId {
        match self.nodes[node.idx()].cut.clone() {
            None => {
                let value = map_leaf(&self.nodes[node.idx()].value);
                self.push_node(NodeId::invalid(), value)
            }
            Some(cut_data) => {
                let minus = self.copy_subtree_within(cut_data.minus, map_leaf);
                let plus = self.copy_subtree_within(cut_data.plus, map_leaf);
                let value = self.nodes[node.idx()].value.clone();
                let copy = self.push_node(NodeId::invalid(), value);
                self.link_children(copy, cut_data.cut, minus, plus);
                copy
            }
        }
    }

    /// Rebuilds the arena keeping only the nodes reachable from `new_root`,
    /// making that node the root. Used to drop scratch nodes after merge
    /// and split operations; all previously issued ids are invalidated.
    pub(crate) fn compact(&mut self, new_root: NodeId) {
        let mut compacted = Self {
            nodes: Vec::new(),
            root: NodeId::invalid(),
            tol: self.tol,
        };
        let root = compacted.import_subtree(self, new_root, &mut |v| v.clone());
        compacted.root = root;
        *self = compacted;
    }
}

/// Lazy depth-first iterator over the nodes of a [`BspTree`].
pub struct Nodes<'a, C: HyperplaneConvexSubset, T> {
    tree: &'a BspTree<C, T>,
    stack: SmallVec<[NodeId; 32]>,
}

impl<C: HyperplaneConvexSubset, T: Clone> Iterator for Nodes<'_, C, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        if let Some(cut_data) = &self.tree.nodes[node.idx()].cut {
            // Plus is pushed first so the minus subtree is visited first.
            self.stack.push(cut_data.plus);
            self.stack.push(cut_data.minus);
        }
        Some(node)
    }
}
