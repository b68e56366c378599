//! Recursive two-tree merge.
//!
//! The merger walks two BSP trees in lock-step and produces a fresh output
//! tree; the operands are never mutated. At every step where both current
//! nodes are internal, the **first** operand's cut is the policy cut: the
//! second operand's subtree is split by it (with the same convex-split
//! machinery used for insertion) and the walk recurses independently on the
//! two side pairs. As soon as either node is a leaf, a caller-supplied
//! [`MergeRule`] decides the result, either producing a leaf value or
//! grafting a transformed copy of one operand's subtree.

use crate::partition::tree::{BspTree, NodeId};
use crate::partition::{Hyperplane, HyperplaneConvexSubset, Split};

/// Identifies one of the two operands of a merge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// The first operand (the policy tree driving the cuts).
    First,
    /// The second operand.
    Second,
}

impl Operand {
    /// The other operand.
    #[inline]
    pub fn other(self) -> Operand {
        match self {
            Operand::First => Operand::Second,
            Operand::Second => Operand::First,
        }
    }
}

/// The decision produced by [`MergeRule::merge_leaf`].
#[derive(Clone, Debug)]
pub enum MergeOutcome<T> {
    /// The merged region becomes a single leaf carrying this value.
    Leaf(T),
    /// The merged region becomes a copy of the given operand's current
    /// subtree, with each copied leaf value passed through
    /// [`MergeRule::graft_leaf`].
    Graft(Operand),
}

/// Leaf-combination strategy driving a merge.
///
/// This replaces subclass overrides with a strategy object: boolean region
/// operations and attribute-combination merges are all expressed as
/// implementations of this trait.
pub trait MergeRule<T: Clone> {
    /// Decides the merge result for a node pair where at least one side is
    /// a leaf.
    ///
    /// `first` and `second` are the leaf values of the respective operand
    /// nodes, or `None` for an internal node. At least one is `Some`.
    fn merge_leaf(&mut self, first: Option<&T>, second: Option<&T>) -> MergeOutcome<T>;

    /// Transforms a leaf value copied into the output by
    /// [`MergeOutcome::Graft`].
    ///
    /// `leaf` is the value of the opposite operand's leaf (the one that
    /// triggered the graft) and `leaf_operand` says which operand it came
    /// from; `grafted` is the value being copied. The default keeps the
    /// copied value unchanged.
    fn graft_leaf(&mut self, leaf: &T, leaf_operand: Operand, grafted: &T) -> T {
        let _ = (leaf, leaf_operand);
        grafted.clone()
    }
}

/// A node handle during merging: operand trees are borrowed, scratch nodes
/// produced by subtree splitting live in the output arena.
#[derive(Copy, Clone, Debug)]
enum Src {
    A(NodeId),
    B(NodeId),
    Out(NodeId),
}

struct Merger<'t, C: HyperplaneConvexSubset, T: Clone> {
    a: &'t BspTree<C, T>,
    b: &'t BspTree<C, T>,
    out: BspTree<C, T>,
}

impl<C: HyperplaneConvexSubset, T: Clone> BspTree<C, T> {
    /// Merges two trees into a fresh one according to `rule`.
    ///
    /// Neither operand is mutated. The output tree uses the first
    /// operand's tolerance; operands are expected to have been built with
    /// equivalent tolerances.
    pub fn merge(a: &Self, b: &Self, rule: &mut impl MergeRule<T>) -> Self {
        let mut merger = Merger {
            a,
            b,
            out: BspTree::new(*a.tolerance(), a.value(a.root()).clone()),
        };
        let root = merger.merge_nodes(a.root(), Src::B(b.root()), rule);
        let mut out = merger.out;
        // Drop the scratch nodes produced while partitioning subtrees.
        out.compact(root);
        out
    }

    /// Splits the whole tree by a convex subset, producing the two half
    /// trees (minus side, plus side).
    pub(crate) fn split_by(&self, partitioner: &C) -> (Self, Self) {
        let mut merger = Merger {
            a: self,
            b: self,
            out: BspTree::new(*self.tolerance(), self.value(self.root()).clone()),
        };
        let (minus, plus) = merger.split_subtree(Src::A(self.root()), partitioner);
        let out = merger.out;

        let mut minus_tree = out.clone();
        minus_tree.compact(minus);
        let mut plus_tree = out;
        plus_tree.compact(plus);
        (minus_tree, plus_tree)
    }
}

impl<C: HyperplaneConvexSubset, T: Clone> Merger<'_, C, T> {
    fn is_leaf(&self, src: Src) -> bool {
        match src {
            Src::A(id) => self.a.is_leaf(id),
            Src::B(id) => self.b.is_leaf(id),
            Src::Out(id) => self.out.is_leaf(id),
        }
    }

    fn value(&self, src: Src) -> &T {
        match src {
            Src::A(id) => self.a.value(id),
            Src::B(id) => self.b.value(id),
            Src::Out(id) => self.out.value(id),
        }
    }

    fn cut(&self, src: Src) -> Option<&C> {
        match src {
            Src::A(id) => self.a.cut(id),
            Src::B(id) => self.b.cut(id),
            Src::Out(id) => self.out.cut(id),
        }
    }

    fn children(&self, src: Src) -> (Src, Src) {
        match src {
            Src::A(id) => (
                Src::A(self.a.minus_child(id).expect("internal node")),
                Src::A(self.a.plus_child(id).expect("internal node")),
            ),
            Src::B(id) => (
                Src::B(self.b.minus_child(id).expect("internal node")),
                Src::B(self.b.plus_child(id).expect("internal node")),
            ),
            Src::Out(id) => (
                Src::Out(self.out.minus_child(id).expect("internal node")),
                Src::Out(self.out.plus_child(id).expect("internal node")),
            ),
        }
    }

    /// Copies a subtree into the output arena, mapping leaf values.
    fn import(&mut self, src: Src, map_leaf: &mut impl FnMut(&T) -> T) -> NodeId {
        match src {
            Src::A(id) => self.out.import_subtree(self.a, id, map_leaf),
            Src::B(id) => self.out.import_subtree(self.b, id, map_leaf),
            Src::Out(id) => self.out.copy_subtree_within(id, map_leaf),
        }
    }

    fn new_internal(&mut self, cut: C, value: T, minus: NodeId, plus: NodeId) -> NodeId {
        let node = self.out.push_node(NodeId::invalid(), value);
        self.out.link_children(node, cut, minus, plus);
        node
    }

    fn merge_nodes(
        &mut self,
        a_node: NodeId,
        second: Src,
        rule: &mut impl MergeRule<T>,
    ) -> NodeId {
        let a_leaf = self.a.is_leaf(a_node);
        let s_leaf = self.is_leaf(second);

        if a_leaf || s_leaf {
            let first_value = a_leaf.then(|| self.a.value(a_node).clone());
            let second_value = s_leaf.then(|| self.value(second).clone());
            match rule.merge_leaf(first_value.as_ref(), second_value.as_ref()) {
                MergeOutcome::Leaf(value) => self.out.push_node(NodeId::invalid(), value),
                MergeOutcome::Graft(op) => {
                    let (grafted, context) = match op {
                        Operand::First => (Src::A(a_node), second_value),
                        Operand::Second => (second, first_value),
                    };
                    let context_operand = op.other();
                    match context {
                        Some(leaf) => self.import(grafted, &mut |v| {
                            rule.graft_leaf(&leaf, context_operand, v)
                        }),
                        None => self.import(grafted, &mut |v| v.clone()),
                    }
                }
            }
        } else {
            let cut = self.a.cut(a_node).expect("internal node").clone();
            let a_minus = self.a.minus_child(a_node).expect("internal node");
            let a_plus = self.a.plus_child(a_node).expect("internal node");

            let (second_minus, second_plus) = self.split_subtree(second, &cut);
            let minus = self.merge_nodes(a_minus, Src::Out(second_minus), rule);
            let plus = self.merge_nodes(a_plus, Src::Out(second_plus), rule);

            let value = self.a.value(a_node).clone();
            self.new_internal(cut, value, minus, plus)
        }
    }

    /// Splits the subtree at `src` by `partitioner`, returning the output
    /// ids of the minus-side and plus-side halves.
    ///
    /// This is the mutual-split case analysis: the partitioner and the
    /// node's cut are split against each other's hyperplanes, determining
    /// which child subtrees the partitioner can reach and on which side of
    /// it the untouched child lands.
    fn split_subtree(&mut self, src: Src, partitioner: &C) -> (NodeId, NodeId) {
        let tol = *self.a.tolerance();

        let Some(cut) = self.cut(src).cloned() else {
            let value = self.value(src).clone();
            let minus = self.out.push_node(NodeId::invalid(), value.clone());
            let plus = self.out.push_node(NodeId::invalid(), value);
            return (minus, plus);
        };

        let (child_minus, child_plus) = self.children(src);
        let node_value = self.value(src).clone();

        let partitioner_split = partitioner.split(cut.hyperplane(), &tol);
        let cut_split = cut.split(partitioner.hyperplane(), &tol);

        match partitioner_split {
            Split::Plus(_) => {
                // The partitioner only reaches the plus child's cell.
                let (m, p) = self.split_subtree(child_plus, partitioner);
                let kept = self.import(child_minus, &mut |v| v.clone());
                if matches!(cut_split, Split::Plus(_)) {
                    // The cut, and with it the untouched minus child, lies
                    // on the partitioner's plus side.
                    let plus = self.new_internal(cut, node_value, kept, p);
                    (m, plus)
                } else {
                    let minus = self.new_internal(cut, node_value, kept, m);
                    (minus, p)
                }
            }
            Split::Minus(_) => {
                let (m, p) = self.split_subtree(child_minus, partitioner);
                let kept = self.import(child_plus, &mut |v| v.clone());
                if matches!(cut_split, Split::Minus(_)) {
                    let minus = self.new_internal(cut, node_value, m, kept);
                    (minus, p)
                } else {
                    let plus = self.new_internal(cut, node_value, p, kept);
                    (m, plus)
                }
            }
            Split::Both {
                minus: part_minus,
                plus: part_plus,
            } => {
                // The partitioner crosses the cut; in rare tolerance
                // corner cases the cut may still classify entirely on one
                // side, in which case the untrimmed cut is reused.
                let (cut_minus, cut_plus) = match cut_split {
                    Split::Both { minus, plus } => (minus, plus),
                    _ => (cut.clone(), cut),
                };
                let (m1, p1) = self.split_subtree(child_minus, &part_minus);
                let (m2, p2) = self.split_subtree(child_plus, &part_plus);
                let minus = self.new_internal(cut_minus, node_value.clone(), m1, m2);
                let plus = self.new_internal(cut_plus, node_value, p1, p2);
                (minus, plus)
            }
            Split::On => {
                // The partitioner lies on the cut hyperplane; the children
                // already are the two halves, possibly swapped.
                let same = partitioner
                    .hyperplane()
                    .similar_orientation(cut.hyperplane());
                let (minus_src, plus_src) = if same {
                    (child_minus, child_plus)
                } else {
                    (child_plus, child_minus)
                };
                let minus = self.import(minus_src, &mut |v| v.clone());
                let plus = self.import(plus_src, &mut |v| v.clone());
                (minus, plus)
            }
        }
    }
}
