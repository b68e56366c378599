//! BSP trees with inside/outside region semantics.

use crate::math::Tolerance;
use crate::partition::tree::{BspTree, NodeId, PointOf};
use crate::partition::{
    Hyperplane, HyperplaneConvexSubset, MergeOutcome, MergeRule, Operand, Side, Split,
};

/// The location of a point (or of a leaf cell) relative to a region.
///
/// Leaves of a region tree only ever carry `Inside` or `Outside`;
/// `Boundary` is produced by point classification when a point lies on a
/// cut separating differently classified cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionLocation {
    /// Inside the region.
    Inside,
    /// Outside the region.
    Outside,
    /// On the boundary of the region.
    Boundary,
}

impl RegionLocation {
    /// Swaps `Inside` and `Outside`; `Boundary` is its own complement.
    pub fn complement(self) -> Self {
        match self {
            RegionLocation::Inside => RegionLocation::Outside,
            RegionLocation::Outside => RegionLocation::Inside,
            RegionLocation::Boundary => RegionLocation::Boundary,
        }
    }
}

/// Determines the leaf locations created when a raw cut hyperplane (one not
/// already carrying region semantics) is inserted into a region tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RegionCutRule {
    /// The minus side of the cut is inside the region. This is the
    /// default, matching the boundary convention that a boundary's plus
    /// side faces outward.
    #[default]
    MinusInside,
    /// The plus side of the cut is inside the region.
    PlusInside,
    /// Both sides keep the location the cell had before the cut, leaving
    /// the region's classification unchanged.
    Inherit,
}

/// The boundary pieces contributed by a single internal node's cut.
#[derive(Clone, Debug)]
pub struct RegionCutBoundary<C> {
    /// Pieces whose minus side is inside the region and plus side outside.
    pub inside_facing: Vec<C>,
    /// Pieces whose plus side is inside the region and minus side outside.
    pub outside_facing: Vec<C>,
}

/// A BSP tree representing a region of space: each leaf cell is either
/// inside or outside the region.
///
/// Boolean set operations are implemented on top of the generic
/// [merger](BspTree::merge) with fixed leaf-rule tables. The copy-based
/// operation is the primitive; in-place variants compute a fresh tree and
/// swap it in, so both share one code path.
#[derive(Clone, Debug)]
pub struct RegionBspTree<C: HyperplaneConvexSubset> {
    tree: BspTree<C, RegionLocation>,
}

impl<C: HyperplaneConvexSubset> RegionBspTree<C> {
    /// Creates a region covering the entire space.
    pub fn full(tol: Tolerance) -> Self {
        Self {
            tree: BspTree::new(tol, RegionLocation::Inside),
        }
    }

    /// Creates an empty region.
    pub fn empty(tol: Tolerance) -> Self {
        Self {
            tree: BspTree::new(tol, RegionLocation::Outside),
        }
    }

    /// Builds a region from convex boundary pieces, each oriented so that
    /// its plus side faces outward.
    pub fn from_boundaries(tol: Tolerance, boundaries: impl IntoIterator<Item = C>) -> Self {
        let mut region = Self::empty(tol);
        for boundary in boundaries {
            region.insert(&boundary);
        }
        region
    }

    /// The underlying BSP tree.
    #[inline]
    pub fn tree(&self) -> &BspTree<C, RegionLocation> {
        &self.tree
    }

    /// The tolerance context used by this region.
    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        self.tree.tolerance()
    }

    /// The root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The number of nodes in the tree.
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Returns `true` if this region covers the entire space, i.e. the
    /// tree is a single leaf located inside.
    pub fn is_full(&self) -> bool {
        self.tree.is_leaf(self.tree.root())
            && *self.tree.value(self.tree.root()) == RegionLocation::Inside
    }

    /// Returns `true` if this region is empty, i.e. the tree is a single
    /// leaf located outside.
    pub fn is_empty(&self) -> bool {
        self.tree.is_leaf(self.tree.root())
            && *self.tree.value(self.tree.root()) == RegionLocation::Outside
    }

    /// Finds the leaf node whose cell contains `pt`.
    #[inline]
    pub fn find_node(&self, pt: &PointOf<C>) -> NodeId {
        self.tree.find_node(pt)
    }

    /// Classifies a point against this region.
    ///
    /// Points lying (within tolerance) on a cut separating differently
    /// classified cells report [`RegionLocation::Boundary`].
    pub fn classify(&self, pt: &PointOf<C>) -> RegionLocation {
        self.classify_node(self.tree.root(), pt)
    }

    fn classify_node(&self, node: NodeId, pt: &PointOf<C>) -> RegionLocation {
        let Some(cut) = self.tree.cut(node) else {
            return *self.tree.value(node);
        };
        let minus = self.tree.minus_child(node).expect("internal node");
        let plus = self.tree.plus_child(node).expect("internal node");

        match cut.hyperplane().classify(pt, self.tree.tolerance()) {
            Side::Minus => self.classify_node(minus, pt),
            Side::Plus => self.classify_node(plus, pt),
            Side::On => {
                let m = self.classify_node(minus, pt);
                let p = self.classify_node(plus, pt);
                if m == p {
                    m
                } else {
                    RegionLocation::Boundary
                }
            }
        }
    }

    /// The location of a node's whole subtree: `Some` if every reachable
    /// leaf agrees, `None` for a mixed subtree.
    pub fn node_location(&self, node: NodeId) -> Option<RegionLocation> {
        match (self.tree.minus_child(node), self.tree.plus_child(node)) {
            (None, _) | (_, None) => Some(*self.tree.value(node)),
            (Some(minus), Some(plus)) => {
                let m = self.node_location(minus)?;
                let p = self.node_location(plus)?;
                (m == p).then_some(m)
            }
        }
    }

    /// Inserts a cut hyperplane at `node` with the default
    /// [`RegionCutRule::MinusInside`].
    pub fn insert_cut(&mut self, node: NodeId, hyperplane: &C::Hyperplane) -> bool {
        self.insert_cut_with_rule(node, hyperplane, RegionCutRule::default())
    }

    /// Inserts a cut hyperplane at `node`, marking the new children
    /// according to `rule`.
    ///
    /// Like [`BspTree::insert_cut`], a hyperplane that does not pass
    /// through the interior of the node's cell is rejected: this returns
    /// `false` and the node is left unchanged.
    pub fn insert_cut_with_rule(
        &mut self,
        node: NodeId,
        hyperplane: &C::Hyperplane,
        rule: RegionCutRule,
    ) -> bool {
        let inherited = self
            .node_location(node)
            .unwrap_or(RegionLocation::Outside);
        if !self.tree.insert_cut(node, hyperplane) {
            return false;
        }
        self.apply_cut_rule(node, rule, inherited);
        true
    }

    /// Inserts a convex boundary subset (plus side outward) into the
    /// region, so that cells on its minus side become inside.
    pub fn insert(&mut self, subset: &C) {
        self.insert_with_rule(subset, RegionCutRule::MinusInside);
    }

    /// Inserts a convex subset of a hyperplane, marking the children of
    /// every newly cut leaf according to `rule`.
    pub fn insert_with_rule(&mut self, subset: &C, rule: RegionCutRule) {
        let new_cuts: Vec<(NodeId, RegionLocation)> = {
            let cut_nodes = self.tree.insert_collecting(subset);
            cut_nodes
                .into_iter()
                .map(|node| (node, *self.tree.value(node)))
                .collect()
        };
        for (node, inherited) in new_cuts {
            self.apply_cut_rule(node, rule, inherited);
        }
    }

    fn apply_cut_rule(&mut self, node: NodeId, rule: RegionCutRule, inherited: RegionLocation) {
        let minus = self.tree.minus_child(node).expect("freshly cut node");
        let plus = self.tree.plus_child(node).expect("freshly cut node");
        match rule {
            RegionCutRule::MinusInside => {
                self.tree.set_value(minus, RegionLocation::Inside);
                self.tree.set_value(plus, RegionLocation::Outside);
            }
            RegionCutRule::PlusInside => {
                self.tree.set_value(minus, RegionLocation::Outside);
                self.tree.set_value(plus, RegionLocation::Inside);
            }
            RegionCutRule::Inherit => {
                self.tree.set_value(minus, inherited);
                self.tree.set_value(plus, inherited);
            }
        }
    }

    /// The set-complement of this region.
    pub fn complement(&self) -> Self {
        let mut result = self.clone();
        result.complement_assign();
        result
    }

    /// Complements this region in place by flipping every leaf location in
    /// O(nodes). Applying it twice restores the original classification
    /// exactly.
    pub fn complement_assign(&mut self) {
        let nodes: Vec<NodeId> = self.tree.iter().collect();
        for node in nodes {
            if self.tree.is_leaf(node) {
                let flipped = self.tree.value(node).complement();
                self.tree.set_value(node, flipped);
            }
        }
    }

    /// The union of this region and `other`.
    pub fn union(&self, other: &Self) -> Self {
        self.boolean_op(other, &mut UnionRule)
    }

    /// Replaces this region with its union with `other`.
    pub fn union_assign(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// The intersection of this region and `other`.
    pub fn intersection(&self, other: &Self) -> Self {
        self.boolean_op(other, &mut IntersectionRule)
    }

    /// Replaces this region with its intersection with `other`.
    pub fn intersection_assign(&mut self, other: &Self) {
        *self = self.intersection(other);
    }

    /// The difference of this region minus `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.boolean_op(other, &mut DifferenceRule)
    }

    /// Replaces this region with its difference with `other`.
    pub fn difference_assign(&mut self, other: &Self) {
        *self = self.difference(other);
    }

    /// The symmetric difference (xor) of this region and `other`.
    pub fn xor(&self, other: &Self) -> Self {
        self.boolean_op(other, &mut XorRule)
    }

    /// Replaces this region with its symmetric difference with `other`.
    pub fn xor_assign(&mut self, other: &Self) {
        *self = self.xor(other);
    }

    fn boolean_op(&self, other: &Self, rule: &mut impl MergeRule<RegionLocation>) -> Self {
        let mut result = Self {
            tree: BspTree::merge(&self.tree, &other.tree, rule),
        };
        result.condense();
        result
    }

    /// Collapses every internal node whose leaves all share one location.
    fn condense(&mut self) {
        let _ = self.condense_node(self.tree.root());
    }

    fn condense_node(&mut self, node: NodeId) -> Option<RegionLocation> {
        let minus = self.tree.minus_child(node)?;
        let plus = self.tree.plus_child(node)?;

        let m = self.condense_node(minus).or_else(|| {
            self.tree
                .is_leaf(minus)
                .then(|| *self.tree.value(minus))
        });
        let p = self.condense_node(plus).or_else(|| {
            self.tree.is_leaf(plus).then(|| *self.tree.value(plus))
        });

        match (m, p) {
            (Some(m), Some(p)) if m == p => {
                self.tree.clear_cut(node);
                self.tree.set_value(node, m);
                Some(m)
            }
            _ => None,
        }
    }

    /// Splits this region by a convex subset, producing the parts on each
    /// side.
    ///
    /// Each result is rooted on the splitter's hyperplane: it carries this
    /// region's content on its own side and is outside everywhere beyond
    /// the splitter. An empty region reports [`Split::On`]: neither side
    /// has any content.
    pub fn split(&self, splitter: &C) -> Split<Self> {
        let (minus_half, plus_half) = self.tree.split_by(splitter);
        let mut minus = Self {
            tree: Self::rooted_half(minus_half, splitter, true),
        };
        let mut plus = Self {
            tree: Self::rooted_half(plus_half, splitter, false),
        };
        minus.condense();
        plus.condense();

        match (minus.is_empty(), plus.is_empty()) {
            (true, true) => Split::On,
            (false, true) => Split::Minus(minus),
            (true, false) => Split::Plus(plus),
            (false, false) => Split::Both { minus, plus },
        }
    }

    /// Roots one half of a split under the splitter's hyperplane: the
    /// half's content becomes the child on its own side of the cut, and an
    /// outside leaf covers the far side.
    fn rooted_half(
        content: BspTree<C, RegionLocation>,
        splitter: &C,
        content_on_minus: bool,
    ) -> BspTree<C, RegionLocation> {
        let mut out = BspTree::new(*content.tolerance(), RegionLocation::Outside);
        let root = out.root();
        let near = out.import_subtree(&content, content.root(), &mut |v| *v);
        let far = out.push_node(NodeId::invalid(), RegionLocation::Outside);
        let cut = splitter.hyperplane().span();
        if content_on_minus {
            out.link_children(root, cut, near, far);
        } else {
            out.link_children(root, cut, far, near);
        }
        out
    }

    /// The boundary pieces of the cut of `node`, or `None` if `node` is a
    /// leaf.
    ///
    /// A piece of the cut is part of the region boundary when the leaves
    /// reachable on its two sides disagree about being inside the region.
    pub fn cut_boundary(&self, node: NodeId) -> Option<RegionCutBoundary<C>> {
        let cut = self.tree.cut(node)?.clone();
        let minus = self.tree.minus_child(node).expect("internal node");
        let plus = self.tree.plus_child(node).expect("internal node");

        let mut inside_facing = Vec::new();
        let (minus_inside, _) = self.characterize(cut.clone(), minus);
        for piece in minus_inside {
            let (_, outside) = self.characterize(piece, plus);
            inside_facing.extend(outside);
        }

        let mut outside_facing = Vec::new();
        let (plus_inside, _) = self.characterize(cut, plus);
        for piece in plus_inside {
            let (_, outside) = self.characterize(piece, minus);
            outside_facing.extend(outside);
        }

        Some(RegionCutBoundary {
            inside_facing,
            outside_facing,
        })
    }

    /// Splits `piece` down the subtree at `node`, bucketing the fragments
    /// by the location of the leaf cell they land in.
    fn characterize(&self, piece: C, node: NodeId) -> (Vec<C>, Vec<C>) {
        let mut inside = Vec::new();
        let mut outside = Vec::new();
        self.characterize_recursive(piece, node, &mut inside, &mut outside);
        (inside, outside)
    }

    fn characterize_recursive(
        &self,
        piece: C,
        node: NodeId,
        inside: &mut Vec<C>,
        outside: &mut Vec<C>,
    ) {
        let Some(cut) = self.tree.cut(node) else {
            match self.tree.value(node) {
                RegionLocation::Inside => inside.push(piece),
                _ => outside.push(piece),
            }
            return;
        };
        let hyperplane = cut.hyperplane().clone();
        let minus = self.tree.minus_child(node).expect("internal node");
        let plus = self.tree.plus_child(node).expect("internal node");

        match piece.split(&hyperplane, self.tree.tolerance()) {
            Split::Minus(m) => self.characterize_recursive(m, minus, inside, outside),
            Split::Plus(p) => self.characterize_recursive(p, plus, inside, outside),
            Split::Both { minus: m, plus: p } => {
                self.characterize_recursive(m, minus, inside, outside);
                self.characterize_recursive(p, plus, inside, outside);
            }
            // Points on a cut classify toward the minus side, matching
            // find_node.
            Split::On => self.characterize_recursive(piece, minus, inside, outside),
        }
    }

    /// All boundary pieces of this region, each oriented so that its plus
    /// side faces outward.
    pub fn boundaries(&self) -> Vec<C> {
        let mut result = Vec::new();
        for node in self.tree.iter() {
            if let Some(boundary) = self.cut_boundary(node) {
                result.extend(boundary.inside_facing);
                result.extend(boundary.outside_facing.iter().map(|c| c.reverse()));
            }
        }
        result
    }
}

struct UnionRule;

impl MergeRule<RegionLocation> for UnionRule {
    fn merge_leaf(
        &mut self,
        first: Option<&RegionLocation>,
        second: Option<&RegionLocation>,
    ) -> MergeOutcome<RegionLocation> {
        if first == Some(&RegionLocation::Inside) || second == Some(&RegionLocation::Inside) {
            MergeOutcome::Leaf(RegionLocation::Inside)
        } else if first.is_some() {
            MergeOutcome::Graft(Operand::Second)
        } else {
            MergeOutcome::Graft(Operand::First)
        }
    }
}

struct IntersectionRule;

impl MergeRule<RegionLocation> for IntersectionRule {
    fn merge_leaf(
        &mut self,
        first: Option<&RegionLocation>,
        second: Option<&RegionLocation>,
    ) -> MergeOutcome<RegionLocation> {
        if first == Some(&RegionLocation::Outside) || second == Some(&RegionLocation::Outside) {
            MergeOutcome::Leaf(RegionLocation::Outside)
        } else if first.is_some() {
            MergeOutcome::Graft(Operand::Second)
        } else {
            MergeOutcome::Graft(Operand::First)
        }
    }
}

struct DifferenceRule;

impl MergeRule<RegionLocation> for DifferenceRule {
    fn merge_leaf(
        &mut self,
        first: Option<&RegionLocation>,
        second: Option<&RegionLocation>,
    ) -> MergeOutcome<RegionLocation> {
        match first {
            // Nothing of this cell is in the minuend.
            Some(RegionLocation::Outside) => MergeOutcome::Leaf(RegionLocation::Outside),
            // The whole cell is in the minuend: keep the complement of the
            // subtrahend here.
            Some(_) => MergeOutcome::Graft(Operand::Second),
            None => match second {
                Some(RegionLocation::Inside) => MergeOutcome::Leaf(RegionLocation::Outside),
                _ => MergeOutcome::Graft(Operand::First),
            },
        }
    }

    fn graft_leaf(
        &mut self,
        leaf: &RegionLocation,
        _leaf_operand: Operand,
        grafted: &RegionLocation,
    ) -> RegionLocation {
        if *leaf == RegionLocation::Inside {
            grafted.complement()
        } else {
            *grafted
        }
    }
}

struct XorRule;

impl MergeRule<RegionLocation> for XorRule {
    fn merge_leaf(
        &mut self,
        first: Option<&RegionLocation>,
        second: Option<&RegionLocation>,
    ) -> MergeOutcome<RegionLocation> {
        match (first, second) {
            (Some(f), Some(s)) => MergeOutcome::Leaf(if f != s {
                RegionLocation::Inside
            } else {
                RegionLocation::Outside
            }),
            (Some(_), None) => MergeOutcome::Graft(Operand::Second),
            _ => MergeOutcome::Graft(Operand::First),
        }
    }

    fn graft_leaf(
        &mut self,
        leaf: &RegionLocation,
        _leaf_operand: Operand,
        grafted: &RegionLocation,
    ) -> RegionLocation {
        if *leaf == RegionLocation::Inside {
            grafted.complement()
        } else {
            *grafted
        }
    }
}
