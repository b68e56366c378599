//! Greedy assembly of unordered directed elements into connected paths.

use core::cmp::Ordering;

use crate::math::{Real, Tolerance};

/// A directed path element that can be chained start-to-end.
///
/// Elements are sorted by start point under [`compare_points`]
/// (a total order, so infinities and signed zeros must compare
/// consistently), and candidate matches are found with a bounded scan
/// around the sort position pruned by [`no_closer_match`].
///
/// [`compare_points`]: Connectable::compare_points
/// [`no_closer_match`]: Connectable::no_closer_match
pub trait Connectable: Clone {
    /// The point type joining consecutive elements.
    type Point: Copy;

    /// The start point, when finite.
    fn start(&self) -> Option<Self::Point>;

    /// The end point, when finite.
    fn end(&self) -> Option<Self::Point>;

    /// Returns `true` when the element has effectively zero length.
    fn is_point_like(&self, tol: &Tolerance) -> bool;

    /// A total order over points, used only for sorting and searching.
    fn compare_points(a: &Self::Point, b: &Self::Point) -> Ordering;

    /// Point coincidence within tolerance.
    fn points_eq(a: &Self::Point, b: &Self::Point, tol: &Tolerance) -> bool;

    /// Returns `true` when `start` is so far from `key` along the primary
    /// sort coordinate that no element at or beyond it can match `key`.
    fn no_closer_match(key: &Self::Point, start: &Self::Point, tol: &Tolerance) -> bool;

    /// The signed angle turned when continuing from `self` onto `next`.
    fn relative_angle(&self, next: &Self) -> Real;
}

/// A connected run of elements, chained start-to-end.
#[derive(Clone, Debug)]
pub struct ConnectedPath<E> {
    elements: Vec<E>,
    closed: bool,
}

impl<E> ConnectedPath<E> {
    /// The elements of the path, in traversal order.
    #[inline]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Returns `true` when the last element connects back to the first.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

struct Entry<E> {
    element: E,
    next: Option<usize>,
    prev: Option<usize>,
    exported: bool,
}

/// Assembles directed elements into connected paths.
///
/// Elements are accumulated with [`add`](Self::add) and resolved by
/// [`connect_all`](Self::connect_all), which consumes them: a second call
/// without new additions returns nothing. Ties between several
/// full-length candidates are broken by the selection strategy supplied
/// at construction. Not thread-safe.
pub struct PathConnector<E: Connectable> {
    tol: Tolerance,
    pending: Vec<E>,
    strategy: Box<dyn FnMut(&E, &[&E]) -> usize>,
}

impl<E: Connectable> PathConnector<E> {
    /// Creates a connector whose ambiguous connections are resolved by
    /// `strategy`: given the incoming element and the candidate
    /// continuations, it returns the index of the chosen candidate.
    pub fn with_strategy(
        tol: Tolerance,
        strategy: impl FnMut(&E, &[&E]) -> usize + 'static,
    ) -> Self {
        Self {
            tol,
            pending: Vec::new(),
            strategy: Box::new(strategy),
        }
    }

    /// Queues one element for connection.
    pub fn add(&mut self, element: E) {
        self.pending.push(element);
    }

    /// Queues every element of `elements`.
    pub fn add_all(&mut self, elements: impl IntoIterator<Item = E>) {
        self.pending.extend(elements);
    }

    /// Connects every queued element and returns the resulting paths,
    /// consuming the queue. Isolated elements come back as
    /// single-element open paths.
    pub fn connect_all(&mut self) -> Vec<ConnectedPath<E>> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        // Entries with a finite start come first, sorted by start point;
        // the sorted prefix is the binary-search domain.
        let mut entries: Vec<Entry<E>> = self
            .pending
            .drain(..)
            .map(|element| Entry {
                element,
                next: None,
                prev: None,
                exported: false,
            })
            .collect();
        entries.sort_by(|a, b| match (a.element.start(), b.element.start()) {
            (Some(sa), Some(sb)) => E::compare_points(&sa, &sb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        let sorted_len = entries
            .iter()
            .take_while(|e| e.element.start().is_some())
            .count();

        for i in 0..entries.len() {
            self.connect_entry(&mut entries, sorted_len, i);
        }

        let mut paths = Vec::new();
        // Open paths start at entries with no incoming connection.
        for i in 0..entries.len() {
            if entries[i].prev.is_none() && !entries[i].exported {
                paths.push(Self::export(&mut entries, i));
            }
        }
        // Whatever remains belongs to cycles.
        for i in 0..entries.len() {
            if !entries[i].exported {
                paths.push(Self::export(&mut entries, i));
            }
        }
        paths
    }

    fn connect_entry(&mut self, entries: &mut [Entry<E>], sorted_len: usize, i: usize) {
        let key = match entries[i].element.end() {
            Some(key) => key,
            None => return,
        };

        let pivot =
            entries[..sorted_len].partition_point(|e| match e.element.start() {
                Some(s) => E::compare_points(&s, &key) == Ordering::Less,
                None => false,
            });

        let mut point_like = Vec::new();
        let mut full = Vec::new();
        let mut consider = |entries: &[Entry<E>], j: usize| {
            if j == i || entries[j].prev.is_some() {
                return;
            }
            if entries[j].element.is_point_like(&self.tol) {
                point_like.push(j);
            } else {
                full.push(j);
            }
        };

        // Bounded scan outward from the sort position of the key.
        let mut j = pivot;
        while j < sorted_len {
            match entries[j].element.start() {
                Some(s) if E::points_eq(&s, &key, &self.tol) => consider(entries, j),
                Some(s) if E::no_closer_match(&key, &s, &self.tol) => break,
                _ => {}
            }
            j += 1;
        }
        let mut j = pivot;
        while j > 0 {
            j -= 1;
            match entries[j].element.start() {
                Some(s) if E::points_eq(&s, &key, &self.tol) => consider(entries, j),
                Some(s) if E::no_closer_match(&key, &s, &self.tol) => break,
                _ => {}
            }
        }

        let chosen = if !point_like.is_empty() {
            Some(self.select_point_like(entries, i, &point_like))
        } else if full.len() == 1 {
            Some(full[0])
        } else if full.len() > 1 {
            let candidates: Vec<&E> = full.iter().map(|&j| &entries[j].element).collect();
            let pick = (self.strategy)(&entries[i].element, &candidates);
            full.get(pick).copied()
        } else {
            None
        };

        if let Some(j) = chosen {
            entries[i].next = Some(j);
            entries[j].prev = Some(i);
        } else if point_like.is_empty() && full.is_empty() {
            log::trace!("no continuation found for path element {i}");
        }
    }

    /// Picks the point-like candidate turning the least, preferring
    /// candidates that have no outgoing connection yet so they stay free
    /// to anchor other chains.
    fn select_point_like(&self, entries: &[Entry<E>], i: usize, candidates: &[usize]) -> usize {
        let mut best = candidates[0];
        let mut best_key = self.point_like_key(entries, i, best);
        for &j in &candidates[1..] {
            let key = self.point_like_key(entries, i, j);
            if key < best_key {
                best = j;
                best_key = key;
            }
        }
        best
    }

    fn point_like_key(&self, entries: &[Entry<E>], i: usize, j: usize) -> (bool, Real) {
        let angle = entries[i].element.relative_angle(&entries[j].element).abs();
        (entries[j].next.is_some(), angle)
    }

    fn export(entries: &mut [Entry<E>], root: usize) -> ConnectedPath<E> {
        let mut elements = Vec::new();
        let mut cursor = root;
        let mut closed = false;
        loop {
            entries[cursor].exported = true;
            elements.push(entries[cursor].element.clone());
            match entries[cursor].next {
                Some(next) if next == root => {
                    closed = true;
                    break;
                }
                Some(next) if !entries[next].exported => cursor = next,
                _ => break,
            }
        }
        ConnectedPath { elements, closed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A toy element on the number line, from `a` to `b`.
    #[derive(Clone, Debug, PartialEq)]
    struct Hop {
        a: Real,
        b: Real,
    }

    impl Connectable for Hop {
        type Point = Real;

        fn start(&self) -> Option<Real> {
            Some(self.a)
        }

        fn end(&self) -> Option<Real> {
            Some(self.b)
        }

        fn is_point_like(&self, tol: &Tolerance) -> bool {
            tol.is_zero(self.b - self.a)
        }

        fn compare_points(a: &Real, b: &Real) -> Ordering {
            ordered_float::OrderedFloat(*a).cmp(&ordered_float::OrderedFloat(*b))
        }

        fn points_eq(a: &Real, b: &Real, tol: &Tolerance) -> bool {
            tol.is_zero(a - b)
        }

        fn no_closer_match(key: &Real, start: &Real, tol: &Tolerance) -> bool {
            (start - key).abs() > tol.epsilon()
        }

        fn relative_angle(&self, _next: &Self) -> Real {
            0.0
        }
    }

    fn connector() -> PathConnector<Hop> {
        PathConnector::with_strategy(Tolerance::default(), |_, _| 0)
    }

    #[test]
    fn chains_elements_in_any_insertion_order() {
        let mut c = connector();
        c.add(Hop { a: 1.0, b: 2.0 });
        c.add(Hop { a: 0.0, b: 1.0 });
        c.add(Hop { a: 2.0, b: 3.0 });
        let paths = c.connect_all();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].is_closed());
        assert_eq!(
            paths[0].elements(),
            &[
                Hop { a: 0.0, b: 1.0 },
                Hop { a: 1.0, b: 2.0 },
                Hop { a: 2.0, b: 3.0 },
            ]
        );
    }

    #[test]
    fn detects_cycles() {
        let mut c = connector();
        c.add(Hop { a: 0.0, b: 1.0 });
        c.add(Hop { a: 1.0, b: 0.0 });
        let paths = c.connect_all();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_closed());
        assert_eq!(paths[0].elements().len(), 2);
    }

    #[test]
    fn isolated_elements_form_singleton_paths() {
        let mut c = connector();
        c.add(Hop { a: 0.0, b: 1.0 });
        c.add(Hop { a: 5.0, b: 6.0 });
        let mut paths = c.connect_all();
        paths.sort_by(|a, b| Hop::compare_points(&a.elements()[0].a, &b.elements()[0].a));
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| !p.is_closed()));
        assert!(paths.iter().all(|p| p.elements().len() == 1));
    }

    #[test]
    fn connect_all_consumes_the_queue() {
        let mut c = connector();
        c.add(Hop { a: 0.0, b: 1.0 });
        assert_eq!(c.connect_all().len(), 1);
        assert!(c.connect_all().is_empty());
    }
}
