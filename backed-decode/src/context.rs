//! Traversal context: opens the containers along one route

use crate::container::{KeyedContainer, UnkeyedCursor};
use crate::document::Document;
use crate::entry::EntrySet;
use crate::located::Located;
use backed_path::{BackedError, Limits, Result, Route, Segment};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// One open container on the traversal stack
pub enum Element<'a, D> {
    /// The document root; always the bottom of the stack
    Root(&'a D),
    /// An ordered container, positioned at its first unread element
    Unkeyed(UnkeyedCursor<'a, D>),
    /// A keyed container
    Keyed(KeyedContainer<'a, D>),
    /// Entries selected by a wildcard segment
    EntrySet(EntrySet<'a, D>),
}

impl<D> Element<'_, D> {
    fn name(&self) -> &'static str {
        match self {
            Element::Root(_) => "root",
            Element::Unkeyed(_) => "unkeyed container",
            Element::Keyed(_) => "keyed container",
            Element::EntrySet(_) => "entry set",
        }
    }
}

impl<D> fmt::Debug for Element<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The stack of containers opened while following one route
///
/// Construction walks every adjacent pair of segments and opens exactly one
/// container per pair; [`TraversalContext::locate`] then applies the final
/// segment to the top of the stack. Containers are read through copies, so
/// locating twice gives the same answer.
pub struct TraversalContext<'a, D> {
    route: Route,
    elements: SmallVec<[Element<'a, D>; 4]>,
    limits: Limits,
}

impl<'a, D: Document> TraversalContext<'a, D> {
    /// Open every container `route` passes through, starting at `root`
    pub fn new(root: &'a D, route: &Route, limits: &Limits) -> Result<Self> {
        if route.len() > limits.max_route_depth {
            return Err(BackedError::LimitExceeded(format!(
                "Route depth {} exceeds limit {}",
                route.len(),
                limits.max_route_depth
            )));
        }

        let mut context = Self {
            route: route.clone(),
            elements: smallvec![Element::Root(root)],
            limits: *limits,
        };

        for pair in route.windows(2) {
            let element = context.open(&pair[0], &pair[1])?;
            context.elements.push(element);
        }

        Ok(context)
    }

    /// The route being followed
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Open containers, bottom (root) first
    pub fn elements(&self) -> &[Element<'a, D>] {
        &self.elements
    }

    fn top(&self) -> &Element<'a, D> {
        // The root is pushed on construction and never popped
        &self.elements[self.elements.len() - 1]
    }

    fn invalid(&self, reason: impl Into<String>) -> BackedError {
        BackedError::invalid_path(&self.route, reason)
    }

    fn open(&self, current: &Segment, next: &Segment) -> Result<Element<'a, D>> {
        match (current, next) {
            (Segment::Key(key), Segment::Index(_)) => {
                Ok(Element::Unkeyed(self.closest_keyed()?.nested_unkeyed(key)?))
            }
            (Segment::Key(key), _) => Ok(Element::Keyed(self.closest_keyed()?.nested_keyed(key)?)),
            (Segment::Index(index), Segment::Index(_)) => {
                let mut cursor = self.closest_unkeyed()?;
                cursor.advance_to(*index)?;
                Ok(Element::Unkeyed(cursor.nested_unkeyed()?))
            }
            (Segment::Index(index), _) => {
                let mut cursor = self.closest_unkeyed()?;
                cursor.advance_to(*index)?;
                Ok(Element::Keyed(cursor.nested_keyed()?))
            }
            (wildcard, Segment::Index(_)) => match wildcard.as_wildcard() {
                Some((kind, filter)) => Ok(Element::EntrySet(EntrySet::materialize(
                    self.closest_keyed()?,
                    kind,
                    filter,
                    &self.limits,
                )?)),
                None => Err(self.invalid(format!("unexpected segment {}", wildcard))),
            },
            (wildcard, next) => Err(self.invalid(format!(
                "wildcard {} must be followed by an index or end the route, found {}",
                wildcard, next
            ))),
        }
    }

    /// The nearest keyed container
    ///
    /// The root and an ordered container's next element are opened as keyed
    /// containers on demand. An entry set blocks the request.
    pub fn closest_keyed(&self) -> Result<KeyedContainer<'a, D>> {
        match self.top() {
            Element::Keyed(container) => Ok(*container),
            Element::Root(root) => KeyedContainer::open(*root),
            Element::Unkeyed(cursor) => {
                let mut cursor = *cursor;
                cursor.nested_keyed()
            }
            Element::EntrySet(_) => {
                Err(self.invalid("cannot open a keyed container inside an entry set"))
            }
        }
    }

    /// The nearest ordered container, scanning from the top of the stack
    ///
    /// The root is opened as an ordered container on demand; keyed
    /// containers are skipped. An entry set blocks the scan.
    pub fn closest_unkeyed(&self) -> Result<UnkeyedCursor<'a, D>> {
        for element in self.elements.iter().rev() {
            match element {
                Element::Unkeyed(cursor) => return Ok(*cursor),
                Element::Root(root) => return UnkeyedCursor::open(*root),
                Element::Keyed(_) => continue,
                Element::EntrySet(_) => {
                    return Err(self.invalid("cannot open an unkeyed container inside an entry set"))
                }
            }
        }
        Err(self.invalid("empty traversal stack"))
    }

    /// Apply the route's last segment and return what it points at
    ///
    /// A terminal wildcard materialises its entry set here, once per call.
    pub fn locate(&self) -> Result<Located<'a, D>> {
        let Some(last) = self.route.last() else {
            return match self.top() {
                Element::Root(root) => Ok(Located::Node(*root)),
                other => Err(self.invalid(format!("empty route over {}", other.name()))),
            };
        };

        match last {
            Segment::Key(key) => Ok(Located::Node(self.closest_keyed()?.get(key)?)),
            Segment::Index(index) => match self.top() {
                Element::EntrySet(set) => Ok(Located::Entry(set.get(*index)?.clone())),
                _ => {
                    let mut cursor = self.closest_unkeyed()?;
                    cursor.advance_to(*index)?;
                    Ok(Located::Node(cursor.next_node()?))
                }
            },
            wildcard => match wildcard.as_wildcard() {
                Some((kind, filter)) => Ok(Located::Entries(EntrySet::materialize(
                    self.closest_keyed()?,
                    kind,
                    filter,
                    &self.limits,
                )?)),
                None => Err(self.invalid(format!("unexpected segment {}", wildcard))),
            },
        }
    }

    /// Number of elements of the sequence this route points at
    pub fn count(&self) -> Result<usize> {
        self.locate()?.count()
    }

    /// Elements of the sequence this route points at, in order
    pub fn located_elements(&self) -> Result<Vec<Located<'a, D>>> {
        self.locate()?.elements()
    }
}

impl<D> fmt::Debug for TraversalContext<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalContext")
            .field("route", &self.route.to_string())
            .field("elements", &self.elements)
            .finish()
    }
}
