//! Paths: ordered alternatives of routes through a document

use crate::error::{BackedError, Result};
use crate::filter::PathFilter;
use crate::segment::Segment;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::ops::Deref;

/// One concrete sequence of segments
///
/// An empty route addresses the current location (the document root).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Route {
    segments: SmallVec<[Segment; 4]>,
}

impl Route {
    /// Create a route from segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Segments of this route
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Return a copy of this route with one more segment
    pub fn child(&self, segment: Segment) -> Route {
        let mut route = self.clone();
        route.segments.push(segment);
        route
    }
}

impl Deref for Route {
    type Target = [Segment];

    fn deref(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A set of one or more alternative routes, tried in order
///
/// Paths are immutable values: every builder method returns a new path.
/// Appending a segment applies it to every alternative; [`Path::or_else`]
/// concatenates the alternatives of both sides, left first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    routes: SmallVec<[Route; 1]>,
}

impl Default for Path {
    fn default() -> Self {
        Path::root()
    }
}

impl Path {
    /// The path with a single empty route (the current location)
    pub fn root() -> Self {
        Self {
            routes: smallvec![Route::default()],
        }
    }

    /// Create a single-route path from segments
    ///
    /// ```
    /// use backed_path::{Path, Segment};
    ///
    /// let path = Path::from_segments(["attributes", "values"]).appending(1usize);
    /// assert_eq!(path.to_string(), "$.attributes.values[1]");
    /// ```
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self {
            routes: smallvec![Route::new(segments)],
        }
    }

    /// Parse a pointer-style path (`/counts/~/0`)
    ///
    /// The empty string is the root. Tokens are separated by `/` and
    /// unescaped with `~1` → `/` and `~0` → `~`. An all-digit token is an
    /// index, a lone `~` selects all keys and a lone `*` all values; any
    /// other token is a key.
    ///
    /// The text form cannot address object keys that are all digits (`"2021"`)
    /// or exactly `~` or `*`: those tokens always parse as an index or a
    /// wildcard. Build such paths with [`Path::key`] instead.
    pub fn parse(pointer: &str) -> Result<Self> {
        if pointer.is_empty() {
            return Ok(Path::root());
        }

        if !pointer.starts_with('/') {
            return Err(BackedError::invalid_path(
                pointer,
                "pointer must start with '/' (or be empty for the root)",
            ));
        }

        let mut route = Route::default();
        for token in pointer.split('/').skip(1) {
            let segment = match token {
                "~" => Segment::AllKeys,
                "*" => Segment::AllValues,
                _ if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) => {
                    let index = token.parse::<usize>().map_err(|e| {
                        BackedError::invalid_path(pointer, format!("bad index '{}': {}", token, e))
                    })?;
                    Segment::Index(index)
                }
                _ => {
                    validate_escape_sequences(token)
                        .map_err(|reason| BackedError::invalid_path(pointer, reason))?;
                    Segment::Key(unescape_pointer_token(token))
                }
            };
            route.segments.push(segment);
        }

        Ok(Self {
            routes: smallvec![route],
        })
    }

    /// Alternatives of this path, in the order they are tried
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Append a segment to every route
    pub fn appending(&self, segment: impl Into<Segment>) -> Path {
        let segment = segment.into();
        Self {
            routes: self
                .routes
                .iter()
                .map(|route| route.child(segment.clone()))
                .collect(),
        }
    }

    /// Append several segments, in order, to every route
    pub fn appending_all<I, S>(&self, segments: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        let segments: Vec<Segment> = segments.into_iter().map(Into::into).collect();
        Self {
            routes: self
                .routes
                .iter()
                .map(|route| {
                    let mut route = route.clone();
                    route.segments.extend(segments.iter().cloned());
                    route
                })
                .collect(),
        }
    }

    /// Append a key segment
    pub fn key(&self, name: impl Into<String>) -> Path {
        self.appending(Segment::Key(name.into()))
    }

    /// Append an index segment
    pub fn index(&self, index: usize) -> Path {
        self.appending(Segment::Index(index))
    }

    /// Append an all-keys wildcard
    pub fn all_keys(&self) -> Path {
        self.appending(Segment::AllKeys)
    }

    /// Append an all-values wildcard
    pub fn all_values(&self) -> Path {
        self.appending(Segment::AllValues)
    }

    /// Append a filtered-keys wildcard
    pub fn filter_keys(&self, filter: PathFilter) -> Path {
        self.appending(Segment::FilteredKeys(filter))
    }

    /// Append a filtered-values wildcard
    pub fn filter_values(&self, filter: PathFilter) -> Path {
        self.appending(Segment::FilteredValues(filter))
    }

    /// Combine with another path; this path's routes are tried first
    pub fn or_else(&self, other: impl Into<Path>) -> Path {
        let other = other.into();
        let mut routes = self.routes.clone();
        routes.extend(other.routes);
        Self { routes }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, route) in self.routes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ?? ")?;
            }
            write!(f, "{}", route)?;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Path::root().key(value)
    }
}

impl From<String> for Path {
    fn from(value: String) -> Self {
        Path::root().key(value)
    }
}

impl From<usize> for Path {
    fn from(value: usize) -> Self {
        Path::root().index(value)
    }
}

impl From<Segment> for Path {
    fn from(value: Segment) -> Self {
        Path::root().appending(value)
    }
}

impl From<Route> for Path {
    fn from(value: Route) -> Self {
        Self {
            routes: smallvec![value],
        }
    }
}

/// Unescape a pointer token (`~1` → `/`, `~0` → `~`)
fn unescape_pointer_token(token: &str) -> String {
    // ~1 first so that "~01" becomes "~1", not "/"
    token.replace("~1", "/").replace("~0", "~")
}

fn validate_escape_sequences(token: &str) -> std::result::Result<(), String> {
    let mut chars = token.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.peek() {
                Some('0') | Some('1') => {
                    chars.next();
                }
                Some(other) => {
                    return Err(format!(
                        "invalid escape sequence '~{}'; use '~0' for '~' and '~1' for '/'",
                        other
                    ));
                }
                None => {
                    return Err("incomplete escape sequence at end of token".to_string());
                }
            }
        }
    }
    Ok(())
}
