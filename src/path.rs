//! Locating a value inside a schema tree.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use smallvec::SmallVec;


//------------ Segment -------------------------------------------------------

/// One step on the way from the root value to a nested value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Segment {
    /// A named component, i.e., a sequence field or a choice alternative.
    Name(String),

    /// The position of an element in a SEQUENCE OF or SET OF value.
    Index(usize),
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Name(name.into())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Name(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}


//------------ Path ----------------------------------------------------------

/// The path to a value, outermost segment first.
///
/// Paths show up in two places: errors carry the path to the value that
/// caused them, and an [`Observer`][crate::Observer] receives the path of
/// the value currently being decoded.
///
/// When displayed, names are separated by dots and indexes are given in
/// square brackets, e.g., `components[2].invoke.opcode`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Path(SmallVec<[Segment; 4]>);

impl Path {
    /// Creates a new, empty path denoting the root value.
    pub fn new() -> Self {
        Path(SmallVec::new())
    }

    /// Returns whether the path is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over the segments, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    /// Appends a segment at the inner end of the path.
    pub(crate) fn push(&mut self, segment: Segment) {
        self.0.push(segment)
    }

    /// Removes the innermost segment.
    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Adds a segment at the outer end of the path.
    ///
    /// Errors are built bottom up while the recursion unwinds, so each
    /// enclosing level prepends its own segment.
    pub(crate) fn push_outer(&mut self, segment: Segment) {
        self.0.insert(0, segment)
    }
}


//--- Display

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Name(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let mut path = Path::new();
        assert_eq!(path.to_string(), "");
        path.push_outer("opcode".into());
        path.push_outer("invoke".into());
        path.push_outer(Segment::Index(2));
        path.push_outer("components".into());
        assert_eq!(path.to_string(), "components[2].invoke.opcode");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn push_and_pop() {
        let mut path = Path::new();
        path.push("outer".into());
        path.push(Segment::Index(0));
        assert_eq!(path.to_string(), "outer[0]");
        path.pop();
        path.push("inner".into());
        assert_eq!(path.to_string(), "outer.inner");
    }
}
