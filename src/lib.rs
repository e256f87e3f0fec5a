//! Backtracking regular-expression engine core with full lookaround
//! support: lookahead and lookbehind assertions, positive and negative,
//! nested to arbitrary depth, with capture groups inside assertion bodies
//! resolved the way a host language expects — writes made inside a
//! satisfied positive assertion survive into the result, writes made
//! inside a negative assertion never do, and backtracking rolls abandoned
//! writes back to unset rather than to a stale value.
//!
//! The crate consumes an already-parsed [`Node`] tree; pattern-text
//! parsing, flag handling and Unicode tables live upstream. Lookbehind is
//! evaluated by running the same matcher core in the reverse direction,
//! ending exactly at the assertion's anchor position.
//!
//! ```
//! use relook::{Direction, Node, Pattern, Polarity};
//!
//! // (?<=(x))y
//! let root = Node::seq(vec![
//!     Node::lookaround(
//!         Node::group(0, Node::literal('x')),
//!         Direction::Behind,
//!         Polarity::Positive,
//!     ),
//!     Node::literal('y'),
//! ]);
//! let pattern = Pattern::new(root, 1).unwrap();
//! let m = pattern.find("xy").unwrap().unwrap();
//! assert_eq!((m.start(), m.end()), (1, 2));
//! assert_eq!(m.group(0).map(|s| (s.start, s.end)), Some((0, 1)));
//! ```

mod ast;
mod captures;
mod matcher;
mod pattern;

#[cfg(test)]
mod testpat;

pub use ast::{CharClass, Direction, Node, Polarity};
pub use captures::{CaptureSnapshot, CaptureStore, Span};
pub use pattern::{Error, Match, Pattern};
