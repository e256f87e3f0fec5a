/// Public entry points: AST validation, the unanchored match driver, and
/// result packaging.
use std::fmt;

use rustc_hash::FxHashSet;

use crate::ast::Node;
use crate::captures::Span;
use crate::matcher::Matcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A structural invariant of the input AST is violated. This is a bug
    /// in the upstream pattern compiler, not something a caller can recover
    /// from by retrying.
    MalformedAst(String),
    /// The configured step budget ran out before the search was decided.
    /// Never reported as an ordinary "no match" — the work is undecided.
    StepLimitExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedAst(msg) => write!(f, "malformed pattern AST: {msg}"),
            Error::StepLimitExceeded => {
                f.write_str("step limit exceeded before the match was decided")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A compiled-and-validated pattern. Immutable once built, so a `Pattern`
/// can be shared freely across threads; every `find`/`match` call owns its
/// own capture store and position state.
#[derive(Debug, Clone)]
pub struct Pattern {
    root: Node,
    group_count: u32,
    step_limit: Option<u64>,
}

impl Pattern {
    /// Takes ownership of an externally-produced AST together with the
    /// total number of capturing groups, and checks the structural
    /// invariants the matcher relies on: capture indices unique and dense
    /// in `0..group_count`, bounded repetitions with `max >= min`.
    pub fn new(root: Node, group_count: u32) -> Result<Self, Error> {
        let mut seen = FxHashSet::default();
        validate(&root, group_count, &mut seen)?;
        if seen.len() != group_count as usize {
            for index in 0..group_count {
                if !seen.contains(&index) {
                    return Err(Error::MalformedAst(format!(
                        "capture index {index} never appears in the tree"
                    )));
                }
            }
        }
        Ok(Pattern {
            root,
            group_count,
            step_limit: None,
        })
    }

    /// Caller-imposed bound on matcher steps per `find`/`match` call.
    /// Matching is exponential in the worst case; without a limit a call
    /// simply runs until decided.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    pub(crate) fn root(&self) -> &Node {
        &self.root
    }

    /// Unanchored search from the start of `text`.
    pub fn find(&self, text: &str) -> Result<Option<Match>, Error> {
        self.find_at(text, 0)
    }

    /// Unanchored search trying start offsets `start, start+1, ...` until
    /// one attempt succeeds or all are exhausted. Offsets are char indices;
    /// a `start` past the end of `text` finds nothing. The step budget, if
    /// any, covers the whole scan, not each attempt separately.
    pub fn find_at(&self, text: &str, start: usize) -> Result<Option<Match>, Error> {
        let input: Vec<char> = text.chars().collect();
        if start > input.len() {
            return Ok(None);
        }
        let mut matcher = Matcher::new(&input, self.group_count, self.step_limit);
        for at in start..=input.len() {
            match matcher.try_at(&self.root, at) {
                Ok(Some(span)) => return Ok(Some(Match::package(span, matcher))),
                Ok(None) => continue,
                Err(_) => return Err(Error::StepLimitExceeded),
            }
        }
        Ok(None)
    }

    /// Single attempt anchored exactly at `at`; no other start offsets are
    /// tried.
    pub fn match_at(&self, text: &str, at: usize) -> Result<Option<Match>, Error> {
        let input: Vec<char> = text.chars().collect();
        if at > input.len() {
            return Ok(None);
        }
        let mut matcher = Matcher::new(&input, self.group_count, self.step_limit);
        match matcher.try_at(&self.root, at) {
            Ok(Some(span)) => Ok(Some(Match::package(span, matcher))),
            Ok(None) => Ok(None),
            Err(_) => Err(Error::StepLimitExceeded),
        }
    }

    pub fn is_match(&self, text: &str) -> Result<bool, Error> {
        Ok(self.find(text)?.is_some())
    }
}

fn validate(node: &Node, group_count: u32, seen: &mut FxHashSet<u32>) -> Result<(), Error> {
    match node {
        Node::Class(_)
        | Node::AnyChar
        | Node::AnchorStart
        | Node::AnchorEnd
        | Node::WordBoundary { .. } => Ok(()),
        Node::Sequence(children) | Node::Alternation(children) => {
            for child in children {
                validate(child, group_count, seen)?;
            }
            Ok(())
        }
        Node::Repetition { body, min, max, .. } => {
            if let Some(max) = max
                && max < min
            {
                return Err(Error::MalformedAst(format!(
                    "repetition bounds inverted: max {max} < min {min}"
                )));
            }
            validate(body, group_count, seen)
        }
        Node::Group { index, body } => {
            if let Some(index) = index {
                if *index >= group_count {
                    return Err(Error::MalformedAst(format!(
                        "capture index {index} out of range for {group_count} groups"
                    )));
                }
                if !seen.insert(*index) {
                    return Err(Error::MalformedAst(format!(
                        "duplicate capture index {index}"
                    )));
                }
            }
            validate(body, group_count, seen)
        }
        Node::Lookaround { body, .. } => validate(body, group_count, seen),
    }
}

/// A successful match: the overall span (the implicit group 0) and one slot
/// per capturing group, `None` for groups not traversed on the winning
/// path. All offsets are char indices into the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    span: Span,
    groups: Vec<Option<Span>>,
}

impl Match {
    fn package(span: Span, matcher: Matcher<'_>) -> Self {
        Match {
            span,
            groups: matcher.into_captures().into_slots(),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Capture group `index` (0-based; callers used to host-language
    /// numbering where group 0 is the overall match subtract one).
    pub fn group(&self, index: u32) -> Option<Span> {
        self.groups[index as usize]
    }

    pub fn groups(&self) -> &[Option<Span>] {
        &self.groups
    }
}
