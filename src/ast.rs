/// AST consumed by the matcher. Produced by an external pattern compiler;
/// this crate never sees pattern source text. Capture indices are assigned
/// by that compiler, are dense in `0..group_count`, and do not depend on
/// which alternation branch is taken at match time.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A one-character class. Single literals are one-range classes; case
    /// folding is resolved into the class itself, not a matcher flag.
    Class(CharClass),
    /// Matches any single unit.
    AnyChar,
    Sequence(Vec<Node>),
    /// Branches tried in order; first branch whose continuation also
    /// succeeds wins.
    Alternation(Vec<Node>),
    Repetition {
        body: Box<Node>,
        min: u32,
        /// `None` means unbounded.
        max: Option<u32>,
        greedy: bool,
    },
    Group {
        /// `None` for non-capturing groups.
        index: Option<u32>,
        body: Box<Node>,
    },
    Lookaround {
        body: Box<Node>,
        direction: Direction,
        polarity: Polarity,
    },
    AnchorStart,
    AnchorEnd,
    WordBoundary {
        negate: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ahead,
    Behind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Set of characters given as inclusive ranges. `case_insensitive` makes
/// membership tests compare lowercased forms, which is the comparison
/// semantics injected by the upstream compiler for `i`-flagged patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    pub ranges: Vec<(char, char)>,
    pub negated: bool,
    pub case_insensitive: bool,
}

impl CharClass {
    pub fn new(ranges: Vec<(char, char)>, negated: bool) -> Self {
        CharClass {
            ranges,
            negated,
            case_insensitive: false,
        }
    }

    pub fn single(ch: char) -> Self {
        CharClass::new(vec![(ch, ch)], false)
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn matches(&self, ch: char) -> bool {
        let in_ranges = if self.case_insensitive {
            self.ranges
                .iter()
                .any(|&(lo, hi)| char_in_range_ic(ch, lo, hi))
        } else {
            self.ranges.iter().any(|&(lo, hi)| ch >= lo && ch <= hi)
        };
        in_ranges != self.negated
    }
}

fn char_in_range_ic(ch: char, lo: char, hi: char) -> bool {
    for c in ch.to_lowercase() {
        for l in lo.to_lowercase() {
            for h in hi.to_lowercase() {
                if c >= l && c <= h {
                    return true;
                }
            }
        }
    }
    false
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

// Convenience constructors, mostly for callers assembling trees by hand.

impl Node {
    pub fn literal(ch: char) -> Node {
        Node::Class(CharClass::single(ch))
    }

    pub fn seq(children: Vec<Node>) -> Node {
        Node::Sequence(children)
    }

    pub fn alt(branches: Vec<Node>) -> Node {
        Node::Alternation(branches)
    }

    pub fn group(index: u32, body: Node) -> Node {
        Node::Group {
            index: Some(index),
            body: Box::new(body),
        }
    }

    pub fn non_capturing(body: Node) -> Node {
        Node::Group {
            index: None,
            body: Box::new(body),
        }
    }

    pub fn repeat(body: Node, min: u32, max: Option<u32>, greedy: bool) -> Node {
        Node::Repetition {
            body: Box::new(body),
            min,
            max,
            greedy,
        }
    }

    pub fn lookaround(body: Node, direction: Direction, polarity: Polarity) -> Node {
        Node::Lookaround {
            body: Box::new(body),
            direction,
            polarity,
        }
    }
}
