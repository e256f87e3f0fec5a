//! Test-only pattern builder: turns familiar pattern-literal syntax into a
//! `Node` tree so test tables read like regex literals instead of nested
//! constructor calls. This is scaffolding, not the upstream pattern
//! compiler — it panics on anything it does not understand (named groups,
//! flags, backreferences).

use crate::ast::{CharClass, Direction, Node, Polarity};
use crate::pattern::Pattern;

pub fn parse(pattern: &str) -> Pattern {
    let chars: Vec<char> = pattern.chars().collect();
    let mut groups = 0;
    let (node, end) = parse_alts(&chars, 0, &mut groups);
    assert_eq!(end, chars.len(), "unbalanced pattern: {pattern}");
    Pattern::new(node, groups).expect("test pattern should build a valid tree")
}

fn parse_alts(chars: &[char], start: usize, groups: &mut u32) -> (Node, usize) {
    let mut branches: Vec<Node> = Vec::new();
    let mut cur: Vec<Node> = Vec::new();
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            ')' => break,
            '|' => {
                branches.push(seq_node(std::mem::take(&mut cur)));
                i += 1;
            }
            '(' => {
                let (atom, end) = parse_group(chars, i, groups);
                i = quantify(chars, atom, end, &mut cur);
            }
            '[' => {
                let (atom, end) = parse_class(chars, i);
                i = quantify(chars, atom, end, &mut cur);
            }
            '\\' => {
                let (atom, end) = parse_escape(chars, i + 1);
                i = quantify(chars, atom, end, &mut cur);
            }
            '.' => {
                i = quantify(chars, Node::AnyChar, i + 1, &mut cur);
            }
            '^' => {
                cur.push(Node::AnchorStart);
                i += 1;
            }
            '$' => {
                cur.push(Node::AnchorEnd);
                i += 1;
            }
            ch => {
                i = quantify(chars, Node::literal(ch), i + 1, &mut cur);
            }
        }
    }
    let node = if branches.is_empty() {
        seq_node(cur)
    } else {
        branches.push(seq_node(cur));
        Node::Alternation(branches)
    };
    (node, i)
}

fn seq_node(mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1 {
        nodes.pop().unwrap()
    } else {
        Node::Sequence(nodes)
    }
}

fn parse_group(chars: &[char], start: usize, groups: &mut u32) -> (Node, usize) {
    let mut i = start + 1;
    if chars.get(i) == Some(&'?') {
        i += 1;
        let look = match chars.get(i) {
            Some(':') => None,
            Some('=') => Some((Direction::Ahead, Polarity::Positive)),
            Some('!') => Some((Direction::Ahead, Polarity::Negative)),
            Some('<') => {
                i += 1;
                match chars.get(i) {
                    Some('=') => Some((Direction::Behind, Polarity::Positive)),
                    Some('!') => Some((Direction::Behind, Polarity::Negative)),
                    other => panic!("unsupported group prefix (?<{other:?}"),
                }
            }
            other => panic!("unsupported group prefix (?{other:?}"),
        };
        i += 1;
        let (body, end) = parse_alts(chars, i, groups);
        assert_eq!(chars.get(end), Some(&')'), "unclosed group");
        let node = match look {
            None => Node::non_capturing(body),
            Some((direction, polarity)) => Node::lookaround(body, direction, polarity),
        };
        (node, end + 1)
    } else {
        // Capture indices are handed out in order of the opening paren,
        // before the body is parsed, matching host-language numbering
        // (minus one: ours are 0-based, group 0 there is the overall
        // match).
        let index = *groups;
        *groups += 1;
        let (body, end) = parse_alts(chars, i, groups);
        assert_eq!(chars.get(end), Some(&')'), "unclosed group");
        (Node::group(index, body), end + 1)
    }
}

/// Wraps `atom` in a repetition if a quantifier follows at `i`; pushes the
/// result and returns the position after it.
fn quantify(chars: &[char], atom: Node, i: usize, cur: &mut Vec<Node>) -> usize {
    let (min, max, mut end) = match chars.get(i) {
        Some('*') => (0, None, i + 1),
        Some('+') => (1, None, i + 1),
        Some('?') => (0, Some(1), i + 1),
        Some('{') => match parse_bounds(chars, i) {
            Some(bounds) => bounds,
            None => {
                // Not a quantifier, a literal brace.
                cur.push(atom);
                return i;
            }
        },
        _ => {
            cur.push(atom);
            return i;
        }
    };
    let greedy = if chars.get(end) == Some(&'?') {
        end += 1;
        false
    } else {
        true
    };
    cur.push(Node::repeat(atom, min, max, greedy));
    end
}

fn parse_bounds(chars: &[char], open: usize) -> Option<(u32, Option<u32>, usize)> {
    let (first, mut i) = parse_number(chars, open + 1)?;
    match chars.get(i)? {
        '}' => Some((first, Some(first), i + 1)),
        ',' => {
            i += 1;
            if chars.get(i) == Some(&'}') {
                Some((first, None, i + 1))
            } else {
                let (second, after) = parse_number(chars, i)?;
                (chars.get(after) == Some(&'}')).then_some((first, Some(second), after + 1))
            }
        }
        _ => None,
    }
}

fn parse_number(chars: &[char], start: usize) -> Option<(u32, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        return None;
    }
    let n = chars[start..i].iter().collect::<String>().parse().ok()?;
    Some((n, i))
}

fn parse_class(chars: &[char], start: usize) -> (Node, usize) {
    let mut i = start + 1;
    let negated = if chars.get(i) == Some(&'^') {
        i += 1;
        true
    } else {
        false
    };
    let mut ranges: Vec<(char, char)> = Vec::new();
    while i < chars.len() && chars[i] != ']' {
        let (lo, after) = class_char(chars, i);
        i = after;
        if chars.get(i) == Some(&'-') && i + 1 < chars.len() && chars[i + 1] != ']' {
            let (hi, after) = class_char(chars, i + 1);
            i = after;
            ranges.push((lo, hi));
        } else {
            ranges.push((lo, lo));
        }
    }
    assert!(i < chars.len(), "unterminated character class");
    (Node::Class(CharClass::new(ranges, negated)), i + 1)
}

fn class_char(chars: &[char], i: usize) -> (char, usize) {
    if chars[i] == '\\' && i + 1 < chars.len() {
        (unescape(chars[i + 1]), i + 2)
    } else {
        (chars[i], i + 1)
    }
}

const DIGIT: &[(char, char)] = &[('0', '9')];
const WORD: &[(char, char)] = &[('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')];
const SPACE: &[(char, char)] = &[
    (' ', ' '),
    ('\t', '\t'),
    ('\n', '\n'),
    ('\r', '\r'),
    ('\x0B', '\x0B'),
    ('\x0C', '\x0C'),
];

fn preset(ranges: &[(char, char)], negated: bool) -> Node {
    Node::Class(CharClass::new(ranges.to_vec(), negated))
}

fn parse_escape(chars: &[char], i: usize) -> (Node, usize) {
    let ch = chars.get(i).copied().expect("dangling backslash");
    let node = match ch {
        'd' => preset(DIGIT, false),
        'D' => preset(DIGIT, true),
        'w' => preset(WORD, false),
        'W' => preset(WORD, true),
        's' => preset(SPACE, false),
        'S' => preset(SPACE, true),
        'b' => Node::WordBoundary { negate: false },
        'B' => Node::WordBoundary { negate: true },
        '1'..='9' => panic!("backreferences are not supported"),
        other => Node::literal(unescape(other)),
    };
    (node, i + 1)
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'f' => '\x0C',
        'v' => '\x0B',
        '0' => '\0',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_groups_in_paren_order() {
        let pat = parse("(a(b))(c)");
        assert_eq!(pat.group_count(), 3);
    }

    #[test]
    fn groups_inside_lookarounds_are_counted() {
        let pat = parse("(?<=(?<!(x))(y))(z)");
        assert_eq!(pat.group_count(), 3);
    }

    #[test]
    fn lookbehind_shape() {
        let pat = parse("(?<!x)");
        assert!(matches!(
            pat.root(),
            Node::Lookaround {
                direction: Direction::Behind,
                polarity: Polarity::Negative,
                ..
            }
        ));
    }

    #[test]
    fn lazy_quantifier_shape() {
        let pat = parse("a*?");
        assert!(matches!(
            pat.root(),
            Node::Repetition {
                min: 0,
                max: None,
                greedy: false,
                ..
            }
        ));
    }

    #[test]
    fn bounded_quantifier_shape() {
        let pat = parse("a{2,5}");
        assert!(matches!(
            pat.root(),
            Node::Repetition {
                min: 2,
                max: Some(5),
                greedy: true,
                ..
            }
        ));
    }

    #[test]
    fn literal_brace_is_not_a_quantifier() {
        assert!(parse("a{x").is_match("a{x").unwrap());
    }
}
