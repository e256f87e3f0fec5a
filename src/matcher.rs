/// Backtracking matcher over the AST, shared by forward matching and
/// reverse-direction (lookbehind) matching.
///
/// Control flow uses explicit continuation frames (`Cont`) allocated on the
/// call stack: a frame describes what to run once the current node has
/// consumed its input. Backtracking is ordinary return of `None` up to the
/// nearest choice point still holding alternatives; each choice point took a
/// capture snapshot before its first alternative and restores it before
/// trying the next, so a slot written on an abandoned path goes back to
/// `Unset`, not to a stale value.
use crate::ast::{Direction, Node, Polarity, is_word_char};
use crate::captures::{CaptureStore, Span};

/// A configured step budget ran out mid-search. Unwinds the whole attempt;
/// the driver reports it distinctly from an ordinary failed match.
#[derive(Debug)]
pub(crate) struct StepLimitReached;

type RunResult = Result<Option<usize>, StepLimitReached>;

/// Direction of input consumption for the current (sub-)attempt. A
/// lookbehind body scans `Reverse` from its anchor; a lookahead nested
/// inside it scans `Forward` again — the lookaround node decides, not the
/// enclosing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Forward,
    Reverse,
}

#[derive(Clone, Copy)]
struct Rep<'c> {
    body: &'c Node,
    min: u32,
    max: Option<u32>,
    greedy: bool,
}

enum Cont<'c> {
    /// End of a (sub-)attempt: accept at the current position. Lookaround
    /// bodies end here too — they are anchored at where they start, not
    /// where they end.
    Accept,
    /// Remaining children of a sequence.
    Seq {
        nodes: &'c [Node],
        next: &'c Cont<'c>,
    },
    /// Commit a capturing group opened at `open` once its body completes.
    Close {
        index: u32,
        open: usize,
        next: &'c Cont<'c>,
    },
    /// A repetition iteration completed; `count` iterations done, the
    /// current one entered at `entry`.
    Iterate {
        rep: Rep<'c>,
        count: u32,
        entry: usize,
        next: &'c Cont<'c>,
    },
}

pub(crate) struct Matcher<'a> {
    input: &'a [char],
    caps: CaptureStore,
    steps_left: Option<u64>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(input: &'a [char], group_count: u32, step_limit: Option<u64>) -> Self {
        Matcher {
            input,
            caps: CaptureStore::new(group_count),
            steps_left: step_limit,
        }
    }

    /// One anchored attempt: the pattern must match starting exactly at
    /// `at`, scanning forward. On success the capture store holds the final
    /// slots for this attempt; on failure its contents are meaningless and
    /// the next attempt must start from `clear`.
    pub(crate) fn try_at(&mut self, root: &Node, at: usize) -> Result<Option<Span>, StepLimitReached> {
        self.caps.clear();
        match self.run(root, at, Scan::Forward, &Cont::Accept)? {
            Some(end) => Ok(Some(Span::new(at, end))),
            None => Ok(None),
        }
    }

    pub(crate) fn into_captures(self) -> CaptureStore {
        self.caps
    }

    fn tick(&mut self) -> Result<(), StepLimitReached> {
        if let Some(left) = &mut self.steps_left {
            if *left == 0 {
                return Err(StepLimitReached);
            }
            *left -= 1;
        }
        Ok(())
    }

    /// Next input unit in scan order, with the position after consuming it.
    fn peek(&self, pos: usize, scan: Scan) -> Option<(char, usize)> {
        match scan {
            Scan::Forward if pos < self.input.len() => Some((self.input[pos], pos + 1)),
            Scan::Reverse if pos > 0 => Some((self.input[pos - 1], pos - 1)),
            _ => None,
        }
    }

    fn run(&mut self, node: &Node, pos: usize, scan: Scan, cont: &Cont<'_>) -> RunResult {
        self.tick()?;
        match node {
            Node::Class(class) => match self.peek(pos, scan) {
                Some((ch, after)) if class.matches(ch) => self.resume(cont, after, scan),
                _ => Ok(None),
            },
            Node::AnyChar => match self.peek(pos, scan) {
                Some((_, after)) => self.resume(cont, after, scan),
                None => Ok(None),
            },
            Node::Sequence(children) => self.run_seq(children, pos, scan, cont),
            Node::Alternation(branches) => {
                let snap = self.caps.snapshot();
                for branch in branches {
                    if let Some(end) = self.run(branch, pos, scan, cont)? {
                        return Ok(Some(end));
                    }
                    self.caps.restore(&snap);
                }
                Ok(None)
            }
            Node::Repetition {
                body,
                min,
                max,
                greedy,
            } => {
                let rep = Rep {
                    body: body.as_ref(),
                    min: *min,
                    max: *max,
                    greedy: *greedy,
                };
                self.iterate(rep, 0, pos, scan, cont)
            }
            Node::Group { index, body } => match index {
                Some(i) => {
                    let close = Cont::Close {
                        index: *i,
                        open: pos,
                        next: cont,
                    };
                    self.run(body, pos, scan, &close)
                }
                None => self.run(body, pos, scan, cont),
            },
            Node::Lookaround {
                body,
                direction,
                polarity,
            } => {
                if self.assert(body, *direction, *polarity, pos)? {
                    self.resume(cont, pos, scan)
                } else {
                    Ok(None)
                }
            }
            Node::AnchorStart => {
                if pos == 0 {
                    self.resume(cont, pos, scan)
                } else {
                    Ok(None)
                }
            }
            Node::AnchorEnd => {
                if pos == self.input.len() {
                    self.resume(cont, pos, scan)
                } else {
                    Ok(None)
                }
            }
            Node::WordBoundary { negate } => {
                let before = pos > 0 && is_word_char(self.input[pos - 1]);
                let after = pos < self.input.len() && is_word_char(self.input[pos]);
                if (before != after) != *negate {
                    self.resume(cont, pos, scan)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn run_seq(&mut self, nodes: &[Node], pos: usize, scan: Scan, cont: &Cont<'_>) -> RunResult {
        // Reverse scanning visits sequence children right to left.
        let split = match scan {
            Scan::Forward => nodes.split_first(),
            Scan::Reverse => nodes.split_last(),
        };
        match split {
            None => self.resume(cont, pos, scan),
            Some((child, rest)) => {
                let next = Cont::Seq { nodes: rest, next: cont };
                self.run(child, pos, scan, &next)
            }
        }
    }

    fn resume(&mut self, cont: &Cont<'_>, pos: usize, scan: Scan) -> RunResult {
        self.tick()?;
        match cont {
            Cont::Accept => Ok(Some(pos)),
            Cont::Seq { nodes, next } => self.run_seq(nodes, pos, scan, next),
            Cont::Close { index, open, next } => {
                // Normalize so start <= end regardless of scan direction.
                let span = match scan {
                    Scan::Forward => Span::new(*open, pos),
                    Scan::Reverse => Span::new(pos, *open),
                };
                self.caps.commit(*index, span);
                self.resume(next, pos, scan)
            }
            Cont::Iterate {
                rep,
                count,
                entry,
                next,
            } => {
                if pos == *entry {
                    // The iteration consumed nothing; repeating it cannot
                    // change the outcome, so stop expanding. This also
                    // satisfies any remaining mandatory count.
                    self.resume(next, pos, scan)
                } else {
                    self.iterate(*rep, *count, pos, scan, next)
                }
            }
        }
    }

    /// Decide whether to run one more iteration of `rep` (`count` done so
    /// far) or to hand over to the continuation. Greedy tries the extra
    /// iteration first, lazy tries the continuation first; either order is a
    /// choice point and restores captures between the two arms.
    fn iterate(
        &mut self,
        rep: Rep<'_>,
        count: u32,
        pos: usize,
        scan: Scan,
        cont: &Cont<'_>,
    ) -> RunResult {
        if count < rep.min {
            // Mandatory iteration, no alternative to fall back to.
            let iter = Cont::Iterate {
                rep,
                count: count + 1,
                entry: pos,
                next: cont,
            };
            return self.run(rep.body, pos, scan, &iter);
        }
        let can_expand = rep.max.is_none_or(|m| count < m);
        let snap = self.caps.snapshot();
        if rep.greedy {
            if can_expand {
                let iter = Cont::Iterate {
                    rep,
                    count: count + 1,
                    entry: pos,
                    next: cont,
                };
                if let Some(end) = self.run(rep.body, pos, scan, &iter)? {
                    return Ok(Some(end));
                }
                self.caps.restore(&snap);
            }
            self.resume(cont, pos, scan)
        } else {
            if let Some(end) = self.resume(cont, pos, scan)? {
                return Ok(Some(end));
            }
            self.caps.restore(&snap);
            if can_expand {
                let iter = Cont::Iterate {
                    rep,
                    count: count + 1,
                    entry: pos,
                    next: cont,
                };
                return self.run(rep.body, pos, scan, &iter);
            }
            Ok(None)
        }
    }

    /// Assertion evaluator. Runs `body` as an independent sub-attempt
    /// anchored at `pos` (forward for lookahead, reverse for lookbehind) and
    /// applies the polarity rules to the capture store:
    ///
    /// - positive, body matched: writes from the sub-attempt are kept;
    /// - positive, body failed: restore to the pre-attempt snapshot;
    /// - negative: restore unconditionally — the outer match must never
    ///   observe captures made inside a negative assertion's body, and a
    ///   failed body leaves its slots `Unset` for this attempt.
    ///
    /// Assertion bodies are atomic: the first way the body matches is the
    /// only one considered, the engine never backtracks into a satisfied
    /// assertion.
    fn assert(
        &mut self,
        body: &Node,
        direction: Direction,
        polarity: Polarity,
        pos: usize,
    ) -> Result<bool, StepLimitReached> {
        let snap = self.caps.snapshot();
        let scan = match direction {
            Direction::Ahead => Scan::Forward,
            Direction::Behind => Scan::Reverse,
        };
        let matched = self.run(body, pos, scan, &Cont::Accept)?.is_some();
        match polarity {
            Polarity::Positive => {
                if !matched {
                    self.caps.restore(&snap);
                }
                Ok(matched)
            }
            Polarity::Negative => {
                self.caps.restore(&snap);
                Ok(!matched)
            }
        }
    }
}
