//! Breadth-parallel evaluation of a matcher graph
//!
//! The parser never backtracks. It keeps every grammar alternative that is
//! still viable as an active branch and advances all of them in lock-step,
//! one token at a time:
//!
//! ```text
//! feed(token)
//!     ↓
//! expand   → walk each branch through epsilons, sequences, refs and
//!            splits until it waits on a token node
//!     ↓
//! consume  → test every waiting branch against the token; survivors
//!            append a capture, dead branches leave a failure behind
//!     ↓
//! no branches left → the round's failures become diagnostics
//! ```
//!
//! A branch whose entry rule completes is only a result if the input ends
//! right there: the completed capture is held back until the next token
//! and dropped if that token is not the end of input.
//!
//! Branch order is deterministic (reverse registration, splits inserted at
//! the split point), so ambiguous results always come back in the same
//! order.

use super::capture::Capture;
use super::chain::CaptureChain;
use super::errors::{Diagnostic, FailureKind, FailureSet, RulePath};
use super::grammar::Grammar;
use super::lexer::{LexError, TokenSource};
use super::matcher::{MatcherId, MatcherKind, RuleId};
use super::predicate::{Predicate, PredicateState};
use super::token::{Token, TokenKind, TokenMatch};
use crate::base::{Position, Span};
use rustc_hash::FxHashSet;
use std::fmt;
use std::rc::Rc;

/// Steps a single branch may take between two tokens. Cycles are caught
/// by [`Branch::enter`]; this only bounds pathological expansion.
const EXPANSION_LIMIT: usize = 100_000;

/// Identifies one active branch for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(u32);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One live way of matching the input so far
struct Branch<N> {
    id: BranchId,
    node: MatcherId,
    chain: Rc<CaptureChain<N>>,
    /// Checked against the next token this branch consumes
    pending: Vec<Predicate>,
    /// Expansion steps since the last consumed token, carried across splits
    steps: usize,
    /// Sequences and references entered since the last consumed token,
    /// with the frame (id and length) they were entered from
    trail: FxHashSet<(MatcherId, u32, usize)>,
}

impl<N: Clone> Branch<N> {
    /// Record entering `node` from the current frame.
    ///
    /// Returns false if the branch already entered `node` from a frame that
    /// is still open and has not grown since: expanding further would
    /// repeat the same descent forever.
    fn enter(&mut self, node: MatcherId) -> bool {
        let revisited = self
            .chain
            .frames()
            .any(|frame| self.trail.contains(&(node, frame.id(), frame.len())));
        if revisited {
            return false;
        }
        self.trail.insert((node, self.chain.id(), self.chain.len()));
        true
    }
}

/// A complete parse of the entry rule, checked against the next token
struct PartialResult<N> {
    result: Capture<N>,
    predicates: Vec<Predicate>,
    path: RulePath,
    /// The parse stopped before the end of input, so the next token must
    /// be the end
    needs_end: bool,
}

/// How a capture moved a branch along
enum Advance {
    /// The branch now waits on its next slot
    Continue,
    /// The root frame completed and the branch was retired
    Retired,
}

pub struct Parser<'g, N> {
    grammar: &'g Grammar<N>,
    branches: Vec<Branch<N>>,
    partials: Vec<PartialResult<N>>,
    results: Vec<Capture<N>>,
    last_span: Span,
    diagnostics: Vec<Diagnostic>,
    next_id: u32,
    next_frame: u32,
    /// The token being consumed is the end of input
    at_end: bool,
    finished: bool,
}

impl<'g, N: Clone> Parser<'g, N> {
    /// A parser for `entry` over input starting at `start`
    pub fn new(grammar: &'g Grammar<N>, entry: RuleId, start: Position) -> Self {
        let root = Branch {
            id: BranchId(0),
            node: grammar.graph().rule_root(entry),
            chain: CaptureChain::root(),
            pending: Vec::new(),
            steps: 0,
            trail: FxHashSet::default(),
        };
        tracing::trace!("[PARSER] start at rule '{}'", grammar.graph().rule_name(entry));
        Self {
            grammar,
            branches: vec![root],
            partials: Vec::new(),
            results: Vec::new(),
            last_span: Span::empty(start),
            diagnostics: Vec::new(),
            next_id: 1,
            next_frame: 1,
            at_end: false,
            finished: false,
        }
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Pull tokens until the end of input or until the parse has failed,
    /// then [`finish`](Self::finish).
    ///
    /// A lexical error stops the parse and is returned as is.
    pub fn parse(&mut self, source: &mut impl TokenSource) -> Result<(), LexError> {
        loop {
            let token = source.next_token()?;
            if token.is_eof() {
                break;
            }
            self.feed(token);
            if self.has_error() {
                return Ok(());
            }
        }
        self.finish();
        Ok(())
    }

    /// Feed the synthetic end-of-input token, right after the last token
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.feed(Token::eof(Span::empty(self.last_span.end)));
        tracing::debug!(
            "[PARSER] finished with {} result(s), {} diagnostic(s), {} open branch(es)",
            self.results.len(),
            self.diagnostics.len(),
            self.branches.len()
        );
    }

    /// Run one expand/consume round for `token`.
    ///
    /// Tokens fed after every branch has died are ignored.
    pub fn feed(&mut self, token: Token) {
        if self.branches.is_empty() && self.partials.is_empty() {
            tracing::trace!("[PARSER] ignoring {}: nothing left to match", token);
            return;
        }

        self.expand();
        tracing::trace!("[PARSER] feed {} to {} branch(es)", token, self.branches.len());

        let state = PredicateState {
            next: &token,
            last: self.last_span,
        };
        let mut failures: Vec<(FailureKind, RulePath)> = Vec::new();
        // Parses that stopped short of this token
        let mut overrun: Vec<(FailureKind, RulePath)> = Vec::new();

        for partial in std::mem::take(&mut self.partials) {
            let failed: Vec<FailureKind> = partial
                .predicates
                .iter()
                .filter(|p| !p.test(&state))
                .map(|p| p.failure(&state))
                .collect();
            if !failed.is_empty() {
                failures.extend(failed.into_iter().map(|kind| (kind, partial.path.clone())));
            } else if partial.needs_end && !token.is_eof() {
                tracing::trace!("[PARSER] complete parse discarded: input continues with {}", token);
                let end = TokenMatch::kind(TokenKind::Eof);
                overrun.push((FailureKind::mismatch(&end, &token), partial.path));
            } else {
                tracing::debug!("[PARSER] deferred result confirmed by {}", token);
                self.results.push(partial.result);
            }
        }

        self.at_end = token.is_eof();

        // Failures of each dead branch, last branch first
        let mut dead: Vec<(Vec<FailureKind>, RulePath)> = Vec::new();
        let mut i = self.branches.len();
        while i > 0 {
            i -= 1;
            let failed = self.test_branch(i, &state);
            if failed.is_empty() {
                let branch = &mut self.branches[i];
                branch.pending.clear();
                branch.steps = 0;
                branch.trail.clear();
                self.advance(i, Capture::Token(token.clone()));
            } else {
                let branch = self.branches.remove(i);
                tracing::trace!("[PARSER] branch {} died on {}", branch.id, token);
                dead.push((failed, branch.chain.breadcrumb()));
            }
        }

        for (kinds, path) in dead.into_iter().rev() {
            failures.extend(kinds.into_iter().map(|kind| (kind, path.clone())));
        }

        self.last_span = token.span;

        // Dead branches only explain anything once nothing else is left
        if !self.branches.is_empty() || !self.partials.is_empty() || !self.results.is_empty() {
            return;
        }
        // A parse that ended early only explains the failure when no
        // branch got further
        let failures = if failures.is_empty() { overrun } else { failures };
        if !failures.is_empty() {
            let mut set = FailureSet::new();
            for (kind, path) in failures {
                set.insert(kind, path);
            }
            self.diagnostics = set.into_diagnostics(&token);
            tracing::debug!(
                "[PARSER] all branches died at {} with {} diagnostic(s)",
                token.span.start,
                self.diagnostics.len()
            );
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// True when the parse failed: diagnostics exist and nothing matched
    pub fn has_error(&self) -> bool {
        !self.diagnostics.is_empty()
            && self.branches.is_empty()
            && self.partials.is_empty()
            && self.results.is_empty()
    }

    pub fn results(&self) -> &[Capture<N>] {
        &self.results
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn active_branches(&self) -> usize {
        self.branches.len()
    }

    /// The chain each active branch is filling, in branch order
    pub fn branch_chains(&self) -> impl Iterator<Item = (BranchId, &CaptureChain<N>)> {
        self.branches.iter().map(|b| (b.id, b.chain.as_ref()))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The results, or the diagnostics when there are none.
    ///
    /// `Err` with no diagnostics means input ended while branches were
    /// still waiting for tokens.
    pub fn into_result(self) -> Result<Vec<Capture<N>>, Vec<Diagnostic>> {
        if self.results.is_empty() {
            Err(self.diagnostics)
        } else {
            Ok(self.results)
        }
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    fn expand(&mut self) {
        let mut i = self.branches.len();
        while i > 0 {
            i -= 1;
            if let Some(split) = self.expand_branch(i) {
                // Continue with the last of the new branches
                i += split;
            }
        }
    }

    /// Rewrite branch `i` until it waits on a token node.
    ///
    /// Returns the number of branches it was split into, if it was split.
    fn expand_branch(&mut self, i: usize) -> Option<usize> {
        let grammar = self.grammar;
        let graph = grammar.graph();
        while self.branches[i].steps < EXPANSION_LIMIT {
            self.branches[i].steps += 1;
            let id = self.branches[i].node;
            let node = graph.node(id);
            self.branches[i].pending.extend(node.predicates.iter().cloned());
            if matches!(node.kind, MatcherKind::Sequence { .. } | MatcherKind::Ref(_)) && !self.branches[i].enter(id) {
                let branch = self.branches.remove(i);
                tracing::debug!(
                    "[PARSER] branch {} dropped: it re-entered node {} without consuming a token",
                    branch.id,
                    id.index()
                );
                return None;
            }

            match &node.kind {
                MatcherKind::Token(_) => return None,
                MatcherKind::Epsilon => {
                    let empty = Capture::Empty(Span::empty(self.last_span.end));
                    if let Advance::Retired = self.advance(i, empty) {
                        return None;
                    }
                }
                MatcherKind::Sequence { name, children, .. } => {
                    let Some(&first) = children.first() else {
                        self.branches.remove(i);
                        return None;
                    };
                    let frame = self.fresh_frame();
                    let branch = &mut self.branches[i];
                    let parent = Rc::clone(&branch.chain);
                    branch.chain = CaptureChain::push(parent, frame, id, name.clone(), children.len());
                    branch.node = first;
                }
                MatcherKind::Branch(alternatives) => {
                    let Branch {
                        id,
                        chain,
                        pending,
                        steps,
                        trail,
                        ..
                    } = self.branches.remove(i);
                    let split: Vec<Branch<N>> = alternatives
                        .iter()
                        .map(|&node| Branch {
                            id: self.fresh_id(),
                            node,
                            chain: Rc::clone(&chain),
                            pending: pending.clone(),
                            steps,
                            trail: trail.clone(),
                        })
                        .collect();
                    tracing::trace!(
                        "[PARSER] branch {} split {} ways (chain shared by {})",
                        id,
                        split.len(),
                        Rc::strong_count(&chain) - 1
                    );
                    let count = split.len();
                    self.branches.splice(i..i, split);
                    return Some(count);
                }
                MatcherKind::Ref(rule) => {
                    self.branches[i].node = graph.rule_root(*rule);
                }
            }
        }

        let branch = self.branches.remove(i);
        tracing::warn!(
            "[PARSER] branch {} dropped after {} steps without reaching a token",
            branch.id,
            branch.steps
        );
        None
    }

    fn fresh_id(&mut self) -> BranchId {
        let id = BranchId(self.next_id);
        self.next_id += 1;
        id
    }

    fn fresh_frame(&mut self) -> u32 {
        let frame = self.next_frame;
        self.next_frame += 1;
        frame
    }

    // =========================================================================
    // Consumption
    // =========================================================================

    /// Failures of branch `i` against the next token; empty if it matches
    fn test_branch(&self, i: usize, state: &PredicateState<'_>) -> Vec<FailureKind> {
        let branch = &self.branches[i];
        // Expansion leaves every branch on a token node
        let MatcherKind::Token(expected) = &self.grammar.graph().node(branch.node).kind else {
            unreachable!("branch {} is not waiting on a token", branch.id);
        };

        if !expected.matches(state.next) {
            return vec![FailureKind::mismatch(expected, state.next)];
        }

        branch
            .pending
            .iter()
            .filter(|p| !p.test(state))
            .map(|p| p.failure(state))
            .collect()
    }

    /// Append `capture` to branch `i` and run the completion cascade.
    ///
    /// Complete frames are reduced and handed to their parent until a frame
    /// still has open slots. When the root completes the branch is removed.
    /// Its capture is a result straight away only if the end of input was
    /// just consumed and no predicate is pending; otherwise it waits for
    /// the next token as a partial result.
    fn advance(&mut self, i: usize, capture: Capture<N>) -> Advance {
        let grammar = self.grammar;
        let graph = grammar.graph();
        let branch = &mut self.branches[i];
        let mut capture = capture;
        // Where a deferred result would be reported from
        let path = if branch.pending.is_empty() {
            RulePath::default()
        } else {
            branch.chain.breadcrumb()
        };

        loop {
            CaptureChain::append(&mut branch.chain, capture);
            if !branch.chain.is_complete() {
                let slot = branch.chain.len();
                if let Some(next) = branch.chain.sequence().and_then(|seq| graph.child(seq, slot)) {
                    branch.node = next;
                    return Advance::Continue;
                }
            }

            let done = CaptureChain::take_completed(&mut branch.chain);
            let reduced = match done.sequence {
                Some(sequence) => match &graph.node(sequence).kind {
                    MatcherKind::Sequence { reduce, .. } => reduce(done.captures),
                    _ => Capture::list(done.captures),
                },
                None => done
                    .captures
                    .into_iter()
                    .next()
                    .unwrap_or(Capture::Empty(Span::empty(self.last_span.end))),
            };

            match done.parent {
                Some(parent) => {
                    branch.chain = parent;
                    capture = reduced;
                }
                None => {
                    let branch = self.branches.remove(i);
                    if self.at_end && branch.pending.is_empty() {
                        tracing::debug!("[PARSER] branch {} produced a result", branch.id);
                        self.results.push(reduced);
                    } else {
                        tracing::trace!(
                            "[PARSER] branch {} completed, pending {} predicate(s){}",
                            branch.id,
                            branch.pending.len(),
                            if self.at_end { "" } else { " and the end of input" }
                        );
                        self.partials.push(PartialResult {
                            result: reduced,
                            predicates: branch.pending,
                            path,
                            needs_end: !self.at_end,
                        });
                    }
                    return Advance::Retired;
                }
            }
        }
    }
}

impl<N> fmt::Debug for Parser<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("branches", &self.branches.len())
            .field("partials", &self.partials.len())
            .field("results", &self.results.len())
            .field("diagnostics", &self.diagnostics)
            .field("finished", &self.finished)
            .finish()
    }
}
