//! The compiled matcher graph.
//!
//! Nodes live in one arena and refer to each other by [`MatcherId`], so
//! recursive rules are plain index cycles. Named rules are reached through
//! [`MatcherKind::Ref`] nodes, which the parser resolves to the rule's root
//! the first time a branch reaches them.

use super::capture::Reducer;
use super::predicate::Predicate;
use super::token::TokenMatch;
use smol_str::SmolStr;
use std::fmt;

/// Index of a node in a [`MatcherGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatcherId(u32);

impl MatcherId {
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a named rule in a [`MatcherGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    /// Rule ids are handed out in definition order before compilation so
    /// that references can be compiled ahead of their target.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub enum MatcherKind<N> {
    /// Consumes one token of the given shape
    Token(TokenMatch),
    /// Matches without consuming anything
    Epsilon,
    /// Matches its children in order and reduces their captures to one
    Sequence {
        /// Shown in failure breadcrumbs when set
        name: Option<SmolStr>,
        children: Vec<MatcherId>,
        reduce: Reducer<N>,
    },
    /// Any one of the alternatives, all explored at once
    Branch(Vec<MatcherId>),
    /// Stands for the root of a named rule
    Ref(RuleId),
}

impl<N> fmt::Debug for MatcherKind<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(expected) => write!(f, "Token({})", expected),
            Self::Epsilon => f.write_str("Epsilon"),
            Self::Sequence { name, children, .. } => f
                .debug_struct("Sequence")
                .field("name", name)
                .field("children", children)
                .finish_non_exhaustive(),
            Self::Branch(alternatives) => f.debug_tuple("Branch").field(alternatives).finish(),
            Self::Ref(rule) => f.debug_tuple("Ref").field(rule).finish(),
        }
    }
}

#[derive(Debug)]
pub struct MatcherNode<N> {
    pub kind: MatcherKind<N>,
    /// Checked against the next token consumed after the node is entered
    pub predicates: Vec<Predicate>,
}

impl<N> MatcherNode<N> {
    pub fn new(kind: MatcherKind<N>, predicates: Vec<Predicate>) -> Self {
        Self { kind, predicates }
    }
}

#[derive(Debug, Clone)]
struct RuleSlot {
    name: SmolStr,
    root: MatcherId,
}

/// Arena of matcher nodes plus the table of named rules
#[derive(Debug)]
pub struct MatcherGraph<N> {
    nodes: Vec<MatcherNode<N>>,
    rules: Vec<RuleSlot>,
}

impl<N> Default for MatcherGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl<N> MatcherGraph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: MatcherNode<N>) -> MatcherId {
        let id = MatcherId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Overwrite a node reserved earlier, used to close cycles
    pub(crate) fn replace(&mut self, id: MatcherId, node: MatcherNode<N>) {
        self.nodes[id.index()] = node;
    }

    pub fn node(&self, id: MatcherId) -> &MatcherNode<N> {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a rule whose root is already compiled
    pub(crate) fn add_rule(&mut self, name: SmolStr, root: MatcherId) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.rules.push(RuleSlot { name, root });
        id
    }

    pub fn rule_root(&self, rule: RuleId) -> MatcherId {
        self.rules[rule.index()].root
    }

    pub fn rule_name(&self, rule: RuleId) -> &str {
        &self.rules[rule.index()].name
    }

    /// Breadcrumb name of a sequence node
    pub fn name(&self, id: MatcherId) -> Option<&SmolStr> {
        match &self.node(id).kind {
            MatcherKind::Sequence { name, .. } => name.as_ref(),
            _ => None,
        }
    }

    /// Number of slots of a sequence node (zero for other kinds)
    pub fn arity(&self, id: MatcherId) -> usize {
        match &self.node(id).kind {
            MatcherKind::Sequence { children, .. } => children.len(),
            _ => 0,
        }
    }

    /// The `slot`th child of a sequence node
    pub fn child(&self, id: MatcherId, slot: usize) -> Option<MatcherId> {
        match &self.node(id).kind {
            MatcherKind::Sequence { children, .. } => children.get(slot).copied(),
            _ => None,
        }
    }
}
