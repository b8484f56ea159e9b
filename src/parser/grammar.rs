//! Grammar definition and compilation.
//!
//! Grammars are written as [`Pattern`] values and registered under rule
//! names in a [`GrammarBuilder`]. [`GrammarBuilder::build`] compiles every
//! rule once into a [`MatcherGraph`]; the resulting [`Grammar`] is immutable
//! and can be shared between threads and parsers.
//!
//! ```
//! use lockstep::parser::{GrammarBuilder, Pattern, TokenKind};
//!
//! let mut g = GrammarBuilder::<()>::new();
//! g.define("main", Pattern::sequence(vec![
//!     Pattern::delimited(Pattern::token(TokenKind::Word), Pattern::symbol(",")),
//!     Pattern::eof(),
//! ]));
//! let grammar = g.build().unwrap();
//! assert!(grammar.main().is_some());
//! ```

use super::capture::{Capture, Reducer};
use super::errors::ErrorCode;
use super::lexer::Lexer;
use super::matcher::{MatcherGraph, MatcherKind, MatcherNode, MatcherId, RuleId};
use super::predicate::Predicate;
use super::token::{Token, TokenKind, TokenMatch};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::sync::Arc;
use thiserror::Error;

/// Name of the default entry rule
pub const MAIN_RULE: &str = "main";

/// Errors found while compiling a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("reference to undefined rule '{name}'")]
    UndefinedRule { name: SmolStr },
    #[error("rule '{name}' is defined more than once")]
    Redefinition { name: SmolStr },
    #[error("sequence with no parts in rule '{rule}'")]
    EmptySequence { rule: SmolStr },
    #[error("alternative with no options in rule '{rule}'")]
    EmptyBranch { rule: SmolStr },
}

impl GrammarError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedRule { .. } => ErrorCode::E0501,
            Self::Redefinition { .. } => ErrorCode::E0502,
            Self::EmptySequence { .. } => ErrorCode::E0503,
            Self::EmptyBranch { .. } => ErrorCode::E0504,
        }
    }
}

/// A declarative description of what to match.
///
/// Patterns are plain values: cloning one and using it in two places
/// compiles it twice. Use [`GrammarBuilder::define`] and [`Pattern::rule`]
/// to share a definition or to recurse.
#[derive(Clone)]
pub struct Pattern<N> {
    kind: PatternKind<N>,
    predicates: Vec<Predicate>,
    operator: Option<SmolStr>,
}

#[derive(Clone)]
enum PatternKind<N> {
    Token(TokenMatch),
    Nothing,
    Sequence {
        name: Option<SmolStr>,
        parts: Vec<Pattern<N>>,
        reduce: Reducer<N>,
    },
    Branch(Vec<Pattern<N>>),
    Optional {
        pattern: Box<Pattern<N>>,
        reduce: Option<Reducer<N>>,
    },
    List(Box<Pattern<N>>),
    Delimited {
        pattern: Box<Pattern<N>>,
        delim: Box<Pattern<N>>,
    },
    Rule(SmolStr),
}

impl<N: Clone + 'static> Pattern<N> {
    fn from_kind(kind: PatternKind<N>) -> Self {
        Self {
            kind,
            predicates: Vec::new(),
            operator: None,
        }
    }

    /// A token of the given kind
    pub fn token(kind: TokenKind) -> Self {
        Self::from_kind(PatternKind::Token(TokenMatch::kind(kind)))
    }

    /// A token of the given kind and text
    pub fn exact(kind: TokenKind, text: impl Into<SmolStr>) -> Self {
        Self::from_kind(PatternKind::Token(TokenMatch::exact(kind, text)))
    }

    /// A keyword; the word is reserved when the grammar is built
    pub fn keyword(word: impl Into<SmolStr>) -> Self {
        Self::exact(TokenKind::Keyword, word)
    }

    /// Consecutive single-character symbols, merged into one symbol token.
    ///
    /// Every character after the first must touch the one before it.
    pub fn symbol(text: &str) -> Self {
        let mut chars = text.chars();
        let (Some(first), Some(_)) = (chars.next(), chars.next()) else {
            return Self::exact(TokenKind::Symbol, text);
        };
        let mut parts = vec![Self::exact(TokenKind::Symbol, first.to_string())];
        parts.extend(
            text.chars()
                .skip(1)
                .map(|c| Self::exact(TokenKind::Symbol, c.to_string()).with(Predicate::NoSpace)),
        );
        let spelling = SmolStr::from(text);
        let reduce: Reducer<N> = Arc::new(move |captures: Vec<Capture<N>>| {
            let span = match (captures.first(), captures.last()) {
                (Some(first), Some(last)) => first.span().to(last.span()),
                _ => Default::default(),
            };
            Capture::Token(Token::new(TokenKind::Symbol, spelling.clone(), span))
        });
        Self::from_kind(PatternKind::Sequence {
            name: None,
            parts,
            reduce,
        })
    }

    /// [`Pattern::symbol`], recording the spelling as an operator
    pub fn operator(text: &str) -> Self {
        let mut pattern = Self::symbol(text);
        pattern.operator = Some(text.into());
        pattern
    }

    /// Matches without consuming anything
    pub fn nothing() -> Self {
        Self::from_kind(PatternKind::Nothing)
    }

    /// The end of input
    pub fn eof() -> Self {
        Self::token(TokenKind::Eof)
    }

    /// An empty capture guarded by `predicate`
    pub fn predicate(predicate: Predicate) -> Self {
        Self::nothing().with(predicate)
    }

    /// The parts in order, captured as a list
    pub fn sequence(parts: Vec<Pattern<N>>) -> Self {
        Self::sequence_with(Capture::collect(), parts)
    }

    /// The parts in order, reduced by `reduce`
    pub fn sequence_with(reduce: Reducer<N>, parts: Vec<Pattern<N>>) -> Self {
        Self::from_kind(PatternKind::Sequence {
            name: None,
            parts,
            reduce,
        })
    }

    /// Any of the options. Every option that matches yields a result.
    pub fn one_of(mut options: Vec<Pattern<N>>) -> Self {
        if options.len() == 1 {
            if let Some(only) = options.pop() {
                return only;
            }
        }
        Self::from_kind(PatternKind::Branch(options))
    }

    /// The pattern, or an empty capture
    pub fn optional(pattern: Pattern<N>) -> Self {
        Self::from_kind(PatternKind::Optional {
            pattern: Box::new(pattern),
            reduce: None,
        })
    }

    /// The pattern, or whatever `reduce` makes of the empty capture
    pub fn optional_with(pattern: Pattern<N>, reduce: Reducer<N>) -> Self {
        Self::from_kind(PatternKind::Optional {
            pattern: Box::new(pattern),
            reduce: Some(reduce),
        })
    }

    /// Zero or more repetitions, captured as a list
    pub fn list(pattern: Pattern<N>) -> Self {
        Self::from_kind(PatternKind::List(Box::new(pattern)))
    }

    /// One or more repetitions separated by `delim`, captured as a list of
    /// the repeated pattern only
    pub fn delimited(pattern: Pattern<N>, delim: Pattern<N>) -> Self {
        Self::from_kind(PatternKind::Delimited {
            pattern: Box::new(pattern),
            delim: Box::new(delim),
        })
    }

    /// The rule registered under `name`, which may be defined later
    pub fn rule(name: impl Into<SmolStr>) -> Self {
        Self::from_kind(PatternKind::Rule(name.into()))
    }

    /// Attach a predicate, checked against the first token consumed once
    /// this pattern is entered
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// Collects rule definitions and compiles them into a [`Grammar`]
pub struct GrammarBuilder<N> {
    rules: IndexMap<SmolStr, Pattern<N>>,
    reserved: IndexSet<SmolStr>,
    redefined: Vec<SmolStr>,
}

impl<N: Clone + 'static> Default for GrammarBuilder<N> {
    fn default() -> Self {
        Self {
            rules: IndexMap::new(),
            reserved: IndexSet::new(),
            redefined: Vec::new(),
        }
    }
}

impl<N: Clone + 'static> GrammarBuilder<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pattern` as a named rule that shows up in failure
    /// breadcrumbs, and return a reference to it.
    ///
    /// An unnamed sequence takes the rule's name; anything else is wrapped
    /// in a one-slot sequence that passes its capture through.
    pub fn define(&mut self, name: impl Into<SmolStr>, pattern: Pattern<N>) -> Pattern<N> {
        let name = name.into();
        let named = match pattern.kind {
            PatternKind::Sequence {
                name: None,
                parts,
                reduce,
            } => Pattern {
                kind: PatternKind::Sequence {
                    name: Some(name.clone()),
                    parts,
                    reduce,
                },
                ..pattern
            },
            kind => Pattern::from_kind(PatternKind::Sequence {
                name: Some(name.clone()),
                parts: vec![Pattern { kind, ..pattern }],
                reduce: Capture::nth(0),
            }),
        };
        self.define_inline(name, named)
    }

    /// Register `pattern` unchanged; it adds no breadcrumb of its own
    pub fn define_inline(&mut self, name: impl Into<SmolStr>, pattern: Pattern<N>) -> Pattern<N> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            self.redefined.push(name.clone());
        } else {
            self.rules.insert(name.clone(), pattern);
        }
        Pattern::rule(name)
    }

    /// Reserve a keyword spelling that no pattern mentions
    pub fn reserve_keyword(&mut self, word: impl Into<SmolStr>) {
        self.reserved.insert(word.into());
    }

    /// Compile every rule into one matcher graph
    pub fn build(self) -> Result<Grammar<N>, GrammarError> {
        if let Some(name) = self.redefined.into_iter().next() {
            return Err(GrammarError::Redefinition { name });
        }

        let mut compiler = Compiler {
            graph: MatcherGraph::new(),
            rules: &self.rules,
            keywords: self.reserved.iter().cloned().collect(),
            operators: FxHashSet::default(),
            current: SmolStr::default(),
        };

        let mut roots = Vec::with_capacity(self.rules.len());
        for (name, pattern) in &self.rules {
            compiler.current = name.clone();
            roots.push(compiler.compile(pattern)?);
        }

        let Compiler {
            mut graph,
            keywords,
            operators,
            ..
        } = compiler;
        let mut rules = IndexMap::with_capacity(roots.len());
        for (name, root) in self.rules.keys().zip(roots) {
            let id = graph.add_rule(name.clone(), root);
            rules.insert(name.clone(), id);
        }

        tracing::debug!(
            "[GRAMMAR] compiled {} rule(s) into {} matcher node(s), {} keyword(s)",
            rules.len(),
            graph.len(),
            keywords.len()
        );

        Ok(Grammar {
            graph,
            rules,
            keywords,
            operators,
        })
    }
}

struct Compiler<'a, N> {
    graph: MatcherGraph<N>,
    rules: &'a IndexMap<SmolStr, Pattern<N>>,
    keywords: FxHashSet<SmolStr>,
    operators: FxHashSet<SmolStr>,
    /// Rule being compiled, for error messages
    current: SmolStr,
}

impl<N: Clone + 'static> Compiler<'_, N> {
    fn compile(&mut self, pattern: &Pattern<N>) -> Result<MatcherId, GrammarError> {
        if let Some(spelling) = &pattern.operator {
            self.operators.insert(spelling.clone());
        }
        let predicates = pattern.predicates.clone();

        let kind = match &pattern.kind {
            PatternKind::Token(expected) => {
                if let (TokenKind::Keyword, Some(word)) = (expected.kind, &expected.value) {
                    self.keywords.insert(word.clone());
                }
                MatcherKind::Token(expected.clone())
            }
            PatternKind::Nothing => MatcherKind::Epsilon,
            PatternKind::Sequence { name, parts, reduce } => {
                if parts.is_empty() {
                    return Err(GrammarError::EmptySequence {
                        rule: self.current.clone(),
                    });
                }
                let children = parts
                    .iter()
                    .map(|part| self.compile(part))
                    .collect::<Result<Vec<_>, _>>()?;
                MatcherKind::Sequence {
                    name: name.clone(),
                    children,
                    reduce: reduce.clone(),
                }
            }
            PatternKind::Branch(options) => {
                if options.is_empty() {
                    return Err(GrammarError::EmptyBranch {
                        rule: self.current.clone(),
                    });
                }
                let alternatives = options
                    .iter()
                    .map(|option| self.compile(option))
                    .collect::<Result<Vec<_>, _>>()?;
                MatcherKind::Branch(alternatives)
            }
            PatternKind::Optional { pattern, reduce } => {
                let present = self.compile(pattern)?;
                let absent = self.epsilon_reduced_by(reduce.clone());
                MatcherKind::Branch(vec![present, absent])
            }
            PatternKind::List(item) => {
                let item = self.compile(item)?;
                return Ok(self.list_of(item, predicates));
            }
            PatternKind::Delimited { pattern, delim } => {
                let item = self.compile(pattern)?;
                let delim = self.compile(delim)?;
                let tail_item = self.graph.push(MatcherNode::new(
                    MatcherKind::Sequence {
                        name: None,
                        children: vec![delim, item],
                        reduce: Capture::nth(1),
                    },
                    Vec::new(),
                ));
                let tail = self.list_of(tail_item, Vec::new());
                MatcherKind::Sequence {
                    name: None,
                    children: vec![item, tail],
                    reduce: prepend(),
                }
            }
            PatternKind::Rule(name) => match self.rules.get_index_of(name) {
                Some(index) => MatcherKind::Ref(RuleId::from_index(index)),
                None => return Err(GrammarError::UndefinedRule { name: name.clone() }),
            },
        };

        Ok(self.graph.push(MatcherNode::new(kind, predicates)))
    }

    fn epsilon_reduced_by(&mut self, reduce: Option<Reducer<N>>) -> MatcherId {
        let epsilon = self.graph.push(MatcherNode::new(MatcherKind::Epsilon, Vec::new()));
        match reduce {
            None => epsilon,
            Some(reduce) => self.graph.push(MatcherNode::new(
                MatcherKind::Sequence {
                    name: None,
                    children: vec![epsilon],
                    reduce,
                },
                Vec::new(),
            )),
        }
    }

    /// Zero or more `item`s: `branch { sequence(item, self), empty list }`.
    ///
    /// The recursion goes through a predicate-free copy of the branch so
    /// the list's own predicates apply once, before the first item.
    fn list_of(&mut self, item: MatcherId, predicates: Vec<Predicate>) -> MatcherId {
        let recurse = self.graph.push(MatcherNode::new(MatcherKind::Epsilon, Vec::new()));
        let more = self.graph.push(MatcherNode::new(
            MatcherKind::Sequence {
                name: None,
                children: vec![item, recurse],
                reduce: prepend(),
            },
            Vec::new(),
        ));
        let done = self.epsilon_reduced_by(Some(empty_list()));
        self.graph
            .replace(recurse, MatcherNode::new(MatcherKind::Branch(vec![more, done]), Vec::new()));

        if predicates.is_empty() {
            recurse
        } else {
            self.graph
                .push(MatcherNode::new(MatcherKind::Branch(vec![more, done]), predicates))
        }
    }
}

/// `[first, list]` → `list` with `first` in front
fn prepend<N: Clone + 'static>() -> Reducer<N> {
    Arc::new(|captures: Vec<Capture<N>>| {
        let mut captures = captures.into_iter();
        match (captures.next(), captures.next()) {
            (Some(first), Some(rest)) => first.prepend(rest),
            (Some(only), None) => Capture::list(vec![only]),
            _ => Capture::list(Vec::new()),
        }
    })
}

/// `[empty]` → an empty list at the empty capture's position
fn empty_list<N: 'static>() -> Reducer<N> {
    Arc::new(|captures: Vec<Capture<N>>| {
        Capture::empty_list(captures.first().map(Capture::span).unwrap_or_default())
    })
}

/// A compiled, immutable grammar
pub struct Grammar<N> {
    graph: MatcherGraph<N>,
    rules: IndexMap<SmolStr, RuleId>,
    keywords: FxHashSet<SmolStr>,
    operators: FxHashSet<SmolStr>,
}

impl<N> Grammar<N> {
    pub fn rule(&self, name: &str) -> Option<RuleId> {
        self.rules.get(name).copied()
    }

    /// The default entry rule
    pub fn main(&self) -> Option<RuleId> {
        self.rule(MAIN_RULE)
    }

    /// Rule names in definition order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(SmolStr::as_str)
    }

    /// Words the scanner must produce as [`TokenKind::Keyword`]
    pub fn keywords(&self) -> &FxHashSet<SmolStr> {
        &self.keywords
    }

    pub fn operators(&self) -> &FxHashSet<SmolStr> {
        &self.operators
    }

    pub fn graph(&self) -> &MatcherGraph<N> {
        &self.graph
    }

    /// A scanner over `input` that knows this grammar's keywords
    pub fn lexer<'a>(&'a self, input: &'a str) -> Lexer<'a> {
        Lexer::new(input).with_keywords(&self.keywords)
    }
}
