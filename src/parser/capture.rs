//! Parse result values.
//!
//! A [`Capture`] is what a matcher produces: the token it consumed, a
//! zero-width marker for an epsilon, an ordered list, or a caller-defined
//! node built by a rule's reduction. Captures are immutable once built and
//! cheap to clone (list items are shared).

use super::token::Token;
use crate::base::Span;
use std::fmt;
use std::sync::Arc;

/// Turns the captures of a completed sequence into one capture
pub type Reducer<N> = Arc<dyn Fn(Vec<Capture<N>>) -> Capture<N> + Send + Sync>;

/// A position-tagged parse result.
///
/// Spans are carried for diagnostics and adjacency checks only: two
/// captures compare equal when their structure and token text match,
/// wherever they appeared in the source.
#[derive(Debug, Clone)]
pub enum Capture<N> {
    /// A single consumed token
    Token(Token),
    /// Epsilon marker, always zero width
    Empty(Span),
    /// Ordered captures. The span runs from the first item to the last, or
    /// is supplied explicitly when the list is empty.
    List { span: Span, items: Arc<[Capture<N>]> },
    /// Caller-defined payload produced by a reduction
    Node { span: Span, node: N },
}

impl<N> Capture<N> {
    pub fn token(token: Token) -> Self {
        Self::Token(token)
    }

    pub fn node(span: Span, node: N) -> Self {
        Self::Node { span, node }
    }

    /// A list spanning its first to its last item
    ///
    /// An empty `items` yields an empty list at the default span; use
    /// [`Capture::list_or_empty`] when a position is known.
    pub fn list(items: Vec<Capture<N>>) -> Self {
        let span = match (items.first(), items.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => Span::default(),
        };
        Self::List {
            span,
            items: items.into(),
        }
    }

    /// An empty list positioned at `span`
    pub fn empty_list(span: Span) -> Self {
        Self::List {
            span,
            items: Arc::from(Vec::new()),
        }
    }

    pub fn list_or_empty(items: Vec<Capture<N>>, span: Span) -> Self {
        if items.is_empty() {
            Self::empty_list(span)
        } else {
            Self::list(items)
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Token(token) => token.span,
            Self::Empty(span) | Self::List { span, .. } | Self::Node { span, .. } => *span,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Text of a token capture
    pub fn text(&self) -> Option<&str> {
        self.as_token().map(|t| t.text.as_str())
    }

    pub fn as_list(&self) -> Option<&[Capture<N>]> {
        match self {
            Self::List { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Self::Node { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            Self::Node { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

impl<N: Clone> Capture<N> {
    /// Prepend `self` to a list capture.
    ///
    /// A non-list `rest` is treated as a one-item list.
    pub fn prepend(self, rest: Capture<N>) -> Self {
        let mut items = vec![self];
        match rest {
            Capture::List { items: tail, .. } => items.extend(tail.iter().cloned()),
            other => items.push(other),
        }
        Self::list(items)
    }
}

impl<N: 'static> Capture<N> {
    /// A reduction keeping only the `index`th capture
    pub fn nth(index: usize) -> Reducer<N> {
        Arc::new(move |mut captures: Vec<Capture<N>>| {
            if index < captures.len() {
                captures.swap_remove(index)
            } else {
                let span = captures.last().map(Capture::span).unwrap_or_default();
                Capture::Empty(span)
            }
        })
    }

    /// The default sequence reduction: a list of every capture
    pub fn collect() -> Reducer<N> {
        Arc::new(Capture::list)
    }
}

impl<N: PartialEq> PartialEq for Capture<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Token(a), Self::Token(b)) => a.kind == b.kind && a.text == b.text,
            (Self::Empty(_), Self::Empty(_)) => true,
            (Self::List { items: a, .. }, Self::List { items: b, .. }) => a == b,
            (Self::Node { node: a, .. }, Self::Node { node: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl<N: Eq> Eq for Capture<N> {}

impl<N: fmt::Debug> fmt::Display for Capture<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "<token-capture {}>", token),
            Self::Empty(_) => f.write_str("<empty-capture>"),
            Self::List { items, .. } if items.is_empty() => f.write_str("<list-capture>"),
            Self::List { items, .. } => {
                writeln!(f, "<list-capture")?;
                for item in items.iter() {
                    writeln!(f, "\t{}", item.to_string().replace('\n', "\n\t"))?;
                }
                f.write_str(">")
            }
            Self::Node { node, .. } => write!(f, "<node-capture {:?}>", node),
        }
    }
}
