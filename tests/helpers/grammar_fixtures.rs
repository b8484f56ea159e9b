//! Grammars shared by the integration tests.

use lockstep::parser::{Capture, Grammar, GrammarBuilder, Pattern, Reducer, TokenKind};
use std::sync::Arc;

/// Reduce `[first, rest]` to one list
pub fn prepend<N: Clone + 'static>() -> Reducer<N> {
    Arc::new(|mut captures: Vec<Capture<N>>| {
        let rest = captures.pop().unwrap();
        let first = captures.pop().unwrap();
        first.prepend(rest)
    })
}

/// `digit+`: one or more integers
pub fn digits() -> Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define(
        "main",
        Pattern::sequence_with(
            prepend(),
            vec![
                Pattern::token(TokenKind::Integer),
                Pattern::list(Pattern::token(TokenKind::Integer)),
            ],
        ),
    );
    g.build().unwrap()
}

/// Comma separated identifiers, then end of input
pub fn identifiers() -> Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define(
        "main",
        Pattern::sequence_with(
            Capture::nth(0),
            vec![
                Pattern::delimited(Pattern::token(TokenKind::Word), Pattern::symbol(",")),
                Pattern::eof(),
            ],
        ),
    );
    g.build().unwrap()
}

/// `expr := term (('+' | '-') term)*`, evaluated as it is parsed
pub fn sums() -> Grammar<i64> {
    let mut g = GrammarBuilder::new();
    g.define(
        "main",
        Pattern::sequence_with(Capture::nth(0), vec![Pattern::rule("expr"), Pattern::eof()]),
    );
    g.define(
        "expr",
        Pattern::sequence_with(
            Arc::new(|captures: Vec<Capture<i64>>| {
                let span = captures[0].span().to(captures[1].span());
                let mut total = *captures[0].as_node().unwrap();
                for step in captures[1].as_list().unwrap() {
                    let step = step.as_list().unwrap();
                    let value = *step[1].as_node().unwrap();
                    match step[0].text() {
                        Some("+") => total += value,
                        _ => total -= value,
                    }
                }
                Capture::node(span, total)
            }),
            vec![
                Pattern::rule("term"),
                Pattern::list(Pattern::sequence(vec![
                    Pattern::one_of(vec![Pattern::operator("+"), Pattern::operator("-")]),
                    Pattern::rule("term"),
                ])),
            ],
        ),
    );
    g.define(
        "term",
        Pattern::sequence_with(
            Arc::new(|captures: Vec<Capture<i64>>| {
                let value = captures[0].text().unwrap().parse().unwrap();
                Capture::node(captures[0].span(), value)
            }),
            vec![Pattern::token(TokenKind::Integer)],
        ),
    );
    g.build().unwrap()
}

/// Two rules that both accept a single word
pub fn either() -> Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define("main", Pattern::one_of(vec![Pattern::rule("a"), Pattern::rule("b")]));
    g.define("a", Pattern::sequence(vec![Pattern::token(TokenKind::Word), Pattern::eof()]));
    g.define("b", Pattern::sequence(vec![Pattern::token(TokenKind::Word), Pattern::eof()]));
    g.build().unwrap()
}
