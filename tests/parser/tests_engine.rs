//! Properties of the breadth-parallel evaluation loop.

use crate::helpers::grammar_fixtures::{identifiers, sums};
use crate::helpers::run::{messages, run};
use lockstep::base::{Position, Span};
use lockstep::parser::{
    Capture, GrammarBuilder, Parser, Pattern, Predicate, Token, TokenKind, TokenStream, tokenize,
};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[case::single("a")]
#[case::several("a, b, c, d")]
fn test_parsing_is_deterministic(#[case] input: &str) {
    let g = identifiers();
    let (first, _) = run(&g, input);
    let (second, _) = run(&g, input);
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].to_string(), second[0].to_string());
    assert_eq!(first[0].span(), second[0].span());
}

#[test]
fn test_epsilon_is_zero_width_at_the_last_token() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![Pattern::token(TokenKind::Word), Pattern::nothing(), Pattern::eof()]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "ab");
    let items = results[0].as_list().unwrap();
    assert!(items[1].is_empty());
    assert_eq!(items[1].span(), Span::empty(Position::new(0, 2)));
    assert_eq!(items[2].span(), Span::empty(Position::new(0, 2)));
}

#[test]
fn test_optional_yields_empty_capture() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::optional(Pattern::symbol("-")),
            Pattern::token(TokenKind::Integer),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (with_sign, _) = run(&g, "-1");
    assert_eq!(with_sign[0].as_list().unwrap()[0].text(), Some("-"));

    let (without_sign, _) = run(&g, "1");
    assert_eq!(without_sign.len(), 1);
    assert!(without_sign[0].as_list().unwrap()[0].is_empty());
}

#[test]
fn test_split_siblings_keep_their_own_captures() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::one_of(vec![
                Pattern::exact(TokenKind::Word, "x"),
                Pattern::sequence(vec![Pattern::token(TokenKind::Word)]),
            ]),
            Pattern::token(TokenKind::Integer),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let mut parser = Parser::new(&g, g.main().unwrap(), Position::default());
    for token in tokenize("a x", g.keywords()).unwrap() {
        parser.feed(token);
    }

    let chains: Vec<_> = parser.branch_chains().map(|(_, chain)| chain).collect();
    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].captures().len(), 2);
    assert_eq!(chains[1].captures().len(), 2);
    assert!(chains[0].captures()[1].as_token().is_some());
    assert!(chains[1].captures()[1].as_list().is_some());

    parser.feed(Token::new(TokenKind::Integer, "1", Span::from_coords(0, 4, 0, 5)));
    parser.finish();
    assert_eq!(parser.results().len(), 2);
}

#[test]
fn test_predicate_checks_the_following_token() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::symbol("!"),
            Pattern::predicate(Predicate::NextLine),
            Pattern::token(TokenKind::Word),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    // "!" shares a line with "a"; only "b" is checked
    let (results, _) = run(&g, "a!\nb");
    assert_eq!(results.len(), 1);

    let (results, diagnostics) = run(&g, "a! b");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected newline before Word \"b\""]);
}

#[rstest]
#[case::touching("a::b", 1)]
#[case::spaced("a: :b", 0)]
fn test_multi_character_symbols(#[case] input: &str, #[case] expected: usize) {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::operator("::"),
            Pattern::token(TokenKind::Word),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();
    assert!(g.operators().contains("::"));

    let (results, _) = run(&g, input);
    assert_eq!(results.len(), expected);
    if let Some(result) = results.first() {
        let operator = result.as_list().unwrap()[1].as_token().unwrap();
        assert_eq!(operator.text, "::");
        assert_eq!(operator.span, Span::from_coords(0, 1, 0, 3));
    }
}

#[test]
fn test_deferred_result_waits_for_next_token() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![Pattern::token(TokenKind::Word), Pattern::predicate(Predicate::NextLine)]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "a");
    assert_eq!(results.len(), 1);

    // The predicate holds, but the parse is over before "b"
    let (results, diagnostics) = run(&g, "a\nb");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected EOF, got Word \"b\""]);

    let (results, diagnostics) = run(&g, "a b");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected newline before Word \"b\""]);
}

#[test]
fn test_long_run_of_optionals() {
    let mut parts: Vec<_> = (0..600).map(|_| Pattern::optional(Pattern::symbol(";"))).collect();
    parts.push(Pattern::token(TokenKind::Word));
    parts.push(Pattern::eof());
    let mut g = GrammarBuilder::<()>::new();
    g.define("main", Pattern::sequence(parts));
    let g = g.build().unwrap();

    let (results, diagnostics) = run(&g, "a");
    assert!(diagnostics.is_empty());
    assert_eq!(results.len(), 1);
    let items = results[0].as_list().unwrap();
    assert!(items[..600].iter().all(Capture::is_empty));
    assert_eq!(items[600].text(), Some("a"));
}

#[test]
fn test_list_of_nullable_items_terminates() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::list(Pattern::optional(Pattern::token(TokenKind::Word))),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "a b");
    assert!(!results.is_empty());
    for result in &results {
        let words: Vec<_> = result.as_list().unwrap()[0]
            .as_list()
            .unwrap()
            .iter()
            .filter_map(Capture::text)
            .collect();
        assert_eq!(words, vec!["a", "b"]);
    }
}

#[test]
fn test_optional_with_reduces_the_absent_case() {
    let mut g = GrammarBuilder::<i64>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::optional_with(
                Pattern::token(TokenKind::Integer),
                Arc::new(|captures: Vec<Capture<i64>>| Capture::node(captures[0].span(), 1)),
            ),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "step");
    let count = &results[0].as_list().unwrap()[1];
    assert_eq!(count.as_node(), Some(&1));
    assert_eq!(count.span(), Span::empty(Position::new(0, 4)));

    let (results, _) = run(&g, "step 3");
    assert_eq!(results[0].as_list().unwrap()[1].text(), Some("3"));
}

#[test]
fn test_lookahead_does_not_consume() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::predicate(Predicate::lookahead(TokenKind::Integer)),
            Pattern::token(TokenKind::Integer),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "7");
    assert_eq!(results[0].as_list().unwrap().len(), 3);

    let (_, diagnostics) = run(&g, "x");
    // The mismatch is reported; the lookahead adds nothing new
    assert_eq!(messages(&diagnostics), vec!["Expected Integer, got Word \"x\""]);
}

#[test]
fn test_custom_token_source() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![Pattern::token(TokenKind::Boolean), Pattern::eof()]),
    );
    let g = g.build().unwrap();

    let mut tokens = TokenStream::new(vec![Token::new(
        TokenKind::Boolean,
        "true",
        Span::from_coords(0, 0, 0, 4),
    )]);
    let mut parser = Parser::new(&g, g.main().unwrap(), Position::default());
    parser.parse(&mut tokens).unwrap();
    assert!(parser.is_finished());
    assert_eq!(parser.into_result().unwrap().len(), 1);
}

#[test]
fn test_parse_stops_at_first_failure() {
    let g = sums();
    let mut parser = Parser::new(&g, g.main().unwrap(), Position::default());
    parser.parse(&mut g.lexer("1 1 +")).unwrap();
    assert!(parser.has_error());
    assert!(!parser.is_finished());
    assert_eq!(parser.active_branches(), 0);
    assert_eq!(parser.diagnostics()[0].span, Span::from_coords(0, 2, 0, 3));
}

#[test]
fn test_results_are_captures() {
    let (results, _) = run(&sums(), "5");
    assert!(matches!(results[0], Capture::Node { node: 5, .. }));
}
