//! End-to-end behaviour on small reference grammars.

use crate::helpers::grammar_fixtures::{digits, either, identifiers, sums};
use crate::helpers::run::{messages, run, run_from};
use lockstep::base::{Source, Span};
use lockstep::parser::{Capture, ErrorCode, GrammarBuilder, Pattern, Predicate, TokenKind};
use lockstep::syntax::{ParseError, ParseOptions, parse};

#[test]
fn test_digits_produce_one_list() {
    let (results, diagnostics) = run(&digits(), "1 2 3");
    assert!(diagnostics.is_empty());
    assert_eq!(results.len(), 1);

    let items = results[0].as_list().unwrap();
    let texts: Vec<_> = items.iter().map(|c| c.text().unwrap()).collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
    assert_eq!(results[0].span(), Span::from_coords(0, 0, 0, 5));
}

#[test]
fn test_delimited_identifiers() {
    let (results, diagnostics) = run(&identifiers(), "a, b");
    assert!(diagnostics.is_empty());
    assert_eq!(results.len(), 1);
    let items = results[0].as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].text(), Some("b"));
}

#[test]
fn test_space_before_suffix() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::exact(TokenKind::Symbol, "!").with(Predicate::NoSpace),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "done!");
    assert_eq!(results.len(), 1);

    let (results, diagnostics) = run(&g, "done !");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Unexpected space before Symbol \"!\""]);
    assert_eq!(diagnostics[0].span, Span::from_coords(0, 5, 0, 6));
    assert_eq!(diagnostics[0].code, ErrorCode::E0301);
}

#[test]
fn test_ambiguity_is_surfaced() {
    let (results, diagnostics) = run(&either(), "x");
    assert!(diagnostics.is_empty());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], results[1]);
}

#[test]
fn test_unmatched_operator_lists_both_alternatives() {
    let g = sums();
    let (results, diagnostics) = run_from(&g, "expr", "1 + 2 * 3");

    // "1" and "1 + 2" are complete expressions, but the input goes on
    assert!(results.is_empty());
    assert_eq!(
        messages(&diagnostics),
        vec!["Expected one of {'+', '-'}, got Symbol \"*\""]
    );
    assert_eq!(diagnostics[0].span, Span::from_coords(0, 6, 0, 7));

    let source = Source::virtual_source("sum.txt", "1 + 2 * 3");
    let err = parse(&g, &source, &ParseOptions::entry("expr")).unwrap_err();
    assert_eq!(err, ParseError::Syntax(diagnostics));
}

#[test]
fn test_input_past_a_complete_parse() {
    // The list could have gone on, so that is what gets reported
    let (results, diagnostics) = run(&digits(), "1 2 x");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected Integer, got Word \"x\""]);

    // Nothing could have gone on
    let (results, diagnostics) = run_from(&sums(), "term", "1 2");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected EOF, got Integer \"2\""]);
}

#[test]
fn test_reductions_build_caller_nodes() {
    let (results, diagnostics) = run(&sums(), "10 - 4 + 1");
    assert!(diagnostics.is_empty());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_node(), Some(&7));
}

#[test]
fn test_end_of_input_diagnostic() {
    let (results, diagnostics) = run(&sums(), "1 +");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected Integer, got <EOF>"]);
    assert_eq!(diagnostics[0].code, ErrorCode::E0203);
    assert_eq!(diagnostics[0].span, Span::from_coords(0, 3, 0, 3));
}

#[test]
fn test_keywords_are_reserved() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::keyword("let"),
            Pattern::token(TokenKind::Word),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();

    let (results, _) = run(&g, "let x");
    assert_eq!(results.len(), 1);
    let items = results[0].as_list().unwrap();
    assert_eq!(items[0], Capture::Token(lockstep::Token::new(TokenKind::Keyword, "let", Span::default())));

    // A keyword is not a word
    let (results, diagnostics) = run(&g, "let let");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected Word, got Keyword \"let\""]);
}
