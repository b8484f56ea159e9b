//! Diagnostics produced when the last branch dies.

use crate::helpers::run::{messages, run};
use lockstep::base::Source;
use lockstep::parser::{Diagnostic, ErrorCode, GrammarBuilder, LexErrorKind, Pattern, TokenKind};
use lockstep::syntax::{ParseError, ParseOptions, parse};
use rstest::rstest;

fn calls_and_indexes() -> lockstep::Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define("main", Pattern::one_of(vec![Pattern::rule("call"), Pattern::rule("index")]));
    g.define(
        "call",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::symbol("("),
            Pattern::symbol(")"),
        ]),
    );
    g.define(
        "index",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Word),
            Pattern::symbol("["),
            Pattern::token(TokenKind::Integer),
            Pattern::symbol("]"),
        ]),
    );
    g.build().unwrap()
}

#[test]
fn test_distinct_contexts_are_reported_separately() {
    let (results, diagnostics) = run(&calls_and_indexes(), "f;");
    assert!(results.is_empty());
    assert_eq!(
        messages(&diagnostics),
        vec![
            "Expected '(', got Symbol \";\" (in parse as call)",
            "Expected '[', got Symbol \";\" (in parse as index)",
        ]
    );
}

#[test]
fn test_one_context_has_no_suffix() {
    let (_, diagnostics) = run(&calls_and_indexes(), "f[x");
    assert_eq!(messages(&diagnostics), vec!["Expected Integer, got Word \"x\""]);
}

/// `(`-nesting around a word or around an integer, both starting as `main`
fn nested_words_or_numbers() -> lockstep::Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define("main", Pattern::one_of(vec![Pattern::rule("words"), Pattern::rule("numbers")]));
    g.define("words", Pattern::rule("word"));
    g.define("numbers", Pattern::rule("number"));
    for (name, leaf) in [("word", TokenKind::Word), ("number", TokenKind::Integer)] {
        g.define(
            name,
            Pattern::one_of(vec![
                Pattern::sequence(vec![Pattern::symbol("("), Pattern::rule(name), Pattern::symbol(")")]),
                Pattern::token(leaf),
            ]),
        );
    }
    g.build().unwrap()
}

#[test]
fn test_recursive_context_is_collapsed() {
    let (results, diagnostics) = run(&nested_words_or_numbers(), "((;");
    assert!(results.is_empty());
    assert_eq!(
        messages(&diagnostics),
        vec![
            "Expected one of {'(', Word}, got Symbol \";\" (in parse as words.word*)",
            "Expected Integer, got Symbol \";\" (in parse as numbers.number*)",
        ]
    );
}

#[test]
fn test_single_context_has_no_suffix_even_when_recursive() {
    let mut g = GrammarBuilder::<()>::new();
    g.define("main", Pattern::sequence(vec![Pattern::rule("group"), Pattern::eof()]));
    g.define(
        "group",
        Pattern::one_of(vec![
            Pattern::sequence(vec![Pattern::symbol("("), Pattern::rule("group"), Pattern::symbol(")")]),
            Pattern::token(TokenKind::Word),
        ]),
    );
    let g = g.build().unwrap();

    let (results, diagnostics) = run(&g, "((a;");
    assert!(results.is_empty());
    assert_eq!(messages(&diagnostics), vec!["Expected ')', got Symbol \";\""]);
}

#[test]
fn test_syntax_error_renders_with_excerpt() {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::token(TokenKind::Integer),
            Pattern::list(Pattern::sequence(vec![Pattern::symbol("+"), Pattern::token(TokenKind::Integer)])),
            Pattern::eof(),
        ]),
    );
    let g = g.build().unwrap();
    let source = Source::virtual_source("calc.txt", "1 + 2 +");

    let err = parse(&g, &source, &ParseOptions::default()).unwrap_err();
    let ParseError::Syntax(diagnostics) = &err else {
        panic!("expected a syntax error, got {:?}", err);
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].render(&source, 4),
        "calc.txt:1:8: error[E0203]: Expected Integer, got <EOF>\n1 | 1 + 2 +\n           ^"
    );
}

#[rstest]
#[case::unterminated_string("a \"b", LexErrorKind::UnterminatedString, ErrorCode::E0102)]
#[case::newline_in_string("a \"b\nc\"", LexErrorKind::NewlineInString, ErrorCode::E0103)]
#[case::unterminated_comment("a /* b", LexErrorKind::UnterminatedComment, ErrorCode::E0104)]
#[case::missing_fraction("1.", LexErrorKind::MissingFractionDigit, ErrorCode::E0105)]
fn test_lexical_errors_stop_the_parse(
    #[case] input: &str,
    #[case] kind: LexErrorKind,
    #[case] code: ErrorCode,
) {
    let mut g = GrammarBuilder::<()>::new();
    g.define(
        "main",
        Pattern::sequence(vec![Pattern::list(Pattern::token(TokenKind::Word)), Pattern::eof()]),
    );
    let g = g.build().unwrap();

    let err = parse(&g, &Source::virtual_source("input", input), &ParseOptions::default()).unwrap_err();
    match &err {
        ParseError::Lex(error) => assert_eq!(error.kind, kind),
        other => panic!("expected a lexical error, got {:?}", other),
    }
    assert_eq!(err.code(), code);
}

#[test]
fn test_combined_diagnostics() {
    let (_, diagnostics) = run(&calls_and_indexes(), "f;");
    let combined = Diagnostic::combine(&diagnostics).unwrap();
    assert_eq!(
        combined.message,
        "Expected '(', got Symbol \";\" (in parse as call)\n\tExpected '[', got Symbol \";\" (in parse as index)"
    );
    assert_eq!(combined.to_string(), format!("1:2: {}", combined.message));
}
