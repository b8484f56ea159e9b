//! Multi-source parsing with imports resolved from disk.

use lockstep::base::Source;
use lockstep::parser::{Capture, ErrorCode, Grammar, GrammarBuilder, Pattern, TokenKind};
use lockstep::project::{ImportContext, LoadError, Workspace, WorkspaceOptions};
use std::fs;
use tempfile::TempDir;

/// `import "file"` lines followed by integers
fn modules() -> Grammar<()> {
    let mut g = GrammarBuilder::new();
    g.define(
        "main",
        Pattern::sequence(vec![
            Pattern::list(Pattern::rule("import")),
            Pattern::list(Pattern::token(TokenKind::Integer)),
            Pattern::eof(),
        ]),
    );
    g.define(
        "import",
        Pattern::sequence_with(
            Capture::nth(1),
            vec![Pattern::keyword("import"), Pattern::token(TokenKind::String)],
        ),
    );
    g.build().unwrap()
}

/// Request every imported file and count the integers
fn count_integers(results: Vec<Capture<()>>, context: &mut ImportContext<'_>) -> usize {
    let items = results[0].as_list().unwrap();
    for import in items[0].as_list().unwrap() {
        let quoted = import.text().unwrap();
        context.import_file(quoted.trim_matches('"'));
    }
    items[1].as_list().unwrap().len()
}

fn workspace_in(dir: &TempDir) -> Workspace<usize> {
    Workspace::new(WorkspaceOptions::default().with_base_path(dir.path()))
}

#[test]
fn test_imports_are_followed_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "import \"b.txt\" import \"c.txt\" 1").unwrap();
    fs::write(dir.path().join("b.txt"), "import \"c.txt\" 1 2").unwrap();
    fs::write(dir.path().join("c.txt"), "1 2 3").unwrap();

    let mut ws = workspace_in(&dir);
    assert_eq!(ws.add_file("a.txt").as_deref(), Some("a.txt"));
    ws.parse_with(&modules(), count_integers);

    assert!(!ws.has_error(), "{:?}", ws.errors());
    let counts: Vec<_> = ws.results().collect();
    assert_eq!(counts, vec![("a.txt", &1), ("b.txt", &2), ("c.txt", &3)]);
    assert_eq!(ws.imports_of("a.txt").collect::<Vec<_>>(), vec!["b.txt", "c.txt"]);
    assert_eq!(ws.imports_of("b.txt").collect::<Vec<_>>(), vec!["c.txt"]);
    assert_eq!(ws.sources().count(), 3);
}

#[test]
fn test_missing_import_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "import \"gone.txt\" 1").unwrap();

    let mut ws = workspace_in(&dir);
    ws.add_file("a.txt");
    ws.parse_with(&modules(), count_integers);

    assert_eq!(ws.result("a.txt"), Some(&1));
    assert_eq!(ws.errors().len(), 1);
    let LoadError::NotFound { name, searched } = &ws.errors()[0] else {
        panic!("expected a missing file, got {:?}", ws.errors()[0]);
    };
    assert_eq!(name, "gone.txt");
    assert_eq!(searched, &vec![dir.path().to_path_buf()]);
}

#[test]
fn test_parse_failures_do_not_stop_the_run() {
    let mut ws: Workspace<usize> = Workspace::default();
    ws.add_source(Source::virtual_source("bad", "1 import"));
    ws.add_source(Source::virtual_source("good", "4 5"));
    ws.parse_with(&modules(), count_integers);

    assert_eq!(ws.result("good"), Some(&2));
    assert!(ws.result("bad").is_none());
    assert_eq!(ws.errors().len(), 1);
    assert_eq!(ws.errors()[0].code(), ErrorCode::E0202);
    assert!(ws.errors()[0].to_string().starts_with("bad: "));
}

#[test]
fn test_resolve_file_searches_base_paths_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(second.path().join("only.txt"), "").unwrap();

    let ws: Workspace<usize> = Workspace::new(
        WorkspaceOptions::default()
            .with_base_path(first.path())
            .with_base_path(second.path()),
    );
    assert_eq!(ws.resolve_file("only.txt"), Some(second.path().join("only.txt")));
    assert_eq!(ws.resolve_file("none.txt"), None);
}
