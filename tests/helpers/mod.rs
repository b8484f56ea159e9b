pub mod grammar_fixtures;
