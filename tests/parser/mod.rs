mod tests_diagnostics;
mod tests_engine;
mod tests_examples;
