use super::file_loader::{self, LoadError};
use crate::base::Source;
use crate::parser::{Capture, Grammar};
use crate::syntax::{self, ParseError, ParseOptions};
use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Options for a [`Workspace`]
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    /// Directories searched, in order, for imported files
    pub base_paths: Vec<PathBuf>,
    /// Options for each source's parse
    pub parse: ParseOptions,
}

impl WorkspaceOptions {
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_paths.push(path.into());
        self
    }
}

enum ImportRequest {
    File(SmolStr),
    Source(Source),
}

/// Handed to the parse callback so it can request more sources
pub struct ImportContext<'a> {
    source: &'a Source,
    requests: Vec<ImportRequest>,
}

impl<'a> ImportContext<'a> {
    fn new(source: &'a Source) -> Self {
        Self {
            source,
            requests: Vec::new(),
        }
    }

    /// The source being parsed
    pub fn source(&self) -> &Source {
        self.source
    }

    /// Import a file, resolved against the workspace's base paths
    pub fn import_file(&mut self, filename: impl Into<SmolStr>) {
        self.requests.push(ImportRequest::File(filename.into()));
    }

    /// Import a source that is already in memory
    pub fn import_source(&mut self, source: Source) {
        self.requests.push(ImportRequest::Source(source));
    }
}

/// A set of sources parsed once each, in request order
///
/// Sources are identified by name.
pub struct Workspace<T> {
    options: WorkspaceOptions,
    sources: IndexMap<SmolStr, Source>,
    pending: VecDeque<SmolStr>,
    results: IndexMap<SmolStr, T>,
    imports: IndexMap<SmolStr, IndexSet<SmolStr>>,
    errors: Vec<LoadError>,
}

impl<T> Default for Workspace<T> {
    fn default() -> Self {
        Self::new(WorkspaceOptions::default())
    }
}

impl<T> Workspace<T> {
    pub fn new(options: WorkspaceOptions) -> Self {
        Self {
            options,
            sources: IndexMap::new(),
            pending: VecDeque::new(),
            results: IndexMap::new(),
            imports: IndexMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn options(&self) -> &WorkspaceOptions {
        &self.options
    }

    // =========================================================================
    // Adding sources
    // =========================================================================

    /// Queue `source` for parsing.
    ///
    /// Returns false if a source with the same name is already known.
    pub fn add_source(&mut self, source: Source) -> bool {
        let name = SmolStr::from(source.name());
        if self.sources.contains_key(&name) {
            return false;
        }
        tracing::trace!("[WORKSPACE] queued {}", name);
        self.sources.insert(name.clone(), source);
        self.pending.push_back(name);
        true
    }

    /// Resolve `filename` against the base paths and queue it.
    ///
    /// Failures are recorded in [`errors`](Self::errors) and also
    /// returned as the name that could not be added.
    pub fn add_file(&mut self, filename: &str) -> Option<SmolStr> {
        match self.load_file(filename) {
            Ok(source) => {
                let name = SmolStr::from(source.name());
                self.add_source(source);
                Some(name)
            }
            Err(error) => {
                tracing::warn!("[WORKSPACE] {}", error);
                self.errors.push(error);
                None
            }
        }
    }

    fn load_file(&self, filename: &str) -> Result<Source, LoadError> {
        let path = file_loader::resolve_file(filename, &self.options.base_paths)?;
        file_loader::load_source(&path, filename)
    }

    /// Path `filename` would be loaded from, if it exists
    pub fn resolve_file(&self, filename: &str) -> Option<PathBuf> {
        file_loader::resolve_file(filename, &self.options.base_paths).ok()
    }

    /// Record that `importer` imports `imported`
    pub fn register_import(&mut self, importer: &str, imported: &str) {
        self.imports
            .entry(importer.into())
            .or_default()
            .insert(imported.into());
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse every queued source, including sources queued by `parse`
    /// itself, each exactly once.
    ///
    /// Failures are recorded in [`errors`](Self::errors); the remaining
    /// sources are still parsed.
    pub fn parse_sources<F>(&mut self, mut parse: F)
    where
        F: FnMut(&Source, &mut ImportContext<'_>) -> Result<T, ParseError>,
    {
        while let Some(name) = self.pending.pop_front() {
            let Some(source) = self.sources.get(&name).cloned() else {
                continue;
            };

            let mut context = ImportContext::new(&source);
            let outcome = parse(&source, &mut context);
            let requests = context.requests;

            match outcome {
                Ok(result) => {
                    tracing::debug!("[WORKSPACE] parsed {}", name);
                    self.results.insert(name.clone(), result);
                }
                Err(error) => {
                    tracing::debug!("[WORKSPACE] failed to parse {}: {}", name, error);
                    self.errors.push(LoadError::Parse {
                        name: name.clone(),
                        error,
                    });
                }
            }

            for request in requests {
                let imported = match request {
                    ImportRequest::File(filename) => self.add_file(&filename),
                    ImportRequest::Source(source) => {
                        let imported = SmolStr::from(source.name());
                        self.add_source(source);
                        Some(imported)
                    }
                };
                if let Some(imported) = imported {
                    self.register_import(&name, &imported);
                }
            }
        }
    }

    /// Parse every queued source with `grammar`, turning each source's
    /// results into `T` with `extract`
    pub fn parse_with<N, F>(&mut self, grammar: &Grammar<N>, mut extract: F)
    where
        N: Clone,
        F: FnMut(Vec<Capture<N>>, &mut ImportContext<'_>) -> T,
    {
        let options = self.options.parse.clone();
        self.parse_sources(|source, context| {
            let results = syntax::parse(grammar, source, &options)?;
            Ok(extract(results, context))
        });
    }

    /// Move the state of `other` into this workspace.
    ///
    /// Sources `other` had not parsed yet are parsed next.
    pub fn absorb(&mut self, other: Workspace<T>) {
        self.errors.extend(other.errors);

        for (name, source) in other.sources {
            self.sources.entry(name).or_insert(source);
        }
        for (name, result) in other.results {
            self.results.entry(name).or_insert(result);
        }
        for (importer, imported) in other.imports {
            self.imports.entry(importer).or_default().extend(imported);
        }
        for name in other.pending.into_iter().rev() {
            if !self.results.contains_key(&name) && !self.pending.contains(&name) {
                self.pending.push_front(name);
            }
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every known source, in the order it was added
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.get(name)
    }

    pub fn result(&self, name: &str) -> Option<&T> {
        self.results.get(name)
    }

    /// Parsed results, in the order their sources were parsed
    pub fn results(&self) -> impl Iterator<Item = (&str, &T)> {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// Names of the sources `name` imported
    pub fn imports_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.imports
            .get(name)
            .into_iter()
            .flat_map(|imported| imported.iter().map(SmolStr::as_str))
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[LoadError] {
        &self.errors
    }
}
