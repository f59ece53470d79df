//! Invocation context
//!
//! The bundle of collaborators every command is executed with: the type
//! catalog, a table resolver over it, a name converter, and a path
//! splitter.

use std::time::Instant;

use uuid::Uuid;

use crate::resolver::TableResolver;
use crate::schema::TypeCatalog;

/// Splits and validates namespaced names of the form `prefix:local`
#[derive(Debug, Clone, Copy, Default)]
pub struct NameConverter;

impl NameConverter {
    /// Splits a name into its optional prefix and local part
    pub fn split<'n>(&self, name: &'n str) -> (Option<&'n str>, &'n str) {
        match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        }
    }

    /// Returns the local part of a name
    pub fn local_name<'n>(&self, name: &'n str) -> &'n str {
        self.split(name).1
    }

    /// Returns true if the name is well-formed: a non-empty local part,
    /// a non-empty prefix when one is present, and at most one colon.
    pub fn is_valid(&self, name: &str) -> bool {
        if name.chars().filter(|c| *c == ':').count() > 1 {
            return false;
        }
        let (prefix, local) = self.split(name);
        !local.is_empty() && prefix != Some("")
    }
}

/// Splits absolute repository paths into segments
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSplitter;

impl PathSplitter {
    /// Splits an absolute path into its segments.
    ///
    /// Returns None for relative paths and paths with empty segments.
    pub fn split<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let rest = path.strip_prefix('/')?;
        if rest.is_empty() {
            return Some(Vec::new());
        }

        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments)
    }

    /// Returns the last segment of a path
    pub fn name<'p>(&self, path: &'p str) -> &'p str {
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Returns the parent path, or None at the root
    pub fn parent<'p>(&self, path: &'p str) -> Option<&'p str> {
        let (parent, _) = path.rsplit_once('/')?;
        if parent.is_empty() {
            Some("/")
        } else {
            Some(parent)
        }
    }
}

/// Collaborator bundle passed to every command execution
pub struct InvocationContext<'a> {
    catalog: &'a dyn TypeCatalog,
    name_converter: NameConverter,
    path_splitter: PathSplitter,
    request_id: Uuid,
    started_at: Instant,
}

impl<'a> InvocationContext<'a> {
    /// Creates a context over the given catalog
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self {
            catalog,
            name_converter: NameConverter,
            path_splitter: PathSplitter,
            request_id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }

    /// The type catalog
    pub fn catalog(&self) -> &dyn TypeCatalog {
        self.catalog
    }

    /// A table resolver over this context's catalog
    pub fn resolver(&self) -> TableResolver<'a, dyn TypeCatalog + 'a> {
        TableResolver::new(self.catalog)
    }

    /// The name converter
    pub fn name_converter(&self) -> &NameConverter {
        &self.name_converter
    }

    /// The path splitter
    pub fn path_splitter(&self) -> &PathSplitter {
        &self.path_splitter
    }

    /// Context id for log correlation
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Elapsed time since the context was created, in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}
