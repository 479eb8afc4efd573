//! Compiler catalog: the flat compiler list grouped by language, plus the
//! fuzzy lookups used to turn a user-supplied name into a compiler.

use compile_api::CompilerDescriptor;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{backend::CompileBackend, error::Error};

/// All compilers that share one `language` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageGroup {
    pub name: String,
    /// Compiler names in first-seen order. The first one is the default.
    pub compilers: Vec<String>,
    /// Union of the member compilers' templates, sorted
    pub templates: Vec<String>,
}

impl LanguageGroup {
    pub fn default_compiler(&self) -> Option<&str> {
        self.compilers.first().map(String::as_str)
    }
}

/// A way of reducing a name to a comparable form.
///
/// The candidate is reduced with [`MatchStrategy::normalize`]. The query goes
/// through [`MatchStrategy::normalize_query`], which never drops words, so a
/// multi-word query can only match a multi-word candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The whole name
    FullName,
    /// Everything before the first space
    FirstWord,
    /// The name with all whitespace removed
    Collapsed,
}

impl MatchStrategy {
    pub fn normalize(self, name: &str) -> String {
        let lower = name.to_lowercase();
        match self {
            MatchStrategy::FullName => lower,
            MatchStrategy::FirstWord => lower.split(' ').next().unwrap_or("").to_string(),
            MatchStrategy::Collapsed => lower.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn normalize_query(self, query: &str) -> String {
        match self {
            MatchStrategy::FullName | MatchStrategy::FirstWord => query.trim().to_lowercase(),
            MatchStrategy::Collapsed => self.normalize(query),
        }
    }

    pub fn matches(self, query: &str, candidate: &str) -> bool {
        self.normalize_query(query) == self.normalize(candidate)
    }
}

/// Strategies tried, in order, when matching a language name
pub const LANGUAGE_MATCH_STRATEGIES: &[MatchStrategy] = &[
    MatchStrategy::FullName,
    MatchStrategy::FirstWord,
    MatchStrategy::Collapsed,
];

/// Immutable snapshot of the service's compiler list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    compilers: Vec<CompilerDescriptor>,
    languages: Vec<LanguageGroup>,
}

impl Catalog {
    /// Build the catalog, grouping compilers by their exact `language` value.
    pub fn from_compilers(compilers: Vec<CompilerDescriptor>) -> Self {
        let mut languages: Vec<LanguageGroup> = Vec::new();
        let mut templates: Vec<BTreeSet<String>> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for compiler in &compilers {
            let idx = match positions.get(compiler.language.as_str()) {
                Some(&idx) => idx,
                None => {
                    languages.push(LanguageGroup {
                        name: compiler.language.clone(),
                        compilers: Vec::new(),
                        templates: Vec::new(),
                    });
                    templates.push(BTreeSet::new());
                    positions.insert(compiler.language.clone(), languages.len() - 1);
                    languages.len() - 1
                }
            };

            let group = &mut languages[idx];
            if group.compilers.contains(&compiler.name) {
                info!("Compiler load collision: {}", compiler.name);
                continue;
            }
            group.compilers.push(compiler.name.clone());
            templates[idx].extend(compiler.templates.iter().cloned());
        }

        for (group, set) in languages.iter_mut().zip(templates) {
            group.templates = set.into_iter().collect();
        }
        languages.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(
            "Built catalog with {} compilers in {} languages",
            compilers.len(),
            languages.len()
        );

        Self {
            compilers,
            languages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }

    pub fn compilers(&self) -> &[CompilerDescriptor] {
        &self.compilers
    }

    /// Language groups sorted by name
    pub fn languages(&self) -> &[LanguageGroup] {
        &self.languages
    }

    /// First language whose name matches the query under any strategy
    pub fn find_language(&self, query: &str) -> Option<&LanguageGroup> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.languages.iter().find(|group| {
            LANGUAGE_MATCH_STRATEGIES
                .iter()
                .any(|strategy| strategy.matches(query, &group.name))
        })
    }

    pub fn find_compiler_by_name(&self, query: &str) -> Option<&CompilerDescriptor> {
        let query = query.to_lowercase();
        self.compilers
            .iter()
            .find(|compiler| compiler.name.to_lowercase() == query)
    }

    pub fn find_compiler_by_display_name(&self, query: &str) -> Option<&CompilerDescriptor> {
        let query = query.to_lowercase();
        self.compilers
            .iter()
            .find(|compiler| compiler.display_name.to_lowercase() == query)
    }

    /// Resolve a user token to a compiler.
    ///
    /// Order: exact compiler name, then language (its default compiler), then
    /// display name.
    pub fn resolve(&self, token: &str) -> Result<&CompilerDescriptor, Error> {
        if let Some(compiler) = self.find_compiler_by_name(token) {
            return Ok(compiler);
        }

        if let Some(group) = self.find_language(token) {
            return group
                .default_compiler()
                .and_then(|name| self.find_compiler_by_name(name))
                .ok_or_else(|| Error::NotFound(format!("no compiler for language {}", group.name)));
        }

        self.find_compiler_by_display_name(token)
            .ok_or_else(|| Error::NotFound(token.to_string()))
    }

    /// Descriptors of a group's compilers, in the group's order
    pub fn group_compilers(&self, group: &LanguageGroup) -> Vec<&CompilerDescriptor> {
        group
            .compilers
            .iter()
            .filter_map(|name| {
                self.compilers
                    .iter()
                    .find(|c| &c.name == name && c.language == group.name)
            })
            .collect()
    }
}

/// Process-wide owner of the current [`Catalog`].
///
/// Refreshing builds a complete new catalog and swaps it in, so readers never
/// see a half-built one.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a fixed catalog
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// Re-fetch the compiler list and replace the catalog
    pub async fn refresh<B>(&self, backend: &B) -> Result<Arc<Catalog>, Error>
    where
        B: CompileBackend + ?Sized,
    {
        let compilers = backend.list_compilers().await?;
        let catalog = Arc::new(Catalog::from_compilers(compilers));

        *self.current.write().await = catalog.clone();
        info!(
            "Catalog refreshed: {} languages",
            catalog.languages().len()
        );

        Ok(catalog)
    }

    /// Current catalog, fetched first if nothing has been loaded yet
    pub async fn ensure_loaded<B>(&self, backend: &B) -> Result<Arc<Catalog>, Error>
    where
        B: CompileBackend + ?Sized,
    {
        let current = self.snapshot().await;
        if current.is_empty() {
            return self.refresh(backend).await;
        }
        Ok(current)
    }
}
