//! Variable catalogs mapping public variable names to warehouse expressions.

/// One public variable and the column expression that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name exposed to API clients and used as the column alias.
    pub name: &'static str,
    /// Warehouse expression, either a column reference or a computed value.
    pub expression: &'static str,
}

impl CatalogEntry {
    pub const fn new(name: &'static str, expression: &'static str) -> Self {
        Self { name, expression }
    }
}

/// Fixed, ordered set of variables a model exposes.
#[derive(Debug, Clone, Copy)]
pub struct VariableCatalog {
    entries: &'static [CatalogEntry],
}

impl VariableCatalog {
    pub const fn new(entries: &'static [CatalogEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.name)
    }

    /// Entries to select for a request.
    ///
    /// An empty request selects the whole catalog. Otherwise only entries
    /// named in `requested` are returned, in catalog order; requested names
    /// that the catalog does not define are ignored.
    pub fn select(&self, requested: &[String]) -> Vec<&'static CatalogEntry> {
        if requested.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|e| requested.iter().any(|r| r == e.name))
            .collect()
    }

    /// Requested names that the catalog does not define.
    pub fn unknown<'a>(&self, requested: &'a [String]) -> Vec<&'a str> {
        requested
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains(name))
            .collect()
    }
}
