use super::SourceInfo;
use crate::{mapping::MappingDefinition, Error, Result};

use std::sync::Arc;

/// Capability a caller needs from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    fn allows(self, source: &SourceInfo) -> bool {
        match self {
            Access::Read => source.readable,
            Access::Write => source.writable,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Access::Read => "readable",
            Access::Write => "writable",
        }
    }
}

/// Configured sources, in registration order.
#[derive(Debug, Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<SourceInfo>>,
}

impl SourceRegistry {
    pub fn new() -> SourceRegistry {
        SourceRegistry::default()
    }

    pub fn register(&mut self, source: SourceInfo) {
        self.sources.push(Arc::new(source));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SourceInfo>> {
        self.sources.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Distinct source names, in order of first registration.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for source in &self.sources {
            if !names.contains(&source.name.as_str()) {
                names.push(&source.name);
            }
        }
        names
    }

    /// Sources usable for `mapping` with the requested access, preferred
    /// first.
    ///
    /// A mapping that declares a source only matches sources of that name.
    /// Results are sorted by `order`; ties keep registration order.
    pub fn resolve(
        &self,
        mapping: &MappingDefinition,
        access: Access,
    ) -> Result<Vec<Arc<SourceInfo>>> {
        self.resolve_named(mapping.source(), mapping.class(), access)
    }

    /// Same as [`resolve`](Self::resolve) for a source name, `None` meaning
    /// any source. `class` only appears in the error.
    pub fn resolve_named(
        &self,
        name: Option<&str>,
        class: &str,
        access: Access,
    ) -> Result<Vec<Arc<SourceInfo>>> {
        let mut matching: Vec<_> = self
            .sources
            .iter()
            .filter(|source| name.map_or(true, |name| source.name == name))
            .filter(|source| access.allows(source))
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(Error::no_source_available(class, access.as_str()));
        }

        // `sort_by_key` is stable
        matching.sort_by_key(|source| source.order);
        Ok(matching)
    }

    /// The preferred source for `mapping`.
    pub fn first(&self, mapping: &MappingDefinition, access: Access) -> Result<Arc<SourceInfo>> {
        let mut sources = self.resolve(mapping, access)?;
        Ok(sources.swap_remove(0))
    }
}
