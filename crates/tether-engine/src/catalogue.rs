//! The per-turn assembled tool offering.
//!
//! A catalogue is built once per model turn from factory output, then read
//! by the runtime to resolve names from the model's tool calls. Name
//! uniqueness is enforced at insertion, which is the only time it can be:
//! configured endpoints and ephemeral MCP tools derive their names at
//! construction, so two configs can legitimately collide.

use std::collections::HashMap;
use thiserror::Error;

use tether_core::context::ThreadSnapshot;
use tether_core::identifiers::ToolName;
use tether_core::tool::Tool;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("duplicate tool name '{name}'")]
    DuplicateName { name: ToolName },
}

/// Insertion-ordered collection of uniquely named tools.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    tools: Vec<Tool>,
    by_name: HashMap<ToolName, usize>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalogue from factory output, rejecting name collisions.
    pub fn from_tools(tools: impl IntoIterator<Item = Tool>) -> Result<Self, CatalogueError> {
        let mut catalogue = Self::new();
        for tool in tools {
            catalogue.insert(tool)?;
        }
        Ok(catalogue)
    }

    pub fn insert(&mut self, tool: Tool) -> Result<(), CatalogueError> {
        let name = tool.name();
        if self.by_name.contains_key(&name) {
            return Err(CatalogueError::DuplicateName { name });
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &ToolName) -> Option<&Tool> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    /// The tools that should be surfaced to the model for this snapshot.
    pub fn offered(&self, snapshot: &ThreadSnapshot) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|tool| tool.is_available(snapshot))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::identifiers::{KnowledgeBaseId, SourceId};

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalogue = Catalogue::new();
        catalogue.insert(Tool::WebSearch).unwrap();
        let err = catalogue.insert(Tool::WebSearch).unwrap_err();
        assert_eq!(
            err,
            CatalogueError::DuplicateName {
                name: ToolName::new_unchecked("web_search")
            }
        );
        assert_eq!(catalogue.len(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let catalogue = Catalogue::from_tools([Tool::WebSearch, Tool::CreateDocument]).unwrap();
        let name = ToolName::new_unchecked("create_document");
        assert_eq!(catalogue.get(&name), Some(&Tool::CreateDocument));
        assert!(catalogue.get(&ToolName::new_unchecked("nope")).is_none());
    }

    #[test]
    fn offered_filters_unavailable_contextual_tools() {
        let catalogue = Catalogue::from_tools([
            Tool::WebSearch,
            Tool::QuerySource {
                source_ids: vec![SourceId::new_unchecked("src-1")],
            },
            Tool::KnowledgeSearch {
                knowledge_base_ids: vec![KnowledgeBaseId::new_unchecked("kb-1")],
            },
        ])
        .unwrap();

        // Bare thread: only the plain tool is offered.
        let bare = ThreadSnapshot::default();
        let offered = catalogue.offered(&bare);
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0], &Tool::WebSearch);

        // Source attached: query_source joins the offering.
        let with_source = ThreadSnapshot {
            source_ids: vec![SourceId::new_unchecked("src-1")],
            ..ThreadSnapshot::default()
        };
        assert_eq!(catalogue.offered(&with_source).len(), 2);
    }
}
