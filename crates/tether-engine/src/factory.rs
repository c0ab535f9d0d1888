//! Pure construction of tool instances.
//!
//! The factory has no side effects and no I/O: it turns a kind, an optional
//! persisted config, and the turn's ambient inputs into fresh [`Tool`]
//! values. Every call gets its own instances; nothing is cached across
//! turns, which is what lets contextual and ephemeral schemas stay accurate.

use thiserror::Error;

use tether_core::context::ThreadSnapshot;
use tether_core::skill::SkillName;
use tether_core::tool::{
    McpIntegration, McpResourceBinding, Tool, ToolConfig, ToolKind, derive_tool_name,
};

/// Per-turn ambient inputs the factory draws on.
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    /// Attachment state of the calling thread.
    pub snapshot: ThreadSnapshot,
    /// Skills the caller may activate this turn.
    pub offered_skills: Vec<SkillName>,
    /// Live integration descriptors fetched at the start of the turn.
    pub integrations: Vec<McpIntegration>,
}

/// Why construction failed. Both variants are caller defects, not model
/// mistakes; neither reaches the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("unsupported tool type '{name}'")]
    UnsupportedToolType { name: String },

    #[error("invalid configuration for {kind}: {reason}")]
    InvalidConfig { kind: ToolKind, reason: String },
}

/// Stateless tool factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolFactory;

impl ToolFactory {
    /// Every kind the factory can construct, exactly the catalogue.
    pub fn supported_kinds() -> &'static [ToolKind] {
        ToolKind::all()
    }

    /// Construct the tool instances for one kind.
    ///
    /// Most kinds yield exactly one instance. `McpTool` fans out, one
    /// instance per remote tool across the live integrations.
    /// `McpResource` stays a single instance whose bindings span every
    /// integration that advertises resources, or none when no resources
    /// are advertised.
    pub fn create(
        kind: ToolKind,
        config: Option<&ToolConfig>,
        turn: Option<&TurnContext>,
    ) -> Result<Vec<Tool>, FactoryError> {
        let needs_turn = |reason: &str| FactoryError::InvalidConfig {
            kind,
            reason: format!("requires turn context: {reason}"),
        };

        match kind {
            ToolKind::WebSearch => Ok(vec![Tool::WebSearch]),
            ToolKind::CodeExecution => Ok(vec![Tool::CodeExecution]),
            ToolKind::ProductKnowledge => Ok(vec![Tool::ProductKnowledge]),
            ToolKind::CreateDocument => Ok(vec![Tool::CreateDocument]),
            ToolKind::UpdateDocument => Ok(vec![Tool::UpdateDocument]),

            ToolKind::ActivateSkill => {
                let turn = turn.ok_or_else(|| needs_turn("offered skill names"))?;
                Ok(vec![Tool::ActivateSkill {
                    offered: turn.offered_skills.clone(),
                }])
            }
            ToolKind::QuerySource => {
                let turn = turn.ok_or_else(|| needs_turn("attached source ids"))?;
                Ok(vec![Tool::QuerySource {
                    source_ids: turn.snapshot.source_ids.clone(),
                }])
            }
            ToolKind::GetSourceText => {
                let turn = turn.ok_or_else(|| needs_turn("attached source ids"))?;
                Ok(vec![Tool::GetSourceText {
                    source_ids: turn.snapshot.source_ids.clone(),
                }])
            }
            ToolKind::KnowledgeSearch => {
                let turn = turn.ok_or_else(|| needs_turn("knowledge base ids"))?;
                Ok(vec![Tool::KnowledgeSearch {
                    knowledge_base_ids: turn.snapshot.knowledge_base_ids.clone(),
                }])
            }
            ToolKind::GetKnowledgeDocument => {
                let turn = turn.ok_or_else(|| needs_turn("knowledge base ids"))?;
                Ok(vec![Tool::GetKnowledgeDocument {
                    knowledge_base_ids: turn.snapshot.knowledge_base_ids.clone(),
                }])
            }

            ToolKind::HttpEndpoint => match config {
                Some(ToolConfig::HttpEndpoint(endpoint)) => Ok(vec![Tool::HttpEndpoint {
                    name: derive_tool_name("http", &endpoint.display_name),
                    config: endpoint.clone(),
                }]),
                None => Err(FactoryError::InvalidConfig {
                    kind,
                    reason: "configurable kind requires a persisted config".to_string(),
                }),
            },

            ToolKind::McpTool => {
                let turn = turn.ok_or_else(|| needs_turn("live integration descriptors"))?;
                let mut tools = Vec::new();
                for integration in &turn.integrations {
                    let prefix = derive_tool_name("mcp", &integration.display_name);
                    for remote in &integration.tools {
                        tools.push(Tool::McpTool {
                            name: derive_tool_name(prefix.as_str(), &remote.name),
                            integration_id: integration.id.clone(),
                            remote: remote.clone(),
                        });
                    }
                }
                Ok(tools)
            }
            ToolKind::McpResource => {
                let turn = turn.ok_or_else(|| needs_turn("live integration descriptors"))?;
                // One reader tool for the whole turn: the fixed wire name
                // must stay unique however many integrations are live, so
                // bindings from all of them share a single instance.
                let resources: Vec<McpResourceBinding> = turn
                    .integrations
                    .iter()
                    .flat_map(|integration| {
                        integration.resources.iter().map(|resource| McpResourceBinding {
                            integration_id: integration.id.clone(),
                            resource: resource.clone(),
                        })
                    })
                    .collect();
                if resources.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![Tool::McpResource { resources }])
                }
            }
        }
    }

    /// Construct by wire name, for callers holding an untyped tool type
    /// string.
    pub fn create_by_name(
        name: &str,
        config: Option<&ToolConfig>,
        turn: Option<&TurnContext>,
    ) -> Result<Vec<Tool>, FactoryError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| FactoryError::UnsupportedToolType {
            name: name.to_string(),
        })?;
        Self::create(kind, config, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tether_core::identifiers::{IntegrationId, KnowledgeBaseId, SourceId};
    use tether_core::tool::{HttpEndpointConfig, HttpMethod, McpRemoteResource, McpRemoteTool};

    fn turn() -> TurnContext {
        TurnContext {
            snapshot: ThreadSnapshot {
                source_ids: vec![SourceId::new_unchecked("src-1")],
                knowledge_base_ids: vec![KnowledgeBaseId::new_unchecked("kb-1")],
                integration_ids: vec![IntegrationId::new_unchecked("int-1")],
                offered_skills: vec![SkillName::new_unchecked("Budget Analysis")],
            },
            offered_skills: vec![SkillName::new_unchecked("Budget Analysis")],
            integrations: vec![McpIntegration {
                id: IntegrationId::new_unchecked("int-1"),
                display_name: "Issue Tracker".to_string(),
                tools: vec![
                    McpRemoteTool {
                        name: "create_issue".to_string(),
                        description: "File an issue".to_string(),
                        input_schema: json!({ "type": "object", "properties": {} }),
                        returns_sensitive_data: false,
                    },
                    McpRemoteTool {
                        name: "list_issues".to_string(),
                        description: "List issues".to_string(),
                        input_schema: json!({ "type": "object", "properties": {} }),
                        returns_sensitive_data: false,
                    },
                ],
                resources: vec![McpRemoteResource {
                    uri: "tracker://boards/main".to_string(),
                    name: "Main board".to_string(),
                    description: String::new(),
                }],
            }],
        }
    }

    fn endpoint_config() -> ToolConfig {
        ToolConfig::HttpEndpoint(HttpEndpointConfig {
            display_name: "Weather Lookup".to_string(),
            url: "https://api.example.com/weather".to_string(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            description: "Get the weather".to_string(),
            description_long: None,
            argument_schema: None,
        })
    }

    #[test]
    fn every_kind_constructs_with_full_inputs() {
        let turn = turn();
        let config = endpoint_config();
        for kind in ToolFactory::supported_kinds() {
            let config = matches!(kind, ToolKind::HttpEndpoint).then_some(&config);
            let tools = ToolFactory::create(*kind, config, Some(&turn))
                .unwrap_or_else(|err| panic!("kind {kind} failed: {err}"));
            assert!(!tools.is_empty(), "kind {kind} produced no tools");
            for tool in &tools {
                assert_eq!(tool.kind(), *kind);
            }
        }
    }

    #[test]
    fn supported_kinds_cover_the_whole_catalogue() {
        assert_eq!(ToolFactory::supported_kinds().len(), 13);
    }

    #[test]
    fn unknown_wire_name_is_unsupported() {
        let err = ToolFactory::create_by_name("teleport", None, None).unwrap_err();
        assert_eq!(
            err,
            FactoryError::UnsupportedToolType {
                name: "teleport".to_string()
            }
        );
    }

    #[test]
    fn configurable_kind_without_config_is_invalid() {
        let err = ToolFactory::create(ToolKind::HttpEndpoint, None, None).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::InvalidConfig {
                kind: ToolKind::HttpEndpoint,
                ..
            }
        ));
    }

    #[test]
    fn contextual_kind_without_turn_is_invalid() {
        let err = ToolFactory::create(ToolKind::QuerySource, None, None).unwrap_err();
        assert!(matches!(err, FactoryError::InvalidConfig { .. }));
    }

    #[test]
    fn mcp_tools_fan_out_per_remote_tool() {
        let tools = ToolFactory::create(ToolKind::McpTool, None, Some(&turn())).unwrap();
        assert_eq!(tools.len(), 2);
        let names: Vec<String> = tools.iter().map(|t| t.name().to_string()).collect();
        assert!(names.contains(&"mcp_issue_tracker_create_issue".to_string()));
        assert!(names.contains(&"mcp_issue_tracker_list_issues".to_string()));
    }

    #[test]
    fn resource_reads_collapse_to_one_tool_across_integrations() {
        let mut turn = turn();
        turn.integrations.push(McpIntegration {
            id: IntegrationId::new_unchecked("int-2"),
            display_name: "Wiki".to_string(),
            tools: vec![],
            resources: vec![McpRemoteResource {
                uri: "wiki://pages/home".to_string(),
                name: "Home page".to_string(),
                description: String::new(),
            }],
        });

        let tools = ToolFactory::create(ToolKind::McpResource, None, Some(&turn)).unwrap();
        assert_eq!(tools.len(), 1);
        match &tools[0] {
            Tool::McpResource { resources } => {
                assert_eq!(resources.len(), 2);
                assert_eq!(resources[0].integration_id.as_str(), "int-1");
                assert_eq!(resources[1].integration_id.as_str(), "int-2");
            }
            other => panic!("expected McpResource, got {other:?}"),
        }

        // Two resource-bearing integrations on one turn still yield a
        // unique catalogue.
        let catalogue = crate::catalogue::Catalogue::from_tools(tools).unwrap();
        assert_eq!(catalogue.len(), 1);
    }

    #[test]
    fn no_advertised_resources_means_no_reader_tool() {
        let mut turn = turn();
        turn.integrations[0].resources.clear();
        let tools = ToolFactory::create(ToolKind::McpResource, None, Some(&turn)).unwrap();
        assert!(tools.is_empty());
    }

    #[test]
    fn factory_calls_yield_fresh_instances() {
        let turn = turn();
        let first = ToolFactory::create(ToolKind::QuerySource, None, Some(&turn)).unwrap();
        let second = ToolFactory::create(ToolKind::QuerySource, None, Some(&turn)).unwrap();
        // Equal by value, but independently owned.
        assert_eq!(first, second);
    }
}
