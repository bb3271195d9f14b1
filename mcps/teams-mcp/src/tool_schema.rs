//! Spawn tool descriptor derived from the capability snapshot
//!
//! The spawn tool's `backend` selector and description depend on what the
//! environment can run. [`spawn_tool_descriptor`] computes them as a pure
//! function of the registered descriptor and a [`CapabilitySnapshot`]; the
//! server applies it once while it is being constructed, before it serves
//! any request.

use rmcp::model::Tool;
use serde_json::{json, Value};
use std::fmt::Write;
use std::sync::Arc;

use crate::discovery::CapabilitySnapshot;

pub const SPAWN_TOOL_NAME: &str = "spawn_teammate";
const BACKEND_PROPERTY: &str = "backend";

const SPAWN_SUMMARY: &str = "Spawn a new teammate agent in a team. The teammate starts \
    working on `prompt` in `cwd` (absolute path) under the chosen backend.";

/// Return `base` with its backend enum and description fitted to `caps`
pub fn spawn_tool_descriptor(base: &Tool, caps: &CapabilitySnapshot) -> Tool {
    let mut schema = (*base.input_schema).clone();

    let backend_schema = backend_property(caps);
    match schema.get_mut("properties").and_then(Value::as_object_mut) {
        Some(properties) => {
            properties.insert(BACKEND_PROPERTY.to_string(), backend_schema);
        }
        None => {
            schema.insert(
                "properties".to_string(),
                json!({ BACKEND_PROPERTY: backend_schema }),
            );
        }
    }

    let mut tool = base.clone();
    tool.input_schema = Arc::new(schema);
    tool.description = Some(spawn_description(caps).into());
    tool
}

fn backend_property(caps: &CapabilitySnapshot) -> Value {
    let enabled: Vec<&str> = caps.enabled_backends.iter().map(|b| b.as_str()).collect();

    match caps.default_backend() {
        Some(default) => json!({
            "type": "string",
            "enum": enabled,
            "default": default.as_str(),
            "description": "Execution backend for the teammate",
        }),
        None => json!({
            "type": "string",
            "description": "Execution backend for the teammate (none available in this environment)",
        }),
    }
}

/// Human-readable description listing backends, models and sub-agent types
pub fn spawn_description(caps: &CapabilitySnapshot) -> String {
    let mut out = String::from(SPAWN_SUMMARY);

    out.push_str("\n\nAvailable backends: ");
    if caps.enabled_backends.is_empty() {
        out.push_str("none (spawning is unavailable)");
    } else {
        let listed: Vec<String> = caps
            .enabled_backends
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if i == 0 {
                    format!("{} (default)", b)
                } else {
                    b.to_string()
                }
            })
            .collect();
        out.push_str(&listed.join(", "));

        out.push_str("\n\nModels by backend:");
        for backend in &caps.enabled_backends {
            let models = caps.models_for(*backend);
            if models.is_empty() {
                let _ = write!(out, "\n- {}: (none discovered, backend default)", backend);
            } else {
                let _ = write!(out, "\n- {}: {}", backend, models.join(", "));
            }
        }
    }

    if !caps.subagents.is_empty() {
        out.push_str("\n\nSub-agent types (`subagent_type`):");
        for agent in &caps.subagents {
            let _ = write!(out, "\n- {}: {}", agent.name, agent.description);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Backend, SubAgent};
    use serde_json::Map;

    fn base_tool() -> Tool {
        let schema = json!({
            "type": "object",
            "properties": {
                "team": {"type": "string"},
                "backend": {"type": ["string", "null"]}
            },
            "required": ["team"]
        });
        let schema: Map<String, Value> = serde_json::from_value(schema).unwrap();
        Tool::new(SPAWN_TOOL_NAME, "placeholder", Arc::new(schema))
    }

    fn caps(enabled: &[Backend]) -> CapabilitySnapshot {
        let mut caps = CapabilitySnapshot {
            enabled_backends: enabled.to_vec(),
            ..Default::default()
        };
        caps.models
            .insert(Backend::Claude, vec!["claude-sonnet-4-6".into()]);
        caps.subagents.push(SubAgent {
            name: "reviewer".into(),
            description: "Reviews diffs".into(),
        });
        caps
    }

    #[test]
    fn test_backend_enum_restricted_to_enabled() {
        let tool = spawn_tool_descriptor(&base_tool(), &caps(&[Backend::Claude]));
        let backend = &tool.input_schema["properties"]["backend"];
        assert_eq!(backend["enum"], json!(["claude"]));
        assert_eq!(backend["default"], json!("claude"));
        // untouched properties survive
        assert!(tool.input_schema["properties"].get("team").is_some());
        assert_eq!(tool.input_schema["required"], json!(["team"]));
    }

    #[test]
    fn test_no_backend_advertised_when_none_enabled() {
        let tool = spawn_tool_descriptor(&base_tool(), &caps(&[]));
        let backend = &tool.input_schema["properties"]["backend"];
        assert!(backend.get("enum").is_none());
        assert!(backend.get("default").is_none());
        assert!(tool
            .description
            .as_deref()
            .unwrap()
            .contains("none (spawning is unavailable)"));
    }

    #[test]
    fn test_description_lists_models_and_subagents() {
        let text = spawn_description(&caps(&[Backend::Claude, Backend::Opencode]));
        assert!(text.contains("claude (default), opencode"));
        assert!(text.contains("- claude: claude-sonnet-4-6"));
        assert!(text.contains("- opencode: (none discovered"));
        assert!(text.contains("- reviewer: Reviews diffs"));
    }

    #[test]
    fn test_base_descriptor_not_modified() {
        let base = base_tool();
        let _ = spawn_tool_descriptor(&base, &caps(&[Backend::Claude]));
        assert!(base.input_schema["properties"]["backend"].get("enum").is_none());
        assert_eq!(base.description.as_deref(), Some("placeholder"));
    }
}
