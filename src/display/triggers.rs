//! Pipeline trigger cross references
//!
//! EventListeners point at TriggerTemplates by name, and a TriggerTemplate stamps
//! out PipelineRuns for a pipeline. These helpers walk those links in both
//! directions for the details views.

use serde_json::Value;

use crate::models::Resource;

/// Template name of a trigger entry, from `template.ref` or the older `template.name`
fn trigger_template_name(trigger: &Value) -> Option<&str> {
    let template = trigger.get("template")?;
    template
        .get("ref")
        .or_else(|| template.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Names of the TriggerTemplates referenced by an EventListener, in trigger order
pub fn event_listener_template_names(event_listener: &Resource) -> Vec<String> {
    event_listener
        .as_value()
        .get("spec")
        .and_then(|s| s.get("triggers"))
        .and_then(Value::as_array)
        .map(|triggers| {
            triggers
                .iter()
                .filter_map(trigger_template_name)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Pipeline run by a TriggerTemplate
///
/// Taken from the first PipelineRun in `spec.resourcetemplates`.
pub fn trigger_template_pipeline_name(trigger_template: &Resource) -> Option<String> {
    trigger_template
        .as_value()
        .get("spec")
        .and_then(|s| s.get("resourcetemplates"))
        .and_then(Value::as_array)?
        .iter()
        .find(|t| t.get("kind").and_then(Value::as_str) == Some("PipelineRun"))
        .and_then(|run| run.get("spec"))
        .and_then(|s| s.get("pipelineRef"))
        .and_then(|r| r.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Names of the EventListeners that reference `template_name`
pub fn event_listeners_for_template(
    template_name: &str,
    event_listeners: &[Resource],
) -> Vec<String> {
    event_listeners
        .iter()
        .filter(|el| {
            event_listener_template_names(el)
                .iter()
                .any(|name| name == template_name)
        })
        .filter_map(|el| el.name().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listener(name: &str, templates: &[&str]) -> Resource {
        let triggers: Vec<Value> = templates
            .iter()
            .map(|t| json!({"template": {"ref": t}}))
            .collect();
        Resource::new(json!({
            "kind": "EventListener",
            "metadata": {"name": name, "uid": format!("{}-uid", name)},
            "spec": {"triggers": triggers}
        }))
    }

    #[test]
    fn test_template_names_skip_empty_triggers() {
        let el = Resource::new(json!({
            "kind": "EventListener",
            "metadata": {"name": "el"},
            "spec": {"triggers": [
                {"template": {"name": "legacy"}},
                {"bindings": []},
                {"template": {"ref": ""}},
                {"template": {"ref": "current"}}
            ]}
        }));
        assert_eq!(event_listener_template_names(&el), vec!["legacy", "current"]);
        assert!(event_listener_template_names(&Resource::new(json!({}))).is_empty());
    }

    #[test]
    fn test_pipeline_name_from_first_pipeline_run() {
        let tt = Resource::new(json!({
            "kind": "TriggerTemplate",
            "metadata": {"name": "tt"},
            "spec": {"resourcetemplates": [
                {"kind": "TaskRun", "spec": {"taskRef": {"name": "lint"}}},
                {"kind": "PipelineRun", "spec": {"pipelineRef": {"name": "build-and-deploy"}}},
                {"kind": "PipelineRun", "spec": {"pipelineRef": {"name": "other"}}}
            ]}
        }));
        assert_eq!(
            trigger_template_pipeline_name(&tt).as_deref(),
            Some("build-and-deploy")
        );
        assert_eq!(trigger_template_pipeline_name(&Resource::new(json!({}))), None);
    }

    #[test]
    fn test_event_listeners_for_template() {
        let listeners = vec![
            listener("github", &["build", "release"]),
            listener("gitlab", &["release"]),
            listener("cron", &["nightly"]),
        ];
        assert_eq!(
            event_listeners_for_template("release", &listeners),
            vec!["github", "gitlab"]
        );
        assert!(event_listeners_for_template("missing", &listeners).is_empty());
    }
}
