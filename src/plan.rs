//! Schema-driven planning.
//!
//! Computes the planned state and the attribute-level changes for a resource
//! from its prior state and the proposed configuration:
//!
//! - no prior state: create, schema defaults filled in
//! - null proposed state: destroy, every prior attribute removed
//! - otherwise: update, computed attributes carried over from prior state
//!
//! Attributes holding JSON text compare by their parsed value, so reformatting
//! a dashboard definition does not produce a diff.

use serde_json::{Map, Value};

use crate::schema::{Attribute, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource change.
pub fn plan(schema: &Schema, prior_state: Option<&Value>, proposed_state: &Value) -> PlanResult {
    let prior = prior_state.and_then(Value::as_object);

    let Some(proposed) = proposed_state.as_object() else {
        return plan_destroy(prior);
    };

    let mut planned = proposed.clone();
    fill_defaults(schema, &mut planned);

    match prior {
        None => plan_create(schema, planned),
        Some(prior) => plan_update(schema, prior, planned),
    }
}

fn plan_destroy(prior: Option<&Map<String, Value>>) -> PlanResult {
    let changes = prior
        .into_iter()
        .flat_map(|map| map.iter())
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| AttributeChange::removed(name.clone(), value.clone()))
        .collect();
    PlanResult::with_changes(Value::Null, changes)
}

fn plan_create(schema: &Schema, planned: Map<String, Value>) -> PlanResult {
    let changes = schema
        .block
        .attributes
        .iter()
        .filter(|(_, attr)| !attr.flags.is_computed_only())
        .filter_map(|(name, _)| {
            planned
                .get(name)
                .filter(|value| !value.is_null())
                .map(|value| AttributeChange::added(name.clone(), value.clone()))
        })
        .collect();
    PlanResult::with_changes(Value::Object(planned), changes)
}

fn plan_update(
    schema: &Schema,
    prior: &Map<String, Value>,
    mut planned: Map<String, Value>,
) -> PlanResult {
    let mut changes = Vec::new();

    for (name, attr) in &schema.block.attributes {
        let before = prior.get(name).unwrap_or(&Value::Null);
        let after = planned.get(name).cloned().unwrap_or(Value::Null);

        if attr.flags.computed && after.is_null() && !before.is_null() {
            planned.insert(name.clone(), before.clone());
            continue;
        }
        if attr.flags.is_computed_only() {
            continue;
        }

        if values_equal(attr, before, &after) {
            // Keep the prior text so formatting-only edits stay out of state.
            if !before.is_null() {
                planned.insert(name.clone(), before.clone());
            }
            continue;
        }

        changes.push(match (before.is_null(), after.is_null()) {
            (true, _) => AttributeChange::added(name.clone(), after),
            (false, true) => AttributeChange::removed(name.clone(), before.clone()),
            (false, false) => AttributeChange::modified(name.clone(), before.clone(), after),
        });
    }

    if changes.is_empty() {
        return PlanResult::no_change(Value::Object(planned));
    }
    PlanResult::with_changes(Value::Object(planned), changes)
}

fn fill_defaults(schema: &Schema, planned: &mut Map<String, Value>) {
    for (name, attr) in &schema.block.attributes {
        if let Some(default) = &attr.default {
            let unset = planned.get(name).map_or(true, Value::is_null);
            if unset {
                planned.insert(name.clone(), default.clone());
            }
        }
    }
}

/// Compare two attribute values, parsing JSON text attributes first.
pub fn values_equal(attr: &Attribute, before: &Value, after: &Value) -> bool {
    if before == after {
        return true;
    }
    if attr.is_json_text() {
        if let (Some(a), Some(b)) = (before.as_str(), after.as_str()) {
            return json_text_equal(a, b);
        }
    }
    false
}

/// Whether two strings hold the same JSON document.
///
/// Text that does not parse is compared verbatim.
pub fn json_text_equal(a: &str, b: &str) -> bool {
    match (
        serde_json::from_str::<Value>(a),
        serde_json::from_str::<Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueValidator;
    use serde_json::json;

    fn dashboard_schema() -> Schema {
        Schema::new(1)
            .with_attribute("dashboard_name", Attribute::required_string())
            .with_attribute("description", Attribute::optional_string())
            .with_attribute(
                "definition",
                Attribute::optional_string().with_validator(ValueValidator::JsonText),
            )
            .with_attribute("tags", Attribute::optional_string_list())
            .with_attribute("dashboard_id", Attribute::computed_string())
            .with_attribute("id", Attribute::computed_string())
    }

    #[test]
    fn test_create_fills_defaults() {
        let schema = Schema::new(1)
            .with_attribute("config_content", Attribute::required_string())
            .with_attribute("deploy", Attribute::optional_bool().with_default(json!(true)))
            .with_attribute("id", Attribute::computed_string());

        let result = plan(&schema, None, &json!({"config_content": "version: v3"}));
        assert_eq!(result.planned_state["deploy"], true);
        assert_eq!(result.changes.len(), 2);
        assert!(result.changes.iter().all(|c| c.before.is_none()));
    }

    #[test]
    fn test_update_carries_computed_attributes() {
        let schema = dashboard_schema();
        let prior = json!({
            "dashboard_name": "Overview",
            "dashboard_id": "d1",
            "id": "d1"
        });
        let proposed = json!({"dashboard_name": "Overview v2"});

        let result = plan(&schema, Some(&prior), &proposed);
        assert_eq!(result.planned_state["id"], "d1");
        assert_eq!(result.planned_state["dashboard_id"], "d1");
        assert_eq!(
            result.changes,
            vec![AttributeChange::modified(
                "dashboard_name",
                json!("Overview"),
                json!("Overview v2")
            )]
        );
    }

    #[test]
    fn test_json_text_compared_semantically() {
        let schema = dashboard_schema();
        let prior = json!({
            "dashboard_name": "Overview",
            "definition": "{\"widgets\":[],\"layout\":\"grid\"}",
            "id": "d1"
        });
        let proposed = json!({
            "dashboard_name": "Overview",
            "definition": "{\n  \"layout\": \"grid\",\n  \"widgets\": []\n}"
        });

        let result = plan(&schema, Some(&prior), &proposed);
        assert!(!result.has_changes());
        assert_eq!(result.planned_state["definition"], prior["definition"]);

        let proposed = json!({
            "dashboard_name": "Overview",
            "definition": "{\"widgets\":[1]}"
        });
        let result = plan(&schema, Some(&prior), &proposed);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "definition");
    }

    #[test]
    fn test_update_removed_attribute() {
        let schema = dashboard_schema();
        let prior = json!({"dashboard_name": "Overview", "description": "old", "id": "d1"});
        let proposed = json!({"dashboard_name": "Overview", "description": null});

        let result = plan(&schema, Some(&prior), &proposed);
        assert_eq!(
            result.changes,
            vec![AttributeChange::removed("description", json!("old"))]
        );
    }

    #[test]
    fn test_destroy() {
        let schema = dashboard_schema();
        let prior = json!({"dashboard_name": "Overview", "description": null, "id": "d1"});

        let result = plan(&schema, Some(&prior), &Value::Null);
        assert!(result.planned_state.is_null());
        assert_eq!(result.changes.len(), 2);
        assert!(result.changes.iter().all(|c| c.after.is_none()));
    }

    #[test]
    fn test_json_text_equal() {
        assert!(json_text_equal("{\"a\": 1, \"b\": 2}", "{\"b\":2,\"a\":1}"));
        assert!(!json_text_equal("{\"a\": 1}", "{\"a\": 2}"));
        assert!(json_text_equal("not json", "not json"));
        assert!(!json_text_equal("not json", "{}"));
    }
}
