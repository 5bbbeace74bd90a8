//! End-to-end resource lifecycles against a mocked Edge Delta API
//!
//! Drives `EdgeDeltaProvider` through `ProviderTester`, the same way the gRPC
//! layer does, with wiremock standing in for the REST API.

use edgedelta_provider::testing::{
    assert_no_errors, assert_plan_changes_attribute, assert_plan_creates,
    assert_plan_does_not_change_attribute, assert_plan_no_changes, assert_warning_contains,
    ProviderTester,
};
use edgedelta_provider::{ApiClient, EdgeDeltaProvider, ProviderError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "org-1";
const CONF_ID: &str = "660e8400-e29b-41d4-a716-446655440001";
const OTHER_CONF_ID: &str = "660e8400-e29b-41d4-a716-446655440009";
const MONITOR_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const DASHBOARD_ID: &str = "770e8400-e29b-41d4-a716-446655440002";

fn tester(server: &MockServer) -> ProviderTester<EdgeDeltaProvider> {
    let client = ApiClient::new(server.uri(), ORG, "test-secret");
    ProviderTester::new(EdgeDeltaProvider::with_client(client))
}

fn monitor_body() -> Value {
    json!({
        "id": MONITOR_ID,
        "orgID": ORG,
        "name": "errors",
        "type": "pattern-check",
        "enabled": true,
        "payload": "{\"threshold\": 5}",
        "creator": "ops@example.com"
    })
}

fn config_state() -> Value {
    json!({
        "id": CONF_ID,
        "conf_id": CONF_ID,
        "org_id": ORG,
        "config_content": "version: v2",
        "tag": "v1",
        "deploy": true
    })
}

mod monitor {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/orgs/{}/alert_definitions", ORG)))
            .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/alert_definitions/{}", ORG, MONITOR_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body()))
            .expect(1)
            .mount(&server)
            .await;

        let tester = tester(&server);
        let config = json!({
            "name": "errors",
            "type": "pattern-check",
            "enabled": true,
            "payload": "{\"threshold\": 5}",
            "creator": "ops@example.com"
        });

        let plan = tester.plan_create("edgedelta_monitor", config.clone()).await.unwrap();
        assert_plan_creates(&plan);

        let state = tester.lifecycle_create("edgedelta_monitor", config).await.unwrap();
        assert_eq!(
            state,
            json!({
                "id": MONITOR_ID,
                "monitor_id": MONITOR_ID,
                "org_id": ORG,
                "name": "errors",
                "type": "pattern-check",
                "enabled": true,
                "payload": "{\"threshold\": 5}",
                "creator": "ops@example.com"
            })
        );
    }

    /// A set monitor_id adopts the existing monitor through PUT
    #[tokio::test]
    async fn test_create_with_id_adopts() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("/v1/orgs/{}/alert_definitions/{}", ORG, MONITOR_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let created = tester(&server)
            .create(
                "edgedelta_monitor",
                json!({
                    "monitor_id": MONITOR_ID,
                    "name": "errors",
                    "type": "pattern-check",
                    "enabled": true,
                    "payload": "{}",
                    "creator": "ops@example.com"
                }),
            )
            .await
            .unwrap();
        assert_eq!(created.state["id"], MONITOR_ID);
    }

    #[tokio::test]
    async fn test_read_gone_returns_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/alert_definitions/{}", ORG, MONITOR_ID)))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let read = tester(&server)
            .read("edgedelta_monitor", json!({"id": MONITOR_ID, "monitor_id": MONITOR_ID}))
            .await
            .unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_delete_gone_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("/v1/orgs/{}/alert_definitions/{}", ORG, MONITOR_ID)))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        tester(&server)
            .lifecycle_delete("edgedelta_monitor", json!({"id": MONITOR_ID}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_server_error_fails() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = tester(&server)
            .delete("edgedelta_monitor", json!({"id": MONITOR_ID}))
            .await
            .unwrap_err();
        assert_eq!(err.summary(), "Could not delete the monitor resource");
    }
}

mod config {
    use super::*;

    fn save_mock(content: &str) -> Mock {
        Mock::given(method("POST"))
            .and(path(format!("/v1/orgs/{}/pipelines/{}/save", ORG, CONF_ID)))
            .and(body_json(json!({"content": content})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": CONF_ID,
                "tag": "v2",
                "timestamp": 1700000000000i64
            })))
            .expect(1)
    }

    fn history_mock() -> Mock {
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/pipelines/{}/history", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"timestamp": 1700000000000i64, "tag": "v2"},
                {"timestamp": 1600000000000i64, "tag": "v1"}
            ])))
    }

    fn conf_body(content: &str) -> Value {
        json!({"id": CONF_ID, "orgID": ORG, "content": content, "tag": "v2"})
    }

    #[tokio::test]
    async fn test_update_saves_and_deploys() {
        let server = MockServer::start().await;

        save_mock("version: v3").mount(&server).await;
        history_mock().expect(1).mount(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/orgs/{}/pipelines/{}/deploy/1700000000000",
                ORG, CONF_ID
            )))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(conf_body("version: v3")))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tester = tester(&server);
        let mut proposed = config_state();
        proposed["config_content"] = json!("version: v3");
        proposed["tag"] = Value::Null;

        let plan = tester
            .plan_update("edgedelta_config", config_state(), proposed)
            .await
            .unwrap();
        assert_plan_changes_attribute(&plan, "config_content");
        assert_plan_does_not_change_attribute(&plan, "tag");

        let updated = tester
            .update("edgedelta_config", config_state(), plan.planned_state)
            .await
            .unwrap();
        assert_no_errors(&updated.warnings);
        assert_eq!(updated.state["config_content"], "version: v3");
        assert_eq!(updated.state["tag"], "v2");
        assert_eq!(updated.state["deploy"], true);
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let server = MockServer::start().await;

        let body = json!({
            "id": CONF_ID,
            "orgID": ORG,
            "content": "version: v3",
            "description": "edge pipeline",
            "tag": "v1",
            "environment": "Kubernetes",
            "fleet_type": "Edge",
            "fleet_subtype": "Gateway",
            "cluster_name": "prod-eu"
        });
        Mock::given(method("POST"))
            .and(path(format!("/v1/orgs/{}/confs", ORG)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let state = tester(&server)
            .lifecycle_create(
                "edgedelta_config",
                json!({
                    "config_content": "version: v3",
                    "description": "edge pipeline",
                    "environment": "Kubernetes",
                    "fleet_type": "Edge",
                    "fleet_subtype": "Gateway",
                    "cluster_name": "prod-eu"
                }),
            )
            .await
            .unwrap();
        assert_eq!(
            state,
            json!({
                "id": CONF_ID,
                "conf_id": CONF_ID,
                "org_id": ORG,
                "config_content": "version: v3",
                "description": "edge pipeline",
                "tag": "v1",
                "environment": "Kubernetes",
                "fleet_type": "Edge",
                "fleet_subtype": "Gateway",
                "cluster_name": "prod-eu",
                "deploy": true
            })
        );
    }

    /// Attributes cleared on the server are cleared in state, so the next plan sees the drift
    #[tokio::test]
    async fn test_read_clears_fields_removed_on_server() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": CONF_ID,
                "orgID": ORG,
                "content": "version: v2",
                "description": "",
                "tag": "v1"
            })))
            .mount(&server)
            .await;

        let mut current = config_state();
        current["description"] = json!("old description");
        current["environment"] = json!("Linux");
        current["cluster_name"] = json!("c1");
        current["deploy"] = json!(false);

        let tester = tester(&server);
        let read = tester
            .read("edgedelta_config", current.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read.state["description"], Value::Null);
        assert_eq!(read.state["environment"], Value::Null);
        assert_eq!(read.state["cluster_name"], Value::Null);
        assert_eq!(read.state["config_content"], "version: v2");
        assert_eq!(read.state["deploy"], false);

        let plan = tester
            .plan_update("edgedelta_config", read.state, current)
            .await
            .unwrap();
        assert_plan_changes_attribute(&plan, "description");
        assert_plan_changes_attribute(&plan, "environment");
        assert_plan_changes_attribute(&plan, "cluster_name");
    }

    /// A tag-only change goes through PUT and settles on the next plan
    #[tokio::test]
    async fn test_tag_change_is_put() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .and(body_partial_json(json!({"content": "version: v2", "tag": "release-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": CONF_ID,
                "orgID": ORG,
                "content": "version: v2",
                "tag": "release-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        save_mock("version: v2").mount(&server).await;
        history_mock().expect(1).mount(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/orgs/{}/pipelines/{}/deploy/1700000000000",
                ORG, CONF_ID
            )))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": CONF_ID,
                "orgID": ORG,
                "content": "version: v2",
                "tag": "release-2"
            })))
            .mount(&server)
            .await;

        let tester = tester(&server);
        let mut proposed = config_state();
        proposed["tag"] = json!("release-2");

        let plan = tester
            .plan_update("edgedelta_config", config_state(), proposed.clone())
            .await
            .unwrap();
        assert_plan_changes_attribute(&plan, "tag");
        assert_plan_does_not_change_attribute(&plan, "config_content");

        let updated = tester
            .update("edgedelta_config", config_state(), plan.planned_state)
            .await
            .unwrap();
        assert_eq!(updated.state["tag"], "release-2");

        let replan = tester
            .plan_update("edgedelta_config", updated.state, proposed)
            .await
            .unwrap();
        assert_plan_no_changes(&replan);
    }

    /// A failed deploy after a successful save is reported, not retried
    #[tokio::test]
    async fn test_deploy_failure_after_save() {
        let server = MockServer::start().await;

        save_mock("version: v3").mount(&server).await;
        history_mock().expect(1).mount(&server).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/orgs/{}/pipelines/{}/deploy/1700000000000",
                ORG, CONF_ID
            )))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(conf_body("version: v3")))
            .expect(0)
            .mount(&server)
            .await;

        let mut planned = config_state();
        planned["config_content"] = json!("version: v3");

        let err = tester(&server)
            .update("edgedelta_config", config_state(), planned)
            .await
            .unwrap_err();
        match &err {
            ProviderError::NotDeployed { config_id, reason } => {
                assert_eq!(config_id, CONF_ID);
                assert!(reason.contains("502"));
            },
            other => panic!("expected NotDeployed, got {:?}", other),
        }
        assert_eq!(err.summary(), "Config saved but not deployed");
    }

    #[tokio::test]
    async fn test_empty_history_is_not_deployed() {
        let server = MockServer::start().await;

        save_mock("version: v3").mount(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/pipelines/{}/history", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut planned = config_state();
        planned["config_content"] = json!("version: v3");

        let err = tester(&server)
            .update("edgedelta_config", config_state(), planned)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotDeployed { .. }));
    }

    #[tokio::test]
    async fn test_deploy_disabled_only_saves() {
        let server = MockServer::start().await;

        save_mock("version: v3").mount(&server).await;
        history_mock().expect(0).mount(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(conf_body("version: v3")))
            .expect(1)
            .mount(&server)
            .await;

        let mut planned = config_state();
        planned["config_content"] = json!("version: v3");
        planned["deploy"] = json!(false);

        let updated = tester(&server)
            .update("edgedelta_config", config_state(), planned)
            .await
            .unwrap();
        assert_eq!(updated.state["deploy"], false);
    }

    /// Changing environment metadata goes through PUT before the save
    #[tokio::test]
    async fn test_metadata_change_puts_first() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(conf_body("version: v2")))
            .expect(1)
            .mount(&server)
            .await;
        save_mock("version: v2").mount(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": CONF_ID,
                "orgID": ORG,
                "content": "version: v2",
                "environment": "Linux"
            })))
            .mount(&server)
            .await;

        let mut planned = config_state();
        planned["environment"] = json!("Linux");
        planned["deploy"] = json!(false);

        let updated = tester(&server)
            .update("edgedelta_config", config_state(), planned)
            .await
            .unwrap();
        assert_eq!(updated.state["environment"], "Linux");
    }

    #[tokio::test]
    async fn test_kubernetes_without_subtype_rejected() {
        let server = MockServer::start().await;
        let err = tester(&server)
            .validate_resource_config(
                "edgedelta_config",
                json!({"config_content": "version: v3", "environment": "Kubernetes"}),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("fleet_subtype"));
    }

    #[tokio::test]
    async fn test_plan_defaults_deploy() {
        let server = MockServer::start().await;
        let tester = tester(&server);

        let plan = tester
            .plan_create("edgedelta_config", json!({"config_content": "version: v3"}))
            .await
            .unwrap();
        assert_eq!(plan.planned_state["deploy"], true);

        let plan = tester
            .plan_update("edgedelta_config", config_state(), config_state())
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
    }

    #[tokio::test]
    async fn test_upgrade_legacy_state() {
        let server = MockServer::start().await;
        let mut legacy = config_state();
        legacy["api_key_envvar"] = json!("ED_API_KEY");
        legacy["debug"] = json!(true);

        let upgraded = tester(&server)
            .upgrade_resource_state("edgedelta_config", 0, legacy)
            .await
            .unwrap();
        assert!(upgraded.get("api_key_envvar").is_none());
        assert!(upgraded.get("debug").is_none());
        assert!(upgraded.get("org_id").is_none());
        assert_eq!(upgraded["conf_id"], CONF_ID);
    }
}

mod dashboard {
    use super::*;

    fn dashboard_body() -> Value {
        json!({
            "dashboard_id": DASHBOARD_ID,
            "dashboard_name": "Overview",
            "description": "Service health",
            "tags": ["prod", "api"],
            "definition": {"widgets": []},
            "creator": "u1",
            "updater": "u1",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-01T00:00:00Z"
        })
    }

    fn dashboard_state() -> Value {
        json!({
            "id": DASHBOARD_ID,
            "dashboard_id": DASHBOARD_ID,
            "dashboard_name": "Overview",
            "description": "Service health",
            "tags": ["prod", "api"],
            "definition": "{\"widgets\":[]}",
            "creator": "u1",
            "updater": "u1",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/orgs/{}/dashboards", ORG)))
            .and(body_json(json!({
                "dashboard_name": "Overview",
                "description": "Service health",
                "tags": ["prod", "api"],
                "definition": {"widgets": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
            .expect(1)
            .mount(&server)
            .await;

        let state = tester(&server)
            .lifecycle_create(
                "edgedelta_dashboard",
                json!({
                    "dashboard_name": "Overview",
                    "description": "Service health",
                    "tags": ["prod", "api"],
                    "definition": "{\"widgets\": []}"
                }),
            )
            .await
            .unwrap();
        assert_eq!(state, dashboard_state());
    }

    #[tokio::test]
    async fn test_read_clears_fields_removed_on_server() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dashboard_id": DASHBOARD_ID,
                "dashboard_name": "Overview",
                "description": "",
                "tags": [],
                "creator": "u1"
            })))
            .mount(&server)
            .await;

        let read = tester(&server)
            .read("edgedelta_dashboard", dashboard_state())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read.state["tags"], Value::Null);
        assert_eq!(read.state["definition"], Value::Null);
        assert_eq!(read.state["description"], Value::Null);
        assert_eq!(read.state["dashboard_name"], "Overview");
        assert!(read.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_update_puts_dashboard() {
        let server = MockServer::start().await;

        let mut renamed = dashboard_body();
        renamed["dashboard_name"] = json!("Overview v2");
        renamed["tags"] = json!(["prod"]);
        renamed["updater"] = json!("u2");
        Mock::given(method("PUT"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .and(body_json(json!({
                "dashboard_name": "Overview v2",
                "description": "Service health",
                "tags": ["prod"],
                "definition": {"widgets": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(renamed.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(renamed))
            .mount(&server)
            .await;

        let mut proposed = dashboard_state();
        proposed["dashboard_name"] = json!("Overview v2");
        proposed["tags"] = json!(["prod"]);

        let state = tester(&server)
            .lifecycle_update("edgedelta_dashboard", dashboard_state(), proposed)
            .await
            .unwrap();
        assert_eq!(state["dashboard_name"], "Overview v2");
        assert_eq!(state["tags"], json!(["prod"]));
        assert_eq!(state["updater"], "u2");
        assert_eq!(state["definition"], "{\"widgets\":[]}");
    }

    /// Delete succeeds, and deleting again once the dashboard is gone still succeeds
    #[tokio::test]
    async fn test_delete_then_gone() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/orgs/{}/dashboards/{}", ORG, DASHBOARD_ID)))
            .respond_with(ResponseTemplate::new(404).set_body_string("dashboard not found"))
            .expect(1)
            .mount(&server)
            .await;

        let tester = tester(&server);
        tester
            .lifecycle_delete("edgedelta_dashboard", dashboard_state())
            .await
            .unwrap();
        tester
            .lifecycle_delete("edgedelta_dashboard", dashboard_state())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_definition_reformatting_is_no_change() {
        let server = MockServer::start().await;
        let prior = json!({
            "id": DASHBOARD_ID,
            "dashboard_id": DASHBOARD_ID,
            "dashboard_name": "Overview",
            "definition": "{\"widgets\":[]}"
        });
        let mut proposed = prior.clone();
        proposed["definition"] = json!("{\n  \"widgets\": []\n}");

        let plan = tester(&server)
            .plan_update("edgedelta_dashboard", prior, proposed)
            .await
            .unwrap();
        assert_plan_no_changes(&plan);
        assert_eq!(plan.planned_state["definition"], "{\"widgets\":[]}");
    }

    #[tokio::test]
    async fn test_unexpected_definition_warns() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/orgs/{}/dashboards", ORG)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dashboard_id": DASHBOARD_ID,
                "dashboard_name": "Overview",
                "definition": "legacy-layout"
            })))
            .mount(&server)
            .await;

        let created = tester(&server)
            .create(
                "edgedelta_dashboard",
                json!({"dashboard_name": "Overview", "definition": "{\"widgets\": []}"}),
            )
            .await
            .unwrap();
        assert_eq!(created.state["dashboard_id"], DASHBOARD_ID);
        assert_warning_contains(&created.warnings, "Failed to set dashboard state");
    }
}

mod import {
    use super::*;

    #[tokio::test]
    async fn test_import_all_lists_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs", ORG)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": CONF_ID, "orgID": ORG, "content": "version: v3"},
                {"id": OTHER_CONF_ID, "orgID": ORG, "content": "version: v2"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let imported = tester(&server)
            .import_resource("edgedelta_config", "*")
            .await
            .unwrap();
        assert_eq!(imported.len(), 2);
        assert!(imported.iter().all(|r| r.resource_type == "edgedelta_config"));
        assert_eq!(imported[0].state["conf_id"], CONF_ID);
        assert_eq!(imported[1].state["config_content"], "version: v2");
    }

    #[tokio::test]
    async fn test_import_id_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/alert_definitions/{}", ORG, MONITOR_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body()))
            .expect(2)
            .mount(&server)
            .await;

        let imported = tester(&server)
            .import_resource(
                "edgedelta_monitor",
                &format!(" {} ,, {} ", MONITOR_ID, MONITOR_ID),
            )
            .await
            .unwrap();
        assert_eq!(imported.len(), 2);
    }

    #[tokio::test]
    async fn test_import_first_failure_aborts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, CONF_ID)))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/confs/{}", ORG, OTHER_CONF_ID)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = tester(&server)
            .import_resource("edgedelta_config", &format!("{},{}", CONF_ID, OTHER_CONF_ID))
            .await
            .unwrap_err();
        assert!(err.summary().contains(CONF_ID));
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_ids() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/orgs/{}/dashboards", ORG)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"dashboard_id": "legacy-7", "dashboard_name": "Old"}
            ])))
            .mount(&server)
            .await;

        let tester = tester(&server);
        let err = tester
            .import_resource("edgedelta_dashboard", "*")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));

        let err = tester.import_resource("edgedelta_dashboard", "").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }
}
