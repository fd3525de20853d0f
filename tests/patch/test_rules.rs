use flowpatch::core::{PatchConfig, RuleSet, WorkflowDocument};
use serde_json::{json, Value};
use std::path::Path;

fn document(value: Value) -> WorkflowDocument {
    WorkflowDocument::from_json(Path::new("W1_TEST.json"), &value.to_string())
        .expect("valid document")
}

fn rules() -> RuleSet {
    RuleSet::from_config(&PatchConfig::default()).expect("default rules")
}

fn node(doc: &WorkflowDocument, index: usize) -> &Value {
    &doc.root()["nodes"][index]
}

#[test]
fn credential_injector_adds_single_postgres_entry() {
    let mut doc = document(json!({
        "nodes": [{"name": "Load Menu", "type": "n8n-nodes-base.postgres", "parameters": {"query": "SELECT 1"}}]
    }));

    let patch = rules().apply(&mut doc);

    assert!(patch.changed());
    assert_eq!(
        node(&doc, 0)["credentials"],
        json!({"postgres": {"id": "postgres-resto-bot", "name": "PostgreSQL Resto Bot"}})
    );
    assert_eq!(node(&doc, 0)["credentials"].as_object().map(|c| c.len()), Some(1));
}

#[test]
fn credential_injector_keeps_existing_credentials_byte_identical() {
    let input = json!({
        "nodes": [{
            "name": "Load Menu",
            "type": "n8n-nodes-base.postgres",
            "credentials": {"postgres": {"id": "prod-db", "name": "Production"}}
        }]
    });
    let mut doc = document(input);
    let before = doc.to_json_string().unwrap();

    let patch = rules().apply(&mut doc);

    assert!(!patch.changed());
    assert_eq!(doc.to_json_string().unwrap(), before);
}

#[test]
fn expression_normalizer_examples() {
    let cases = [
        ("={{$env.FOO}}", "={$env.FOO}", true),
        ("{$env.FOO}", "={$env.FOO}", true),
        ("=plain string", "=plain string", false),
        ("={{$env.PREFIX}}_{{$json.id}}", "={$env.PREFIX}_{$json.id}", true),
        ("={{ $env.A }}-{{ $env.B }}", "={ $env.A }-{ $env.B }", true),
    ];

    for (input, expected, changes) in cases {
        let mut doc = document(json!({
            "nodes": [{
                "name": "Call Sub-Workflow",
                "type": "n8n-nodes-base.executeWorkflow",
                "parameters": {"source": "database", "workflowId": input}
            }]
        }));

        let patch = rules().apply(&mut doc);

        assert_eq!(patch.changed(), changes, "{input}");
        assert_eq!(node(&doc, 0)["parameters"]["workflowId"], expected, "{input}");
        assert_eq!(node(&doc, 0)["parameters"]["source"], "database");

        let second = rules().apply(&mut doc);
        assert!(!second.changed(), "{input}");
        assert_eq!(node(&doc, 0)["parameters"]["workflowId"], expected, "{input}");
    }
}

#[test]
fn expression_normalizer_ignores_non_string_references() {
    let mut doc = document(json!({
        "nodes": [{
            "name": "Call Sub-Workflow",
            "type": "n8n-nodes-base.executeWorkflow",
            "parameters": {"workflowId": {"__rl": true, "value": "={{$env.FOO}}", "mode": "id"}}
        }]
    }));

    assert!(!rules().apply(&mut doc).changed());
}

#[test]
fn use_before_declaration_check_is_removed() {
    let script = "const headers = $json.headers || {};\nlet authOk = !!headers.signature;\nif (denyReason !== '') {\n  // legacy guard\n  authOk = false;\n}\nlet denyReason = authOk ? '' : 'invalid signature';\nreturn [{ json: { authOk, denyReason } }];";
    let mut doc = document(json!({
        "nodes": [{"name": "Validate Signature", "type": "n8n-nodes-base.code", "parameters": {"jsCode": script}}]
    }));

    let patch = rules().apply(&mut doc);

    assert!(patch.changed());
    assert_eq!(patch.changes[0].notice, "Fixed denyReason check in");
    let fixed = node(&doc, 0)["parameters"]["jsCode"].as_str().unwrap();
    assert!(!fixed.contains("if (denyReason !== '')"));
    assert!(fixed.contains("// denyReason check moved after declaration\nlet denyReason = authOk"));
    assert!(fixed.ends_with("return [{ json: { authOk, denyReason } }];"));
}

#[test]
fn use_after_declaration_is_left_unchanged() {
    let script = "let denyReason = $json.reason || '';\nlet authOk = true;\nif (denyReason !== '') {\n  authOk = false;\n}\nreturn [{ json: { authOk } }];";
    let mut doc = document(json!({
        "nodes": [{"name": "Validate Signature", "type": "n8n-nodes-base.code", "parameters": {"jsCode": script}}]
    }));

    let patch = rules().apply(&mut doc);

    assert!(!patch.changed());
    assert_eq!(node(&doc, 0)["parameters"]["jsCode"], script);
}

#[test]
fn malformed_parameters_are_contained_to_their_node() {
    let mut doc = document(json!({
        "nodes": [
            {"name": "Bad Code", "type": "n8n-nodes-base.code", "parameters": "jsCode"},
            {"name": "Load Menu", "type": "n8n-nodes-base.postgres"}
        ]
    }));

    let patch = rules().apply(&mut doc);

    assert_eq!(patch.errors.len(), 1);
    assert_eq!(
        patch.errors[0].to_string(),
        "Rule FP-DECL-001 failed on node 'Bad Code': 'parameters' must be an object, found a string"
    );
    assert_eq!(patch.changes.len(), 1);
    assert_eq!(patch.changes[0].node, "Load Menu");
}

#[test]
fn custom_configuration_is_injected_into_rules() {
    let config: PatchConfig = toml::from_str(
        r#"
[node_types]
database = "acme.mysql"

[credentials]
key = "mySql"
id = "mysql-main"
name = "MySQL Main"

[declaration]
variable = "blockReason"
marker = "// removed premature blockReason check"
"#,
    )
    .unwrap();
    let rules = RuleSet::from_config(&config).unwrap();
    let mut doc = document(json!({
        "nodes": [
            {"name": "Db", "type": "acme.mysql"},
            {"name": "Legacy Db", "type": "n8n-nodes-base.postgres"},
            {"name": "Code", "type": "n8n-nodes-base.code",
             "parameters": {"jsCode": "if (blockReason !== '') { ok = false; }\nlet blockReason = '';"}}
        ]
    }));

    let patch = rules.apply(&mut doc);

    assert_eq!(patch.changes.len(), 2);
    assert_eq!(node(&doc, 0)["credentials"]["mySql"]["id"], "mysql-main");
    assert!(node(&doc, 1).get("credentials").is_none());
    assert_eq!(
        node(&doc, 2)["parameters"]["jsCode"],
        "// removed premature blockReason check\nlet blockReason = '';"
    );
}
