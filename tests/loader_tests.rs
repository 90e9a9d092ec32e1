mod common;

use common::*;
use std::fs;
use std::time::Duration;
use workflow_automation::prelude::*;
use workflow_automation::{ActionType, ComparisonOperator};

#[test]
fn test_load_empty_directory() {
    let dir = create_test_dir();
    let workflows = WorkflowLoader::load_directory(dir.path()).unwrap();
    assert!(workflows.is_empty());
}

#[test]
fn test_load_nonexistent_directory() {
    let result = WorkflowLoader::load_directory(std::path::Path::new("/nonexistent/workflows"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_load_multiple_workflows_sorted_by_file() {
    let dir = create_test_dir();
    write_workflow(dir.path(), "b.yaml", &notification_workflow("second", "ClinicCreated", &["x"]));
    write_workflow(dir.path(), "a.yaml", &notification_workflow("first", "ClinicCreated", &["x"]));
    fs::write(
        dir.path().join("c.yml"),
        notification_workflow("third", "ClinicCancelled", &["x"]),
    )
    .unwrap();

    let workflows = WorkflowLoader::load_directory(dir.path()).unwrap();

    let ids: Vec<_> = workflows.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[test]
fn test_engine_config_is_not_a_workflow() {
    let dir = create_test_dir();
    write_workflow(dir.path(), "welcome.yaml", WELCOME_CLINIC);
    write_engine_config(dir.path(), "webhook:\n  timeout_ms: 500\n");

    let workflows = WorkflowLoader::load_directory(dir.path()).unwrap();
    assert_eq!(workflows.len(), 1);

    let config = EngineConfig::load(dir.path().join("engine.yaml")).unwrap();
    assert_eq!(config.webhook.timeout(), Duration::from_millis(500));
}

#[test]
fn test_load_full_definition() {
    let dir = create_test_dir();
    write_workflow(
        dir.path(),
        "trial.yaml",
        r#"
id: trial-follow-up
name: Trial follow-up
trigger: TrialStarted
actions:
  - id: ticket
    type: create_ticket
    config:
      subject: "Trial started for {{clinicName}}"
      priority: high
  - id: reminder
    type: send_email
    condition:
      field: seats
      operator: ">="
      value: 5
    delay: 3d
    config:
      to: "{{ownerEmail}}"
      subject: How is your trial going?
      body: Reply to this email if you need help.
"#,
    );

    let workflows = WorkflowLoader::load_directory(dir.path()).unwrap();
    let workflow = &workflows[0];

    assert_eq!(workflow.display_name(), "Trial follow-up");
    assert_eq!(workflow.trigger, "TrialStarted");
    assert!(workflow.enabled);
    assert_eq!(workflow.actions[0].action_type, ActionType::CreateTicket);

    let reminder = workflow.action("reminder").unwrap();
    assert_eq!(reminder.effective_delay(), Some(Duration::from_secs(3 * 86400)));
    let condition = reminder.condition.as_ref().unwrap();
    assert_eq!(condition.field, "seats");
    assert_eq!(condition.operator, ComparisonOperator::GreaterThanOrEqual);
}

#[test]
fn test_duplicate_action_ids_rejected() {
    let dir = create_test_dir();
    write_workflow(
        dir.path(),
        "dup.yaml",
        r#"
id: dup
trigger: ClinicCreated
actions:
  - { id: same, type: webhook, config: { url: "https://a.example.com" } }
  - { id: same, type: webhook, config: { url: "https://b.example.com" } }
"#,
    );

    let err = WorkflowLoader::load_directory(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { .. }));
    assert!(err.to_string().contains("duplicate action id 'same'"));
}

#[test]
fn test_invalid_delay_reported_as_yaml_error() {
    let dir = create_test_dir();
    write_workflow(
        dir.path(),
        "bad-delay.yaml",
        r#"
id: bad-delay
trigger: ClinicCreated
actions:
  - { id: later, type: webhook, delay: soon, config: { url: "https://a.example.com" } }
"#,
    );

    let err = WorkflowLoader::load_directory(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }));
    assert!(err.to_string().contains("bad-delay.yaml"));
}

#[test]
fn test_unknown_action_type_still_loads() {
    let workflow = parse_workflow(
        r#"
id: legacy
trigger: ClinicCreated
actions:
  - { id: sms, type: send_sms }
"#,
    );
    assert_eq!(
        workflow.actions[0].action_type,
        ActionType::Unsupported("send_sms".to_string())
    );
}

#[test]
fn test_oversized_delay_is_load_error() {
    let result = WorkflowLoader::parse(
        r#"
id: far-future
trigger: ClinicCreated
actions:
  - { id: later, type: webhook, delay: 99999999999999999999d, config: { url: "https://a.example.com" } }
"#,
        "far-future.yaml",
    );

    let err = result.unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }));
    assert!(err.to_string().contains("too large"));
}
