//! Integration tests for the event-to-decision pipeline

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ricecoder_validate_hook::runner::{HttpChannel, HttpOutcome, ProcessChannel};
use ricecoder_validate_hook::*;

/// Records requests and answers with a fixed outcome
struct FakeHttp {
    outcome: HttpOutcome,
    calls: Arc<Mutex<Vec<(u16, ValidationRequest)>>>,
}

#[async_trait]
impl HttpChannel for FakeHttp {
    async fn fetch(&self, port: u16, request: &ValidationRequest) -> HttpOutcome {
        self.calls.lock().unwrap().push((port, request.clone()));
        self.outcome.clone()
    }
}

struct FakeProcess {
    output: String,
    calls: Arc<Mutex<Vec<(PathBuf, ValidationRequest)>>>,
}

#[async_trait]
impl ProcessChannel for FakeProcess {
    async fn run(&self, executable: &Path, request: &ValidationRequest) -> ValidationResult {
        self.calls
            .lock()
            .unwrap()
            .push((executable.to_path_buf(), request.clone()));
        ValidationResult {
            output: self.output.clone(),
            exit_code: 1,
            channel: Channel::Process,
        }
    }
}

struct Harness {
    handler: HookHandler,
    http_calls: Arc<Mutex<Vec<(u16, ValidationRequest)>>>,
    process_calls: Arc<Mutex<Vec<(PathBuf, ValidationRequest)>>>,
}

fn harness(outcome: HttpOutcome, process_output: &str) -> Harness {
    let http_calls = Arc::new(Mutex::new(Vec::new()));
    let process_calls = Arc::new(Mutex::new(Vec::new()));

    let runner = ValidatorRunner::new(
        Box::new(FakeHttp {
            outcome,
            calls: http_calls.clone(),
        }),
        Box::new(FakeProcess {
            output: process_output.to_string(),
            calls: process_calls.clone(),
        }),
    );

    let config = ConfigLoader::parse_yaml(
        r#"
validators:
  php:
    check_executable: /opt/php/check.sh
    http_port: 19850
    extensions: [".php"]
    exclude_paths: ["hooks"]
  dart:
    check_executable: /opt/dart/check.sh
    extensions: [".dart"]
"#,
    )
    .unwrap();

    let handler = HookHandler::new(
        ValidatorRegistry::new(config.validators),
        runner,
        PathBuf::from("/srv/app/hooks"),
    );

    Harness {
        handler,
        http_calls,
        process_calls,
    }
}

fn completed(output: &str) -> HttpOutcome {
    HttpOutcome::Completed(ValidationResult {
        output: output.to_string(),
        exit_code: if output.is_empty() { 0 } else { 1 },
        channel: Channel::Http,
    })
}

#[tokio::test]
async fn test_clean_http_result_allows() {
    let h = harness(completed(""), "");

    let decision = h.handler.handle(&HookEvent::edit("Edit", "src/a.php")).await;

    assert_eq!(decision, Decision::Allow);
    assert_eq!(h.http_calls.lock().unwrap().len(), 1);
    assert!(h.process_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_diagnostics_block() {
    let h = harness(completed("a.php:3 Error [ Undefined variable $x"), "");

    let decision = h.handler.handle(&HookEvent::edit("Write", "src/a.php")).await;

    assert_eq!(
        decision,
        Decision::Block {
            reason: "LSP errors detected - please fix:\na.php:3 Error [ Undefined variable $x"
                .to_string()
        }
    );
}

#[tokio::test]
async fn test_fallback_output_is_extracted_from_header() {
    let h = harness(
        HttpOutcome::FallbackNeeded("connection refused".to_string()),
        "Starting intelephense...\n=== Diagnostics ===\na.php:3 Error [P1001] Undefined",
    );

    let decision = h.handler.handle(&HookEvent::edit("Edit", "src/a.php")).await;

    assert_eq!(
        decision,
        Decision::block_with_diagnostics("=== Diagnostics ===\na.php:3 Error [P1001] Undefined")
    );
    let process_calls = h.process_calls.lock().unwrap();
    assert_eq!(process_calls.len(), 1);
    assert_eq!(process_calls[0].0, PathBuf::from("/opt/php/check.sh"));
}

#[tokio::test]
async fn test_validator_without_port_uses_process_only() {
    let h = harness(completed(""), "All good");

    let decision = h.handler.handle(&HookEvent::edit("Edit", "lib/main.dart")).await;

    assert_eq!(decision, Decision::Allow);
    assert!(h.http_calls.lock().unwrap().is_empty());
    assert_eq!(
        h.process_calls.lock().unwrap()[0].0,
        PathBuf::from("/opt/dart/check.sh")
    );
}

#[tokio::test]
async fn test_project_dir_defaults_to_hook_parent() {
    let h = harness(completed(""), "");

    h.handler.handle(&HookEvent::edit("Edit", "src/a.php")).await;

    let calls = h.http_calls.lock().unwrap();
    assert_eq!(calls[0].0, 19850);
    assert_eq!(calls[0].1, ValidationRequest::new("src/a.php", "/srv/app"));
}

#[tokio::test]
async fn test_project_dir_override() {
    let h = harness(completed(""), "");
    let handler = h
        .handler
        .with_project_dir_override(Some("/work/checkout".to_string()));

    handler.handle(&HookEvent::edit("Edit", "src/a.php")).await;

    assert_eq!(
        h.http_calls.lock().unwrap()[0].1.project_dir,
        PathBuf::from("/work/checkout")
    );
}

#[tokio::test]
async fn test_ignored_events_never_reach_channels() {
    let h = harness(completed("Error [ x"), "Error [ x");

    let read = HookEvent::edit("Read", "src/a.php");
    let pre_tool_use = HookEvent {
        hook_event_name: Some("PreToolUse".to_string()),
        ..HookEvent::edit("Edit", "src/a.php")
    };
    let excluded = HookEvent::edit("Edit", "/srv/app/hooks/validate.php");
    let unmatched = HookEvent::edit("Edit", "README.md");
    let no_path = HookEvent::from_json(r#"{"tool_name": "Edit", "tool_input": {}}"#).unwrap();

    for event in [read, pre_tool_use, excluded, unmatched, no_path] {
        assert_eq!(h.handler.handle(&event).await, Decision::Allow);
    }

    assert!(h.http_calls.lock().unwrap().is_empty());
    assert!(h.process_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_event_without_name_is_treated_as_post_tool_use() {
    let h = harness(completed("Warning [ unused"), "");
    let event = HookEvent::from_json(
        r#"{"tool_name": "Edit", "tool_input": {"file_path": "src/a.php"}}"#,
    )
    .unwrap();

    assert!(h.handler.handle(&event).await.is_block());
}

/// Parser that reports errors for any non-empty output
struct AnyOutputParser;

impl DiagnosticParser for AnyOutputParser {
    fn has_errors(&self, output: &str) -> bool {
        !output.is_empty()
    }

    fn extract_diagnostics(&self, output: &str) -> String {
        output.to_uppercase()
    }
}

#[tokio::test]
async fn test_custom_parser() {
    let h = harness(completed("deprecated call"), "");
    let handler = h.handler.with_parser(Box::new(AnyOutputParser));

    let decision = handler.handle(&HookEvent::edit("Edit", "src/a.php")).await;

    assert_eq!(decision, Decision::block_with_diagnostics("DEPRECATED CALL"));
}
