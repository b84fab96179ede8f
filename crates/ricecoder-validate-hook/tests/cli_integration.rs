//! Integration tests for the command-line surface

use std::fs;
use std::path::Path;

use clap::Parser;
use ricecoder_validate_hook::cli::{execute, Cli, Commands, Invocation};
use ricecoder_validate_hook::config::EXAMPLE_CONFIG;

fn invocation(hook_dir: &Path) -> Invocation {
    Invocation {
        hook_dir: hook_dir.to_path_buf(),
        config_path: hook_dir.join("config.yaml"),
        project_dir_env: None,
        install_logging: false,
    }
}

fn edit_event(path: &str) -> String {
    serde_json::json!({
        "hook_event_name": "PostToolUse",
        "tool_name": "Edit",
        "tool_input": { "file_path": path }
    })
    .to_string()
}

#[tokio::test]
async fn test_init_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let invocation = invocation(dir.path());

    let message = execute(
        &Commands::Init { force: false },
        &invocation,
        std::io::empty(),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(message.contains("config.yaml"));
    assert_eq!(
        fs::read_to_string(&invocation.config_path).unwrap(),
        EXAMPLE_CONFIG
    );

    // The example matches nothing for a markdown file
    let output = execute(
        &Commands::Run,
        &invocation,
        edit_event("README.md").as_bytes(),
    )
    .await
    .unwrap();
    assert_eq!(output, None);
}

#[tokio::test]
async fn test_invalid_config_blocks_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.yaml"), "validators: [1, 2]").unwrap();

    let output = execute(
        &Commands::Run,
        &invocation(dir.path()),
        edit_event("src/a.php").as_bytes(),
    )
    .await
    .unwrap()
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["decision"], "block");
    assert!(value["reason"]
        .as_str()
        .unwrap()
        .contains("Missing 'validators' mapping"));
}

#[tokio::test]
async fn test_excluded_path_allows_without_running_validator() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.yaml"), EXAMPLE_CONFIG).unwrap();

    let output = execute(
        &Commands::Run,
        &invocation(dir.path()),
        edit_event("/srv/app/hooks/validate.php").as_bytes(),
    )
    .await
    .unwrap();

    assert_eq!(output, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_check_command_blocks_on_script_errors() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("check.sh");
    fs::write(
        &script,
        "#!/bin/sh\necho '=== Diagnostics ==='\necho \"$1:2 Error [E1] syntax error\"\nexit 1\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.path().join("config.yaml"),
        format!(
            "validators:\n  php:\n    check_executable: {}\n    extensions: [\".php\"]\n",
            script.display()
        ),
    )
    .unwrap();

    let command = Commands::Check {
        file: "src/a.php".to_string(),
        project_dir: Some("/work".to_string()),
    };
    let output = execute(&command, &invocation(dir.path()), std::io::empty())
        .await
        .unwrap()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value["reason"],
        "LSP errors detected - please fix:\n=== Diagnostics ===\nsrc/a.php:2 Error [E1] syntax error"
    );
}

#[test]
fn test_bare_invocation_is_hook_mode() {
    let cli = Cli::try_parse_from(["validate-code", "--hook-dir", "/opt/hooks"]).unwrap();
    assert_eq!(cli.command.unwrap_or(Commands::Run), Commands::Run);
}
