use super::*;

fn request(argv: &[&str], timeout: Duration) -> CommandRequest {
    CommandRequest::new(argv.iter().map(|s| s.to_string()).collect(), timeout).unwrap()
}

#[test]
fn empty_argv_is_rejected() {
    assert!(CommandRequest::new(Vec::new(), Duration::from_secs(1)).is_err());
}

#[test]
fn command_line_joins_arguments() {
    let req = request(&["npm", "install", "-g", "typescript"], Duration::from_secs(1));
    assert_eq!(req.command_line(), "npm install -g typescript");
}

#[test]
fn combined_output_and_summary() {
    let output = CommandOutput {
        stdout: "Downloading...\n".to_string(),
        stderr: "Error: jq is already installed\n\n".to_string(),
        exit_code: Some(1),
    };
    assert!(output.combined().contains("Downloading"));
    assert!(output.combined().contains("already installed"));
    assert_eq!(output.summary(), "Error: jq is already installed");
    assert_eq!(CommandOutput::failure(3, "").summary(), "exit code 3");
}

#[test]
fn scripted_executor_records_calls() {
    let exec = ScriptedExecutor::new()
        .with_binary("brew")
        .on_success("brew list -1", "jq\nfd\n");
    let ctx = ExecContext::new();

    let out = exec
        .execute(&ctx, &request(&["brew", "list", "-1"], Duration::from_secs(5)))
        .unwrap();
    assert_eq!(out.stdout, "jq\nfd\n");

    let out = exec
        .execute(&ctx, &request(&["brew", "install", "jq"], Duration::from_secs(5)))
        .unwrap();
    assert!(out.is_success());

    assert_eq!(exec.calls(), vec!["brew list -1", "brew install jq"]);
    assert_eq!(exec.calls_starting_with("brew install").len(), 1);
    assert!(exec.look_path("brew").is_some());
    assert!(exec.look_path("npm").is_none());
}

#[test]
fn scripted_executor_honours_cancellation() {
    let exec = ScriptedExecutor::new();
    let ctx = ExecContext::new();
    ctx.cancel();
    let err = exec
        .execute(&ctx, &request(&["true"], Duration::from_secs(1)))
        .unwrap_err();
    assert!(matches!(err, HomedeclError::Interrupted));
    assert!(exec.calls().is_empty());
}

#[cfg(unix)]
#[test]
fn system_executor_captures_output_and_exit_code() {
    let ctx = ExecContext::new();
    let out = SystemExecutor
        .execute(
            &ctx,
            &request(&["sh", "-c", "echo out; echo err >&2; exit 3"], Duration::from_secs(10)),
        )
        .unwrap();

    assert_eq!(out.stdout.trim(), "out");
    assert_eq!(out.stderr.trim(), "err");
    assert_eq!(out.exit_code, Some(3));
}

#[cfg(unix)]
#[test]
fn system_executor_times_out() {
    let ctx = ExecContext::new();
    let err = SystemExecutor
        .execute(&ctx, &request(&["sleep", "5"], Duration::from_millis(200)))
        .unwrap_err();

    match err {
        HomedeclError::SystemCommandFailed { reason, .. } => assert!(reason.contains("timed out")),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[test]
fn system_executor_reports_missing_program() {
    let ctx = ExecContext::new();
    let err = SystemExecutor
        .execute(
            &ctx,
            &request(&["homedecl-definitely-not-a-binary"], Duration::from_secs(1)),
        )
        .unwrap_err();
    assert!(matches!(err, HomedeclError::SystemCommandFailed { .. }));
}
