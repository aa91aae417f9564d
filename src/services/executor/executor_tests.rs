use super::*;
use mockito::Matcher;
use serde_json::json;
use std::sync::mpsc;

const CMD: &str = r#"lk dispatch create --new-room --agent-name outbound-azure-caller --metadata '{"phone_number":"+919876543210","company_name":"Maxicus","candidate_name":"Asha"}' --api-key devkey --api-secret secret"#;

fn executor_for(server: &mockito::Server) -> HttpExecutor {
    HttpExecutor::new(format!("{}/execute", server.url()), Duration::from_secs(5))
}

#[test]
fn posts_command_and_returns_output() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/execute")
        .match_header("content-type", Matcher::Regex("^application/json".into()))
        .match_body(Matcher::Json(json!({ "command": CMD })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"output":"Dispatch created","status":"success"}"#)
        .create();

    let result = executor_for(&server).execute(CMD);
    mock.assert();
    assert_eq!(result.unwrap(), "Dispatch created");
}

#[test]
fn server_error_carries_status_and_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/execute")
        .with_status(500)
        .with_body("boom")
        .create();

    let result = executor_for(&server).execute(CMD);
    mock.assert();
    let err = result.unwrap_err();
    assert!(matches!(err, ExecError::RemoteExecution { status: 500, .. }));
    let msg = err.to_string();
    assert!(msg.contains("500"));
    assert!(msg.contains("boom"));
}

#[test]
fn forbidden_command_surfaces_relay_json() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/execute")
        .with_status(403)
        .with_body(r#"{"error":"Command not allowed"}"#)
        .create();

    let err = executor_for(&server).execute("rm -rf /").unwrap_err();
    mock.assert();
    assert!(err.to_string().contains("Command not allowed"));
}

#[test]
fn malformed_success_body_is_a_json_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/execute")
        .with_status(200)
        .with_body("not valid json")
        .create();

    let err = executor_for(&server).execute(CMD).unwrap_err();
    mock.assert();
    assert!(matches!(err, ExecError::Json(_)));
}

#[test]
fn missing_output_field_is_a_json_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/execute")
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .create();

    let err = executor_for(&server).execute(CMD).unwrap_err();
    mock.assert();
    assert!(matches!(err, ExecError::Json(_)));
}

#[test]
fn unreachable_backend_is_a_connectivity_error() {
    let exec = HttpExecutor::new("http://127.0.0.1:1/execute", Duration::from_secs(2));
    let err = exec.execute(CMD).unwrap_err();
    match err {
        ExecError::Connectivity { endpoint, .. } => {
            assert_eq!(endpoint, "http://127.0.0.1:1/execute");
        }
        other => panic!("expected connectivity error, got {other:?}"),
    }
}

#[test]
fn simulated_executor_echoes_command() {
    let out = SimulatedExecutor::new(Duration::ZERO).execute(CMD).unwrap();
    assert!(out.starts_with("Command simulation: \"lk dispatch create"));
    assert!(out.ends_with("would be executed on a server"));
}

#[test]
fn spawn_execute_reports_back_over_channel() {
    let (tx, rx) = mpsc::channel();
    let exec: Arc<dyn CommandExecutor> = Arc::new(SimulatedExecutor::new(Duration::ZERO));
    spawn_execute(exec, "lk dispatch create".into(), tx);
    let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(msg.outcome.unwrap().contains("lk dispatch create"));
}

#[test]
fn config_selects_executor_kind() {
    let cfg = AppConfig {
        executor: ExecutorKind::Simulate,
        simulate_delay_ms: 0,
        ..AppConfig::default()
    };
    let exec = executor_from_config(&cfg);
    assert!(exec.execute("echo hi").unwrap().contains("echo hi"));
}
