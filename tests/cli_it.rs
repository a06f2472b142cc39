// std
use std::{fs, process::Command};
// crates.io
use httpmock::prelude::*;
use tempfile::TempDir;

const PRIVATE_KEY: &str = include_str!("fixtures/service_account.pem");
const BIN: &str = env!("CARGO_BIN_EXE_dyndns-function-client");

fn write_config(dir: &TempDir, server: &MockServer, hostname: Option<&str>) -> std::path::PathBuf {
	let key = dir.path().join("key.pem");
	let config = dir.path().join("client.ini");
	let mut document = format!(
		"[client_config]\nprivate_key_file = {}\ngcp_project = acme-dns\n\
		 cloud_function_trigger_url = {}\ntoken_endpoint = {}\n",
		key.display(),
		server.url("/update"),
		server.url("/token"),
	);

	if let Some(hostname) = hostname {
		document.push_str(&format!("hostname = {hostname}\n"));
	}

	fs::write(&key, PRIVATE_KEY).expect("Key fixture should be written.");
	fs::write(&config, document).expect("Config fixture should be written.");

	config
}

#[test]
fn prints_single_confirmation_naming_hostname() {
	let dir = TempDir::new().expect("Temporary directory should be created.");
	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(200).body("{\"id_token\":\"cli-token\"}");
	});
	let update_mock = server.mock(|when, then| {
		when.method(GET)
			.path("/update")
			.query_param("hostname", "cli.example.com")
			.header("authorization", "Bearer cli-token");
		then.status(200).body("OK");
	});
	let output = Command::new(BIN)
		.arg(write_config(&dir, &server, Some("cli.example.com")))
		.env("RUST_LOG", "off")
		.output()
		.expect("Binary should run.");
	let stdout = String::from_utf8(output.stdout).expect("Stdout should be UTF-8.");

	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	assert_eq!(stdout, "DNS for cli.example.com successfully updated\n");
	assert_eq!(stdout.matches("cli.example.com").count(), 1);

	token_mock.assert();
	update_mock.assert();
}

#[test]
fn missing_field_exits_non_zero_without_requests() {
	let dir = TempDir::new().expect("Temporary directory should be created.");
	let server = MockServer::start();
	let any_mock = server.mock(|when, then| {
		when.any_request();
		then.status(200);
	});
	let output = Command::new(BIN)
		.arg(write_config(&dir, &server, None))
		.env("RUST_LOG", "off")
		.output()
		.expect("Binary should run.");

	assert!(!output.status.success());
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8_lossy(&output.stderr).contains("hostname"));

	any_mock.assert_calls(0);
}

#[test]
fn token_failure_exits_non_zero() {
	let dir = TempDir::new().expect("Temporary directory should be created.");
	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(401).body("{\"error\":\"invalid_client\"}");
	});
	let update_mock = server.mock(|when, then| {
		when.method(GET).path("/update");
		then.status(200);
	});
	let output = Command::new(BIN)
		.arg(write_config(&dir, &server, Some("cli.example.com")))
		.env("RUST_LOG", "off")
		.output()
		.expect("Binary should run.");

	assert!(!output.status.success());
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8_lossy(&output.stderr).contains("401"));

	token_mock.assert();
	update_mock.assert_calls(0);
}
