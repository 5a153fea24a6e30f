//! Drives the `enseash` binary through its standard input.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn session(input: &str) -> Output {
	let mut child = Command::new(env!("CARGO_BIN_EXE_enseash"))
		.env_remove("ENSEASH_NAME")
		.env_remove("ENSEASH_MAX_ARGS")
		.env_remove("RUST_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.unwrap();
	child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
	child.wait_with_output().unwrap()
}

/// Replaces every `|<digits>ms]` with `|Nms]` so timings can be compared.
fn mask_timings(s: &str) -> String {
	let mut out = String::new();
	let mut rest = s;
	while let Some(i) = rest.find('|') {
		out.push_str(&rest[..=i]);
		rest = &rest[i + 1..];
		let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
		if digits > 0 && rest[digits..].starts_with("ms]") {
			out.push('N');
			rest = &rest[digits..];
		}
	}
	out.push_str(rest);
	out
}

#[test]
fn prompt_reflects_each_line() {
	let output = session("echo hi\nfalse\n|\n\nexit\n");
	assert!(output.status.success());
	assert_eq!(mask_timings(&String::from_utf8_lossy(&output.stdout)), concat!(
		"Welcome to ENSEA Shell.\nType 'exit' or press 'Ctrl+D' to quit.\n",
		"enseash % ",
		"hi\n",
		"enseash [exit:0|Nms] % ",
		"enseash [exit:1|Nms] % ",
		"enseash % ",
		"enseash % ",
		"Exiting ENSEA Shell.\n",
	));
	assert!(String::from_utf8_lossy(&output.stderr).contains("enseash: empty command"));
}

#[test]
fn end_of_input_leaves_the_shell() {
	let output = session("true\n");
	assert!(output.status.success());
	let stdout = mask_timings(&String::from_utf8_lossy(&output.stdout));
	assert!(stdout.ends_with("enseash [exit:0|Nms] % \nExiting ENSEA Shell.\n"), "{}", stdout);
}

#[test]
fn missing_program_is_diagnosed_on_stderr() {
	let output = session("definitely-not-a-program-enseash\nexit\n");
	let stdout = mask_timings(&String::from_utf8_lossy(&output.stdout));
	assert!(stdout.contains("enseash [exit:127|Nms] % "), "{}", stdout);
	assert!(String::from_utf8_lossy(&output.stderr).contains("definitely-not-a-program-enseash"));
}

#[test]
fn diagnostics_bypass_redirected_output() {
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("out.txt");
	let output = session(&format!("definitely-not-a-program-enseash > {}\nexit\n", out.display()));

	assert_eq!(fs::read(&out).unwrap().len(), 0);
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("enseash: definitely-not-a-program-enseash: "), "{}", stderr);
	let stdout = mask_timings(&String::from_utf8_lossy(&output.stdout));
	assert!(stdout.contains("enseash [exit:127|Nms] % "), "{}", stdout);
}

#[test]
fn invalid_configuration_is_fatal() {
	let output = Command::new(env!("CARGO_BIN_EXE_enseash"))
		.env("ENSEASH_MAX_ARGS", "none")
		.stdin(Stdio::null())
		.output()
		.unwrap();
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("ENSEASH_MAX_ARGS"));
}
