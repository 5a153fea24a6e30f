use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use enseash::{prompt, Config, Engine, LineOutcome, ParseError};

fn main() -> ExitCode {
	// RUST_LOG selects the level; logs go to stderr so the prompt stays clean
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(io::stderr))
		.with(EnvFilter::from_default_env())
		.init();

	match run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("enseash: {:#}", e);
			ExitCode::FAILURE
		},
	}
}

/// One line without its terminator, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
	let mut line: Vec<u8> = vec![];
	if input.read_until(b'\n', &mut line)? == 0 {
		return Ok(None);
	}
	if line.last() == Some(&b'\n') {
		line.pop();
		if line.last() == Some(&b'\r') {
			line.pop();
		}
	}
	Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

fn run() -> Result<()> {
	let config = Config::from_env().context("invalid configuration")?;
	let engine = Engine::new(config);
	let name = engine.config().shell_name.clone();

	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();

	stdout.write_all(prompt::WELCOME.as_bytes())?;
	let mut next_prompt = prompt::plain(&name);
	loop {
		stdout.write_all(next_prompt.as_bytes())?;
		stdout.flush()?;

		let line = match read_line(&mut stdin_locked).context("cannot read input")? {
			Some(line) => line,
			None => {
				stdout.write_all(b"\n")?;
				break;
			},
		};

		next_prompt = match engine.execute_line(&line) {
			Ok(LineOutcome::Exit) => break,
			Ok(LineOutcome::Executed(result)) => prompt::with_status(&name, &result),
			Ok(LineOutcome::Malformed(ParseError::EmptyLine)) => prompt::plain(&name),
			Ok(LineOutcome::Malformed(e)) => {
				eprintln!("{}: {}", name, e);
				prompt::plain(&name)
			},
			Err(e) if e.is_fatal() => {
				error!(error = %e, "giving up");
				return Err(e).context("cannot run command");
			},
			Err(e) => {
				error!(error = %e, "line failed");
				eprintln!("{}: {}", name, e);
				prompt::plain(&name)
			},
		};
	}

	stdout.write_all(prompt::FAREWELL.as_bytes())?;
	stdout.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lines_lose_their_terminator() {
		let mut input: &[u8] = b"ls -l\r\necho hi\nlast";
		assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("ls -l"));
		assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("echo hi"));
		assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("last"));
		assert_eq!(read_line(&mut input).unwrap(), None);
	}
}
