use nix::errno::Errno;
use thiserror::Error;

use crate::redirect::StdStream;

/// A line that cannot be turned into a pipeline. No process is spawned for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("empty line")]
	EmptyLine,
	#[error("empty command")]
	EmptyCommand,
	#[error("missing target after '{0}'")]
	MissingRedirectTarget(&'static str),
	#[error("too many arguments (limit is {limit})")]
	TooManyArguments { limit: usize },
	#[error("only one '|' is supported")]
	TooManyStages,
	#[error("nul byte in argument")]
	NulByte,
}

/// Failures inside a forked child, before its image is replaced. Fields borrow
/// from data the parent prepared, so building one does not allocate.
#[derive(Debug, Error)]
pub enum SetupError<'a> {
	#[error("{path}: {source}")]
	Open { path: &'a str, source: Errno },
	#[error("cannot rebind {}: {}", .stream.name(), .source)]
	Rebind { stream: StdStream, source: Errno },
	#[error("{program}: {source}")]
	Exec { program: &'a str, source: Errno },
}

impl<'a> SetupError<'a> {
	/// What the failure is about: a path, a standard stream or a program.
	pub fn subject(&self) -> &'a str {
		match *self {
			SetupError::Open { path, .. } => path,
			SetupError::Rebind { stream, .. } => stream.name(),
			SetupError::Exec { program, .. } => program,
		}
	}

	pub fn errno(&self) -> Errno {
		match *self {
			SetupError::Open { source, .. } | SetupError::Rebind { source, .. } | SetupError::Exec { source, .. } => source,
		}
	}
}

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("fork failed: {0}")]
	Fork(Errno),
	#[error("pipe failed: {0}")]
	Pipe(Errno),
	#[error("wait failed: {0}")]
	Wait(Errno),
	#[error("unexpected wait status: {0}")]
	UnexpectedStatus(String),
}

impl EngineError {
	/// Only a failed fork ends the shell. A failed pipe costs just that line.
	pub fn is_fatal(&self) -> bool {
		match *self {
			EngineError::Fork(_) => true,
			EngineError::Pipe(_) | EngineError::Wait(_) | EngineError::UnexpectedStatus(_) => false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("{key} must be a positive integer, got {value:?}")]
	InvalidNumber { key: &'static str, value: String },
	#[error("{key} must not be empty")]
	Empty { key: &'static str },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_fork_failure_is_fatal() {
		assert!(EngineError::Fork(Errno::EAGAIN).is_fatal());
		assert!(!EngineError::Pipe(Errno::EMFILE).is_fatal());
		assert!(!EngineError::Wait(Errno::ECHILD).is_fatal());
		assert!(!EngineError::UnexpectedStatus("Stopped".to_string()).is_fatal());
	}

	#[test]
	fn setup_errors_expose_their_parts() {
		let open = SetupError::Open { path: "in.txt", source: Errno::ENOENT };
		assert_eq!(open.subject(), "in.txt");
		assert_eq!(open.errno(), Errno::ENOENT);

		let rebind = SetupError::Rebind { stream: StdStream::Output, source: Errno::EBADF };
		assert_eq!(rebind.subject(), "standard output");
		assert_eq!(rebind.to_string(), format!("cannot rebind standard output: {}", Errno::EBADF));
	}
}
