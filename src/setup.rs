//! The work a forked child does before its image is replaced: restore
//! SIGPIPE, apply redirections, bind its pipe end, then `execvp`.
//!
//! Everything here runs after `fork`. The inputs are prepared by the parent,
//! errors only borrow from them, and every descriptor is an `OwnedFd` that is
//! closed on every return path. `execvp` itself may still allocate while it
//! walks the search path.

use std::ffi::CString;

use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;

use crate::error::SetupError;
use crate::pipe::PipeEnd;
use crate::redirect::PreparedRedirect;

/// Exit status of a child whose redirection file could not be opened.
pub const REDIRECT_FAILURE: i32 = 1;
/// Exit status of a child that could not duplicate a descriptor.
pub const REBIND_FAILURE: i32 = 125;
/// Exit status of a child whose program exists but cannot be executed.
pub const NOT_EXECUTABLE: i32 = 126;
/// Exit status of a child whose program is not on the search path.
pub const NOT_FOUND: i32 = 127;

impl SetupError<'_> {
	pub fn exit_code(&self) -> i32 {
		match *self {
			SetupError::Open { .. } => REDIRECT_FAILURE,
			SetupError::Rebind { .. } => REBIND_FAILURE,
			SetupError::Exec { source: Errno::ENOENT, .. } | SetupError::Exec { source: Errno::ENOTDIR, .. } => NOT_FOUND,
			SetupError::Exec { .. } => NOT_EXECUTABLE,
		}
	}
}

pub struct ChildSetup<'a> {
	argv: &'a [CString],
	redirects: &'a [PreparedRedirect],
	pipe_end: Option<PipeEnd>,
}

impl<'a> ChildSetup<'a> {
	pub fn new(argv: &'a [CString], redirects: &'a [PreparedRedirect], pipe_end: Option<PipeEnd>) -> ChildSetup<'a> {
		ChildSetup { argv, redirects, pipe_end }
	}

	/// Redirections first (input, then output), then the pipe end, so a pipe
	/// overrides an explicit redirection of the same descriptor.
	pub fn apply(&mut self) -> Result<(), SetupError<'a>> {
		for redirect in self.redirects {
			redirect.apply()?;
		}
		if let Some(end) = self.pipe_end.take() {
			end.bind()?;
		}
		Ok(())
	}

	/// Applies the setup and replaces the process image. Only returns on failure.
	pub fn run(mut self) -> SetupError<'a> {
		// the Rust runtime ignores SIGPIPE and dispositions survive exec
		let _ = unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) };
		if let Err(e) = self.apply() {
			return e;
		}
		self.exec()
	}

	fn exec(&self) -> SetupError<'a> {
		let argv = self.argv;
		let program = &argv[0];
		match unistd::execvp(program, argv) {
			Ok(never) => match never {},
			Err(source) => SetupError::Exec { program: program.to_str().unwrap_or("?"), source },
		}
	}
}
