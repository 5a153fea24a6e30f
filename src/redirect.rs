use std::ffi::{CString, NulError};
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};

use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use crate::error::SetupError;
use crate::types::{Redirect, RedirectType};

/// Permissions of files created by output redirection (rw-r--r--).
pub const OUTPUT_MODE: Mode = Mode::from_bits_truncate(0o644);

/// The standard descriptors a child may rebind. Descriptor 2 is never one of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream { Input, Output }

impl StdStream {
	pub fn raw_fd(self) -> RawFd {
		match self {
			StdStream::Input => libc::STDIN_FILENO,
			StdStream::Output => libc::STDOUT_FILENO,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			StdStream::Input => "standard input",
			StdStream::Output => "standard output",
		}
	}
}

/// A redirection ready to be applied in a child: the path is already a C string
/// so the child does not need to allocate for it.
#[derive(Debug)]
pub struct PreparedRedirect {
	typ: RedirectType,
	path: CString,
	display: String,
}

impl PreparedRedirect {
	pub fn new(redirect: &Redirect) -> Result<PreparedRedirect, NulError> {
		Ok(PreparedRedirect {
			typ: redirect.typ,
			path: CString::new(redirect.target.as_bytes())?,
			display: redirect.target.clone(),
		})
	}

	/// The standard descriptor this redirection replaces.
	pub fn target(&self) -> StdStream {
		match self.typ {
			RedirectType::Input => StdStream::Input,
			RedirectType::Output => StdStream::Output,
		}
	}

	/// Opens the file: read-only for input, create-or-truncate for output.
	pub fn open(&self) -> Result<OwnedFd, SetupError<'_>> {
		let flags = match self.typ {
			RedirectType::Input => OFlag::O_RDONLY,
			RedirectType::Output => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
		};
		fcntl::open(self.path.as_c_str(), flags | OFlag::O_CLOEXEC, OUTPUT_MODE)
			.map_err(|source| SetupError::Open { path: &self.display, source })
	}

	pub fn apply(&self) -> Result<(), SetupError<'_>> {
		let fd = self.open()?;
		rebind(fd, self.target())
	}
}

/// Duplicates `fd` onto the standard descriptor `target`, then closes `fd`.
/// The copy on `target` survives `exec` even if `fd` was close-on-exec.
pub fn rebind(fd: OwnedFd, target: StdStream) -> Result<(), SetupError<'static>> {
	let rebind_error = |source| SetupError::Rebind { stream: target, source };
	if fd.as_raw_fd() == target.raw_fd() {
		// the target slot was free and the kernel handed it out directly
		fcntl::fcntl(&fd, FcntlArg::F_SETFD(FdFlag::empty())).map_err(rebind_error)?;
		let _ = fd.into_raw_fd();
		return Ok(());
	}
	let duplicated = match target {
		StdStream::Input => unistd::dup2_stdin(&fd),
		StdStream::Output => unistd::dup2_stdout(&fd),
	};
	duplicated.map_err(rebind_error)?;
	drop(fd);
	Ok(())
}
