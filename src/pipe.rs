use std::os::fd::OwnedFd;

use nix::fcntl::OFlag;
use nix::unistd;

use crate::error::SetupError;
use crate::redirect::{rebind, StdStream};

/// Both ends of a pipe. The parent holds it while forking the two sides of a
/// pipeline and closes it once both children exist.
#[derive(Debug)]
pub struct Pipe {
	read: OwnedFd,
	write: OwnedFd,
}

/// The single end of a pipe a child keeps; the other end is already closed.
#[derive(Debug)]
pub enum PipeEnd {
	Write(OwnedFd),
	Read(OwnedFd),
}

impl Pipe {
	/// Both ends are close-on-exec; only the copy bound onto a standard
	/// descriptor reaches the new program.
	pub fn open() -> nix::Result<Pipe> {
		let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC)?;
		Ok(Pipe { read, write })
	}

	/// Producer side: drops the read end.
	pub fn into_write_end(self) -> PipeEnd {
		let Pipe { read, write } = self;
		drop(read);
		PipeEnd::Write(write)
	}

	/// Consumer side: drops the write end.
	pub fn into_read_end(self) -> PipeEnd {
		let Pipe { read, write } = self;
		drop(write);
		PipeEnd::Read(read)
	}

	/// Releases the parent's copies of both ends.
	pub fn close(self) {
		let Pipe { read, write } = self;
		drop(write);
		drop(read);
	}
}

impl PipeEnd {
	pub fn target(&self) -> StdStream {
		match *self {
			PipeEnd::Write(_) => StdStream::Output,
			PipeEnd::Read(_) => StdStream::Input,
		}
	}

	/// Duplicates this end onto standard output (write end) or standard input
	/// (read end) and closes the original descriptor.
	pub fn bind(self) -> Result<(), SetupError<'static>> {
		let target = self.target();
		let fd = match self {
			PipeEnd::Write(fd) | PipeEnd::Read(fd) => fd,
		};
		rebind(fd, target)
	}
}
