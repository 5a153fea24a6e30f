use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, error};

use crate::error::EngineError;

/// How a child ended, decoded once from the raw wait status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
	Exited(i32),
	Signaled(i32),
	Unknown,
}

pub trait WaitStatusExt {
	fn termination(self) -> Termination;
}

impl WaitStatusExt for WaitStatus {
	fn termination(self) -> Termination {
		match self {
			WaitStatus::Exited(_, code) => Termination::Exited(code),
			WaitStatus::Signaled(_, signal, _) => Termination::Signaled(signal as i32),
			_ => Termination::Unknown,
		}
	}
}

/// What one executed line reports back to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
	pub command: String,
	pub termination: Termination,
	pub elapsed: Duration,
}

impl ExecutionResult {
	pub fn terminated_normally(&self) -> bool {
		matches!(self.termination, Termination::Exited(_))
	}

	/// Exit code for a normal exit, signal number otherwise.
	pub fn code(&self) -> i32 {
		match self.termination {
			Termination::Exited(n) | Termination::Signaled(n) => n,
			Termination::Unknown => -1,
		}
	}

	pub fn elapsed_millis(&self) -> u128 {
		self.elapsed.as_millis()
	}
}

/// Runs `f` and measures it on the monotonic clock.
pub fn timed<T, E, F>(f: F) -> Result<(T, Duration), E> where F: FnOnce() -> Result<T, E> {
	let start = Instant::now();
	let value = f()?;
	Ok((value, start.elapsed()))
}

/// Blocks until `pid` changes state. Interrupted waits are retried.
pub fn wait_for(pid: Pid) -> Result<WaitStatus, EngineError> {
	loop {
		match wait::waitpid(pid, None) {
			Ok(status) => {
				debug!(pid = pid.as_raw(), ?status, "child collected");
				return Ok(status);
			},
			Err(Errno::EINTR) => continue,
			Err(e) => return Err(EngineError::Wait(e)),
		}
	}
}

/// Waits for every child of the current line, in spawn order, and returns the
/// termination of the last one. A wait error on one child does not stop the
/// others from being reaped.
pub fn collect(pids: &[Pid]) -> Result<Termination, EngineError> {
	let mut failure = None;
	let mut last = None;
	for &pid in pids {
		match wait_for(pid) {
			Ok(status) => last = Some(status),
			Err(e) => {
				error!(pid = pid.as_raw(), "{}", e);
				failure.get_or_insert(e);
			},
		}
	}
	if let Some(e) = failure {
		return Err(e);
	}
	match last {
		None => Err(EngineError::UnexpectedStatus("no child to wait for".to_string())),
		Some(status) => match status.termination() {
			Termination::Unknown => Err(EngineError::UnexpectedStatus(format!("{:?}", status))),
			termination => Ok(termination),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::sys::signal::Signal;
	use std::process;

	fn spawn(script: &str) -> Pid {
		let child = process::Command::new("sh").arg("-c").arg(script).spawn().unwrap();
		Pid::from_raw(child.id() as i32)
	}

	#[test]
	fn decodes_wait_statuses() {
		let pid = Pid::from_raw(4242);
		assert_eq!(WaitStatus::Exited(pid, 7).termination(), Termination::Exited(7));
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGSEGV, true).termination(), Termination::Signaled(11));
		assert_eq!(WaitStatus::Stopped(pid, Signal::SIGSTOP).termination(), Termination::Unknown);
		assert_eq!(WaitStatus::Continued(pid).termination(), Termination::Unknown);
		assert_eq!(WaitStatus::StillAlive.termination(), Termination::Unknown);
	}

	#[test]
	fn result_accessors() {
		let exited = ExecutionResult { command: "true".to_string(), termination: Termination::Exited(0), elapsed: Duration::from_millis(12) };
		assert!(exited.terminated_normally());
		assert_eq!(exited.code(), 0);
		assert_eq!(exited.elapsed_millis(), 12);

		let signaled = ExecutionResult { termination: Termination::Signaled(9), ..exited };
		assert!(!signaled.terminated_normally());
		assert_eq!(signaled.code(), 9);
	}

	#[test]
	fn collects_exit_code_of_last_child() {
		let pids = [spawn("exit 3"), spawn("exit 7")];
		assert_eq!(collect(&pids).unwrap(), Termination::Exited(7));
	}

	#[test]
	fn collects_signal_number() {
		let pid = spawn("kill -TERM $$");
		assert_eq!(collect(&[pid]).unwrap(), Termination::Signaled(15));
	}

	#[test]
	fn waiting_for_a_stranger_is_an_error() {
		// pid 1 is never our child
		match collect(&[Pid::from_raw(1)]) {
			Err(EngineError::Wait(e)) => assert_eq!(e, Errno::ECHILD),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn nothing_to_collect_is_an_error() {
		assert!(matches!(collect(&[]), Err(EngineError::UnexpectedStatus(_))));
	}

	#[test]
	fn timed_is_monotonic() {
		let (value, elapsed) = timed(|| -> Result<u8, ()> { Ok(5) }).unwrap();
		assert_eq!(value, 5);
		assert!(elapsed >= Duration::ZERO);
	}
}
