use std::ffi::CString;
use std::io;
use std::os::fd::AsFd;

use nix::unistd::{self, ForkResult, Pid};
use tracing::{debug, warn};

use crate::builtin::{self, Builtin};
use crate::config::Config;
use crate::error::{EngineError, ParseError};
use crate::job::{self, ExecutionResult};
use crate::parser;
use crate::pipe::{Pipe, PipeEnd};
use crate::redirect::PreparedRedirect;
use crate::setup::ChildSetup;
use crate::types::{Command, Pipeline};

/// A command with every allocation its child needs already done.
#[derive(Debug)]
struct PreparedCommand {
	argv: Vec<CString>,
	redirects: Vec<PreparedRedirect>,
}

impl PreparedCommand {
	fn new(command: &Command) -> Result<PreparedCommand, ParseError> {
		let argv = command.argv()
			.map(CString::new)
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| ParseError::NulByte)?;
		let redirects = command.redirects().iter()
			.map(PreparedRedirect::new)
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| ParseError::NulByte)?;
		Ok(PreparedCommand { argv, redirects })
	}
}

#[derive(Debug)]
enum PreparedPipeline {
	Single(PreparedCommand),
	Piped(PreparedCommand, PreparedCommand),
}

impl PreparedPipeline {
	fn new(pipeline: &Pipeline) -> Result<PreparedPipeline, ParseError> {
		Ok(match *pipeline {
			Pipeline::Single(ref c) => PreparedPipeline::Single(PreparedCommand::new(c)?),
			Pipeline::Piped(ref first, ref second) => {
				PreparedPipeline::Piped(PreparedCommand::new(first)?, PreparedCommand::new(second)?)
			},
		})
	}
}

fn exec_command(shell_name: &str, command: &PreparedCommand, pipe_end: Option<PipeEnd>) -> ! {
	let e = ChildSetup::new(&command.argv, &command.redirects, pipe_end).run();
	// Unbuffered pieces straight to descriptor 2: no allocation, and no std
	// stderr lock that another thread may have held at fork time.
	let stderr = io::stderr();
	for piece in [shell_name, ": ", e.subject(), ": ", e.errno().desc(), "\n"] {
		let _ = unistd::write(stderr.as_fd(), piece.as_bytes());
	}
	// SAFETY: _exit is async-signal-safe and never returns.
	unsafe { libc::_exit(e.exit_code()) }
}

fn fork() -> Result<ForkResult, EngineError> {
	// SAFETY: children only rebind descriptors, write a diagnostic, then exec or _exit.
	unsafe { unistd::fork() }.map_err(EngineError::Fork)
}

#[derive(Debug)]
pub enum LineOutcome {
	/// The exit directive; nothing was spawned.
	Exit,
	/// Nothing was spawned.
	Malformed(ParseError),
	Executed(ExecutionResult),
}

/// Runs one input line at a time. No state is kept between lines.
#[derive(Debug, Clone, Default)]
pub struct Engine {
	config: Config,
}

impl Engine {
	pub fn new(config: Config) -> Engine {
		Engine { config }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Parses and runs `line`, blocking until every child it spawned has
	/// terminated. An `Err` is either fatal (see [`EngineError::is_fatal`]) or
	/// a collector anomaly for this line only.
	pub fn execute_line(&self, line: &str) -> Result<LineOutcome, EngineError> {
		let pipeline = match parser::parse(line, self.config.max_args) {
			Ok(pipeline) => pipeline,
			Err(e) => {
				warn!(line, error = %e, "malformed line");
				return Ok(LineOutcome::Malformed(e));
			},
		};
		debug!(%pipeline, "parsed");

		if let Some(Builtin::Exit) = builtin::match_builtin(&pipeline) {
			return Ok(LineOutcome::Exit);
		}

		let prepared = match PreparedPipeline::new(&pipeline) {
			Ok(prepared) => prepared,
			Err(e) => return Ok(LineOutcome::Malformed(e)),
		};

		let (termination, elapsed) = job::timed(|| -> Result<_, EngineError> {
			let pids = self.spawn_commands(&prepared)?;
			debug!(?pids, "spawned");
			job::collect(&pids)
		})?;
		let result = ExecutionResult { command: pipeline.reported().name.clone(), termination, elapsed };
		debug!(?result, "reported");
		Ok(LineOutcome::Executed(result))
	}

	/// Forks one child per command. For two commands the pipe is created
	/// before either fork and the parent's copies are closed once both
	/// children exist, so the reader sees end-of-stream when the writer exits.
	fn spawn_commands(&self, pipeline: &PreparedPipeline) -> Result<Vec<Pid>, EngineError> {
		let name = self.config.shell_name.as_str();
		match *pipeline {
			PreparedPipeline::Single(ref single) => {
				let pid = match fork()? {
					ForkResult::Parent { child } => child,
					ForkResult::Child => exec_command(name, single, None),
				};
				Ok(vec![pid])
			},
			PreparedPipeline::Piped(ref first, ref second) => {
				let pipe = Pipe::open().map_err(EngineError::Pipe)?;
				let producer = match fork()? {
					ForkResult::Parent { child } => child,
					ForkResult::Child => exec_command(name, first, Some(pipe.into_write_end())),
				};
				let consumer = match fork()? {
					ForkResult::Parent { child } => child,
					ForkResult::Child => exec_command(name, second, Some(pipe.into_read_end())),
				};
				pipe.close();
				Ok(vec![producer, consumer])
			},
		}
	}
}
