//! Command-execution engine of `enseash`, a minimal interactive shell.
//!
//! A line is split into words, parsed into one command or two commands joined
//! by a pipe, and every command runs in its own forked child with its
//! redirections and pipe end bound before `execvp`. The parent never touches
//! its own standard descriptors; it waits for exactly the children it spawned
//! and reports how the last one ended together with the elapsed time.
//!
//! ```no_run
//! use enseash::{Config, Engine, LineOutcome};
//!
//! let engine = Engine::new(Config::default());
//! if let Ok(LineOutcome::Executed(result)) = engine.execute_line("ls -l | wc -l") {
//!     println!("{}", enseash::prompt::with_status("enseash", &result));
//! }
//! ```

pub mod builtin;
pub mod config;
pub mod error;
pub mod eval;
pub mod job;
pub mod parser;
pub mod pipe;
pub mod prompt;
pub mod redirect;
pub mod setup;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, EngineError, ParseError, SetupError};
pub use eval::{Engine, LineOutcome};
pub use job::{ExecutionResult, Termination};
pub use types::{Command, Pipeline, Redirect, RedirectType};
