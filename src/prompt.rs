use crate::job::{ExecutionResult, Termination};

pub const WELCOME: &str = "Welcome to ENSEA Shell.\nType 'exit' or press 'Ctrl+D' to quit.\n";
pub const FAREWELL: &str = "Exiting ENSEA Shell.\n";

/// `enseash % `
pub fn plain(shell_name: &str) -> String {
	format!("{} % ", shell_name)
}

/// `enseash [exit:0|3ms] % ` or `enseash [sign:9|3ms] % `
pub fn with_status(shell_name: &str, result: &ExecutionResult) -> String {
	let word = match result.termination {
		Termination::Exited(_) => "exit",
		Termination::Signaled(_) => "sign",
		Termination::Unknown => return plain(shell_name),
	};
	format!("{} [{}:{}|{}ms] % ", shell_name, word, result.code(), result.elapsed_millis())
}
