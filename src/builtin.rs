use crate::types::{Command, Pipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
	Exit,
}

fn match_name(name: &str) -> Option<Builtin> {
	match name {
		"exit" => Some(Builtin::Exit),
		_ => None,
	}
}

/// Builtins only apply to a bare single command: no arguments, no redirection.
pub fn match_builtin(pipeline: &Pipeline) -> Option<Builtin> {
	match *pipeline {
		Pipeline::Single(Command { ref name, ref arguments, input: None, output: None }) if arguments.is_empty() => {
			match_name(name)
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse;

	fn builtin(line: &str) -> Option<Builtin> {
		match_builtin(&parse(line, 8).unwrap())
	}

	#[test]
	fn bare_exit() {
		assert_eq!(builtin("exit"), Some(Builtin::Exit));
		assert_eq!(builtin("  exit "), Some(Builtin::Exit));
	}

	#[test]
	fn exit_with_anything_else_is_a_program() {
		assert_eq!(builtin("exit 3"), None);
		assert_eq!(builtin("exit > out.txt"), None);
		assert_eq!(builtin("exit | cat"), None);
		assert_eq!(builtin("ls"), None);
	}
}
