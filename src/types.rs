use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectType { Input, Output }

impl RedirectType {
	pub fn operator(self) -> &'static str {
		match self {
			RedirectType::Input => "<",
			RedirectType::Output => ">",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	pub typ: RedirectType,
	pub target: String,
}

/// One program invocation: its name, arguments and at most one redirection of
/// each kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
	pub name: String,
	pub arguments: Vec<String>,
	pub input: Option<String>,
	pub output: Option<String>,
}

impl Command {
	/// Full argument vector, the program name first.
	pub fn argv(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.name.as_str()).chain(self.arguments.iter().map(String::as_str))
	}

	/// Redirections in the order they must be applied: input, then output.
	pub fn redirects(&self) -> Vec<Redirect> {
		let input = self.input.iter().map(|t| Redirect { typ: RedirectType::Input, target: t.clone() });
		let output = self.output.iter().map(|t| Redirect { typ: RedirectType::Output, target: t.clone() });
		input.chain(output).collect()
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let argv: Vec<&str> = self.argv().collect();
		write!(f, "{}", argv.join(" "))?;
		if let Some(ref input) = self.input {
			write!(f, " < {}", input)?;
		}
		if let Some(ref output) = self.output {
			write!(f, " > {}", output)?;
		}
		Ok(())
	}
}

/// A single command, or exactly two commands joined by one pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
	Single(Command),
	Piped(Command, Command),
}

impl Pipeline {
	/// The command whose status is reported for the whole line.
	pub fn reported(&self) -> &Command {
		match *self {
			Pipeline::Single(ref c) => c,
			Pipeline::Piped(_, ref second) => second,
		}
	}
}

impl fmt::Display for Pipeline {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Pipeline::Single(ref c) => write!(f, "{}", c),
			Pipeline::Piped(ref first, ref second) => write!(f, "{} | {}", first, second),
		}
	}
}
