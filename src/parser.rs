use crate::error::ParseError;
use crate::types::*;

type ParseResult<T> = Result<T, ParseError>;

/// Splits a line on runs of spaces. No quoting, escaping or expansion.
pub fn tokenize(line: &str) -> Vec<&str> {
	line.split(' ').filter(|t| !t.is_empty()).collect()
}

fn is_operator(token: &str) -> bool {
	matches!(token, "<" | ">" | "|")
}

struct Parser<'a> {
	tokens: &'a [&'a str],
	i: usize,
	max_args: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<&'a str> {
		self.tokens.get(self.i).copied()
	}

	fn next(&mut self) -> Option<&'a str> {
		let token = self.peek();
		if token.is_some() {
			self.i += 1;
		}
		token
	}

	fn parse_redirect_target(&mut self, typ: RedirectType) -> ParseResult<String> {
		match self.next() {
			Some(target) if !is_operator(target) => Ok(target.to_string()),
			_ => Err(ParseError::MissingRedirectTarget(typ.operator())),
		}
	}

	fn parse_command(&mut self) -> ParseResult<Command> {
		let mut words: Vec<&'a str> = vec![];
		let mut input = None;
		let mut output = None;

		while let Some(token) = self.peek() {
			match token {
				"|" => { break; },
				"<" => {
					self.i += 1;
					input = Some(self.parse_redirect_target(RedirectType::Input)?);
				},
				">" => {
					self.i += 1;
					output = Some(self.parse_redirect_target(RedirectType::Output)?);
				},
				word => {
					if words.len() == self.max_args {
						return Err(ParseError::TooManyArguments { limit: self.max_args });
					}
					words.push(word);
					self.i += 1;
				},
			}
		}

		let mut words = words.into_iter();
		let name = words.next().ok_or(ParseError::EmptyCommand)?;
		Ok(Command {
			name: name.to_string(),
			arguments: words.map(str::to_string).collect(),
			input,
			output,
		})
	}

	fn parse_pipeline(&mut self) -> ParseResult<Pipeline> {
		if self.tokens.is_empty() {
			return Err(ParseError::EmptyLine);
		}
		if self.tokens.iter().any(|t| t.contains('\0')) {
			return Err(ParseError::NulByte);
		}

		let first = self.parse_command()?;
		if self.next().is_none() {
			return Ok(Pipeline::Single(first));
		}
		let second = self.parse_command()?;
		if self.peek().is_some() {
			return Err(ParseError::TooManyStages);
		}
		Ok(Pipeline::Piped(first, second))
	}
}

pub fn parse_tokens(tokens: &[&str], max_args: usize) -> ParseResult<Pipeline> {
	let mut parser = Parser { tokens, i: 0, max_args };
	parser.parse_pipeline()
}

pub fn parse(line: &str, max_args: usize) -> ParseResult<Pipeline> {
	parse_tokens(&tokenize(line), max_args)
}
