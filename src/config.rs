use std::env;

use crate::error::ConfigError;

pub const DEFAULT_SHELL_NAME: &str = "enseash";
pub const DEFAULT_MAX_ARGS: usize = 64;

const NAME_KEY: &str = "ENSEASH_NAME";
const MAX_ARGS_KEY: &str = "ENSEASH_MAX_ARGS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Word shown at the start of every prompt.
	pub shell_name: String,
	/// Upper bound on the argument vector of a single command.
	pub max_args: usize,
}

impl Default for Config {
	fn default() -> Config {
		Config { shell_name: DEFAULT_SHELL_NAME.to_string(), max_args: DEFAULT_MAX_ARGS }
	}
}

impl Config {
	pub fn from_env() -> Result<Config, ConfigError> {
		Config::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError> where F: Fn(&str) -> Option<String> {
		let mut config = Config::default();
		if let Some(name) = lookup(NAME_KEY) {
			if name.trim().is_empty() {
				return Err(ConfigError::Empty { key: NAME_KEY });
			}
			config.shell_name = name;
		}
		if let Some(value) = lookup(MAX_ARGS_KEY) {
			config.max_args = match value.trim().parse::<usize>() {
				Ok(n) if n > 0 => n,
				_ => return Err(ConfigError::InvalidNumber { key: MAX_ARGS_KEY, value }),
			};
		}
		Ok(config)
	}
}
