//! Command session over a single tree.
//!
//! A session owns its tree outright. Each input line is parsed into a
//! [`Command`] and run to completion before the next one. Bad input produces
//! [`Response::Error`] and leaves the tree exactly as it was. Whenever a
//! command moves the tree to a new version, the response carries a fresh
//! render of it.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::btree::{BTree, InsertOutcome, Key, Version};
use crate::config::VisualizerConfig;
use crate::render::{JsonRenderer, RenderError, Renderer};
use crate::simulation::{KeyGenConfig, KeyGenerator};

const HELP: &str = "\
commands:
  insert <key>...      insert one or more integer keys
  random <n> [seed]    insert n random keys in 0..=999
  contains <key>       check whether a key is present
  reset                discard the tree and start empty
  show                 render the tree
  json                 render the tree as JSON
  stats                key, node and level counts
  check                verify the tree's structural invariants
  help                 show this message
  quit                 end the session";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Vec<Key>),
    Random { count: usize, seed: Option<u64> },
    Contains(Key),
    Reset,
    Show,
    Json,
    Stats,
    Check,
    Help,
    Quit,
}

impl Command {
    /// Whether running this command can change the tree.
    #[must_use]
    pub const fn mutates(&self) -> bool {
        matches!(self, Self::Insert(_) | Self::Random { .. } | Self::Reset)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "insert" | "add" => {
                if args.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "insert",
                        argument: "key",
                    });
                }
                let keys = args
                    .iter()
                    .map(|arg| parse_key(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::Insert(keys)
            }
            "random" => {
                let count = args.first().ok_or(CommandError::MissingArgument {
                    command: "random",
                    argument: "count",
                })?;
                let count = count
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidCount((*count).to_string()))?;
                let seed = args
                    .get(1)
                    .map(|s| {
                        s.parse::<u64>()
                            .map_err(|_| CommandError::InvalidSeed((*s).to_string()))
                    })
                    .transpose()?;
                expect_at_most(&args, 2, "random")?;
                Self::Random { count, seed }
            }
            "contains" | "find" => {
                let key = args.first().ok_or(CommandError::MissingArgument {
                    command: "contains",
                    argument: "key",
                })?;
                expect_at_most(&args, 1, "contains")?;
                Self::Contains(parse_key(key)?)
            }
            "reset" => no_args(&args, "reset", Self::Reset)?,
            "show" => no_args(&args, "show", Self::Show)?,
            "json" => no_args(&args, "json", Self::Json)?,
            "stats" => no_args(&args, "stats", Self::Stats)?,
            "check" => no_args(&args, "check", Self::Check)?,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn parse_key(arg: &str) -> Result<Key, CommandError> {
    arg.parse::<Key>()
        .map_err(|_| CommandError::InvalidKey(arg.to_string()))
}

fn expect_at_most(args: &[&str], max: usize, command: &'static str) -> Result<(), CommandError> {
    args.get(max).map_or(Ok(()), |extra| {
        Err(CommandError::UnexpectedArgument {
            command,
            argument: (*extra).to_string(),
        })
    })
}

fn no_args(args: &[&str], command: &'static str, parsed: Command) -> Result<Command, CommandError> {
    expect_at_most(args, 0, command)?;
    Ok(parsed)
}

/// What the session answers to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Text to show. Empty for blank lines.
    Output(String),
    /// The line was rejected; the tree is unchanged.
    Error(String),
    /// The session is over.
    Quit,
}

/// An interactive session owning one tree.
pub struct Session {
    tree: BTree,
    config: VisualizerConfig,
    renderer: Box<dyn Renderer>,
    /// Version last drawn, if any.
    rendered_version: Option<Version>,
}

impl Session {
    /// Start a session with an empty tree.
    #[must_use]
    pub fn new(config: VisualizerConfig) -> Self {
        let renderer = config.render_format.renderer(config.show_ids);
        Self {
            tree: BTree::new(config.order),
            config,
            renderer,
            rendered_version: None,
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &BTree {
        &self.tree
    }

    #[must_use]
    pub const fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Version the view last drew.
    #[must_use]
    pub const fn rendered_version(&self) -> Option<Version> {
        self.rendered_version
    }

    /// Parse and run one line of input.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Response::Output(String::new());
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(line, "rejected command: {e}");
                return Response::Error(e.to_string());
            }
        };

        if command == Command::Quit {
            return Response::Quit;
        }

        match self.execute(&command) {
            Ok(output) => Response::Output(output),
            Err(e) => {
                tracing::warn!(?command, "command failed: {e}");
                Response::Error(e.to_string())
            }
        }
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: &Command) -> Result<String, SessionError> {
        let mut out = match command {
            Command::Insert(keys) => self.insert_keys(keys),
            Command::Random { count, seed } => self.insert_random(*count, *seed)?,
            Command::Contains(key) => {
                if self.tree.contains(*key) {
                    format!("{key} is present")
                } else {
                    format!("{key} is absent")
                }
            }
            Command::Reset => {
                self.tree.reset();
                "tree reset".to_string()
            }
            Command::Show => {
                let text = self.renderer.render(&self.tree.snapshot())?;
                self.rendered_version = Some(self.tree.version());
                return Ok(text);
            }
            Command::Json => {
                return Ok(JsonRenderer { pretty: true }.render(&self.tree.snapshot())?);
            }
            Command::Stats => self.stats(),
            Command::Check => self.check(),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };

        if command.mutates() {
            self.redraw_if_changed(&mut out)?;
        }
        Ok(out)
    }

    fn insert_keys(&mut self, keys: &[Key]) -> String {
        let mut lines = Vec::with_capacity(keys.len());
        for &key in keys {
            match self.tree.insert(key) {
                InsertOutcome::Inserted { .. } => lines.push(format!("inserted {key}")),
                InsertOutcome::Duplicate => lines.push(format!("{key} already present")),
            }
        }
        lines.join("\n")
    }

    fn insert_random(&mut self, count: usize, seed: Option<u64>) -> Result<String, CommandError> {
        if count > self.config.max_random {
            return Err(CommandError::TooMany {
                requested: count,
                max: self.config.max_random,
            });
        }

        let seed = seed.unwrap_or_else(rand::random);
        let mut keys = KeyGenerator::with_config(seed, KeyGenConfig::default());
        let mut added = 0;
        for key in keys.take(count) {
            if self.tree.insert(key).is_inserted() {
                added += 1;
            }
        }

        tracing::debug!(count, added, seed, "random fill");
        Ok(format!(
            "inserted {added} of {count} random keys (seed {seed})"
        ))
    }

    fn stats(&self) -> String {
        format!(
            "keys={} nodes={} height={} order={} version={}",
            self.tree.len(),
            self.tree.node_count(),
            self.tree.height(),
            self.tree.order(),
            self.tree.version(),
        )
    }

    fn check(&self) -> String {
        let violations = self.tree.check_invariants();
        if violations.is_empty() {
            return "ok: all invariants hold".to_string();
        }
        let mut out = format!("{} violation(s):", violations.len());
        for violation in &violations {
            let _ = write!(out, "\n  {violation}");
        }
        out
    }

    fn redraw_if_changed(&mut self, out: &mut String) -> Result<(), RenderError> {
        let version = self.tree.version();
        if self.rendered_version == Some(version) {
            return Ok(());
        }
        let text = self.renderer.render(&self.tree.snapshot())?;
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&text);
        self.rendered_version = Some(version);
        Ok(())
    }
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing to parse.
    Empty,
    /// First word is not a known command.
    UnknownCommand(String),
    /// A required argument is absent.
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    /// An extra argument was given.
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },
    /// A key that is not an integer.
    InvalidKey(String),
    /// A count that is not a non-negative integer.
    InvalidCount(String),
    /// A seed that is not a non-negative integer.
    InvalidSeed(String),
    /// A random fill larger than the configured cap.
    TooMany { requested: usize, max: usize },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::UnknownCommand(name) => {
                write!(f, "unknown command '{name}' (try 'help')")
            }
            Self::MissingArgument { command, argument } => {
                write!(f, "{command}: missing {argument}")
            }
            Self::UnexpectedArgument { command, argument } => {
                write!(f, "{command}: unexpected argument '{argument}'")
            }
            Self::InvalidKey(value) => write!(f, "'{value}' is not an integer key"),
            Self::InvalidCount(value) => write!(f, "'{value}' is not a valid count"),
            Self::InvalidSeed(value) => write!(f, "'{value}' is not a valid seed"),
            Self::TooMany { requested, max } => {
                write!(f, "cannot insert {requested} random keys at once (max {max})")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Errors from running a command.
#[derive(Debug)]
pub enum SessionError {
    /// The command was rejected.
    Command(CommandError),
    /// Drawing the tree failed.
    Render(RenderError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "{e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Command(e) => Some(e),
            Self::Render(e) => Some(e),
        }
    }
}

impl From<CommandError> for SessionError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

impl From<RenderError> for SessionError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insert_many() {
        assert_eq!(
            "insert 10 -20 30".parse::<Command>(),
            Ok(Command::Insert(vec![10, -20, 30]))
        );
        assert_eq!("ADD 1".parse::<Command>(), Ok(Command::Insert(vec![1])));
    }

    #[test]
    fn test_parse_random() {
        assert_eq!(
            "random 5".parse::<Command>(),
            Ok(Command::Random {
                count: 5,
                seed: None
            })
        );
        assert_eq!(
            "random 5 42".parse::<Command>(),
            Ok(Command::Random {
                count: 5,
                seed: Some(42)
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "insert".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "insert",
                argument: "key"
            })
        );
        assert_eq!(
            "insert 1 x".parse::<Command>(),
            Err(CommandError::InvalidKey("x".to_string()))
        );
        assert_eq!(
            "insert 1.5".parse::<Command>(),
            Err(CommandError::InvalidKey("1.5".to_string()))
        );
        assert_eq!(
            "random -1".parse::<Command>(),
            Err(CommandError::InvalidCount("-1".to_string()))
        );
        assert_eq!(
            "random 3 abc".parse::<Command>(),
            Err(CommandError::InvalidSeed("abc".to_string()))
        );
        assert_eq!(
            "reset now".parse::<Command>(),
            Err(CommandError::UnexpectedArgument {
                command: "reset",
                argument: "now".to_string()
            })
        );
        assert_eq!(
            "delete 4".parse::<Command>(),
            Err(CommandError::UnknownCommand("delete".to_string()))
        );
    }

    #[test]
    fn test_command_mutates() {
        assert!(Command::Insert(vec![1]).mutates());
        assert!(Command::Reset.mutates());
        assert!(!Command::Show.mutates());
        assert!(!Command::Contains(1).mutates());
    }

    #[test]
    fn test_command_error_display() {
        assert_eq!(
            CommandError::TooMany {
                requested: 5000,
                max: 1000
            }
            .to_string(),
            "cannot insert 5000 random keys at once (max 1000)"
        );
    }
}
