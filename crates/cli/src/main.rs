mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use versions_lib::Section;
use versions_lib::platform::paths::store_path;

/// versions - Track library, extension and executable versions in a JSON file
#[derive(Parser, Debug)]
#[command(name = "versions")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// The command [init, add, show] you want to run
  cmd: String,

  /// The section [libraries, extensions, executables] you want to add to
  #[arg(short, long)]
  section: Option<String>,

  /// The item you want to add
  #[arg(short, long)]
  item: Option<String>,

  /// The value you want to add
  #[arg(short, long)]
  value: Option<String>,

  /// Path to the store file (default: $VERSIONS_FILE, then /versions.json)
  #[arg(short, long)]
  file: Option<PathBuf>,

  /// Print the store as JSON (show only)
  #[arg(long)]
  json: bool,

  /// Enable debug logging on stderr
  #[arg(long)]
  verbose: bool,
}

/// A fully validated request.
#[derive(Debug, PartialEq, Eq)]
enum Command {
  Init,
  Add {
    section: Section,
    item: String,
    value: String,
  },
  Show,
}

/// Why the arguments were rejected before touching the store.
#[derive(Debug, PartialEq, Eq)]
enum UsageError {
  UnknownCommand,
  InvalidSection,
  MissingItem,
  MissingValue,
}

impl UsageError {
  /// Message printed above the help text. Unknown commands only get help.
  fn message(&self) -> Option<&'static str> {
    match self {
      UsageError::UnknownCommand => None,
      UsageError::InvalidSection => Some("You must provide a valid section to add."),
      UsageError::MissingItem => Some("You must provide a valid item to add."),
      UsageError::MissingValue => Some("You must provide a valid value to add."),
    }
  }
}

impl Cli {
  fn validate(&self) -> Result<Command, UsageError> {
    match self.cmd.as_str() {
      "init" => Ok(Command::Init),
      "show" => Ok(Command::Show),
      "add" => {
        let section = self
          .section
          .as_deref()
          .and_then(|s| s.parse::<Section>().ok())
          .ok_or(UsageError::InvalidSection)?;
        let item = non_empty(&self.item).ok_or(UsageError::MissingItem)?;
        let value = non_empty(&self.value).ok_or(UsageError::MissingValue)?;
        Ok(Command::Add { section, item, value })
      }
      _ => Err(UsageError::UnknownCommand),
    }
  }

  fn store_path(&self) -> PathBuf {
    self.file.clone().unwrap_or_else(store_path)
  }
}

fn non_empty(arg: &Option<String>) -> Option<String> {
  arg.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let command = match cli.validate() {
    Ok(command) => command,
    Err(usage) => {
      if let Some(message) = usage.message() {
        println!("{}", message);
      }
      Cli::command().print_help()?;
      return Ok(());
    }
  };

  let path = cli.store_path();
  tracing::debug!(path = ?path, ?command, "resolved store");

  match command {
    Command::Init => cmd::cmd_init(&path),
    Command::Add { section, item, value } => cmd::cmd_add(&path, section, &item, &value),
    Command::Show => cmd::cmd_show(&path, cli.json),
  }
}
