use anyhow::{Context as AnyhowContext, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use ir_lookup::{render_pretty, IrDocument, LookupError, DEFAULT_IR_PATH};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod flags;

use flags::MatchModeFlag;

/// Process status for a usage error or a missing IR file.
pub const EXIT_USAGE: u8 = 2;
/// Process status for an unreadable or malformed IR file.
pub const EXIT_FAILURE: u8 = 1;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "extract-ir-type")]
#[command(about = "Print the IR type of a symbol found by name substring", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Substring to look for in symbol names (case-sensitive)
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    needle: String,

    /// IR JSON produced by the generator
    #[arg(env = "IR_LOOKUP_PATH", default_value = DEFAULT_IR_PATH)]
    ir_json_path: PathBuf,

    /// Print every match as a JSON array instead of only the chosen one
    #[arg(long)]
    all: bool,

    /// How symbol names are compared with the needle
    #[arg(long = "match", value_enum, default_value_t = MatchModeFlag::Substring)]
    match_mode: MatchModeFlag,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Found,
    NoMatch,
}

impl LookupStatus {
    pub const fn exit_code(self) -> u8 {
        match self {
            LookupStatus::Found => 0,
            LookupStatus::NoMatch => 1,
        }
    }
}

pub fn main_entry() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            let not_found = err
                .downcast_ref::<LookupError>()
                .is_some_and(LookupError::is_not_found);
            if not_found {
                eprintln!("{err}");
                ExitCode::from(EXIT_USAGE)
            } else {
                eprintln!("error: {err:#}");
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub fn run(cli: &Cli) -> Result<LookupStatus> {
    let doc = IrDocument::load(&cli.ir_json_path)?;
    let mode = cli.match_mode.as_domain();
    let needle = cli.needle.as_str();

    if cli.all {
        let matches = doc.find_matches_with(needle, mode);
        if matches.is_empty() {
            return report_no_match(cli);
        }
        let count = matches.len();
        let list = Value::Array(matches.iter().map(|m| m.to_json_value(count)).collect());
        print_stdout(&render_pretty(&list)?).context("Failed to write matches")?;
        return Ok(LookupStatus::Found);
    }

    let Some(selection) = doc.lookup_with(needle, mode) else {
        return report_no_match(cli);
    };
    print_stdout(&render_pretty(&selection.to_json_value())?).context("Failed to write match")?;
    if let Some(note) = selection.ambiguity_note() {
        eprintln!("{note}");
    }
    Ok(LookupStatus::Found)
}

fn report_no_match(cli: &Cli) -> Result<LookupStatus> {
    print_stdout(&format!(
        "no matches for '{}' in {}",
        cli.needle,
        cli.ir_json_path.display()
    ))?;
    Ok(LookupStatus::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ir_path_defaults_to_generator_output() {
        let cli = Cli::try_parse_from(["extract-ir-type", "Foo"]).unwrap();
        if std::env::var_os("IR_LOOKUP_PATH").is_none() {
            assert_eq!(cli.ir_json_path, PathBuf::from("bin/json/ir.json"));
        }
        assert!(!cli.all);
        assert!(matches!(cli.match_mode, MatchModeFlag::Substring));
    }

    #[test]
    fn positional_path_and_flags_parse() {
        let cli =
            Cli::try_parse_from(["extract-ir-type", "Foo", "ir.json", "--all", "--match", "exact"])
                .unwrap();
        assert_eq!(cli.needle, "Foo");
        assert_eq!(cli.ir_json_path, PathBuf::from("ir.json"));
        assert!(cli.all);
        assert!(matches!(cli.match_mode, MatchModeFlag::Exact));
    }

    #[test]
    fn needle_is_required_and_non_empty() {
        let missing = Cli::try_parse_from(["extract-ir-type"]).unwrap_err();
        assert_eq!(missing.exit_code(), i32::from(EXIT_USAGE));

        let empty = Cli::try_parse_from(["extract-ir-type", ""]).unwrap_err();
        assert_eq!(empty.exit_code(), i32::from(EXIT_USAGE));
    }

    #[test]
    fn status_codes() {
        assert_eq!(LookupStatus::Found.exit_code(), 0);
        assert_eq!(LookupStatus::NoMatch.exit_code(), 1);
    }
}
