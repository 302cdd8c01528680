//! Main CLI application

use crate::cli::list::{print_targets, ListFormat};
use crate::config::{
    parse_config_auto, parse_config_file, resolve_config_path, validate_config, Config,
};
use crate::error::{AuraError, ExecutionError};
use crate::runner::{Context, Executor, Verbosity};
use crate::ui;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Config file path
    config_path: PathBuf,
    /// Context shared by every subcommand
    ctx: Context,
}

impl App {
    /// Load the configuration found from the context's working directory
    pub fn new(ctx: Context) -> Result<Self, AuraError> {
        let (config, config_path) = parse_config_auto(ctx.working_dir())?;
        Ok(App {
            config,
            config_path,
            ctx,
        })
    }

    /// Load a specific config file, relative to the context's working directory
    pub fn with_config_file(path: PathBuf, ctx: Context) -> Result<Self, AuraError> {
        let config_path = resolve_config_path(&path, ctx.working_dir())?;
        let config = parse_config_file(&config_path)?;
        Ok(App {
            config,
            config_path,
            ctx,
        })
    }

    /// Run a `build` subcommand
    ///
    /// Only the requested targets and their dependencies are checked, as they
    /// are walked; problems elsewhere in the configuration do not block a build.
    pub fn build(mut self, matches: &ArgMatches) -> Result<(), AuraError> {
        let names = requested_targets(matches);
        debug!(config = %self.config_path.display(), targets = ?names, "starting build");

        self.ctx = self
            .ctx
            .with_dry_run(matches.get_flag("dry-run"))
            .with_always_run_epilogue(matches.get_flag("always-epilogue"));
        if self.ctx.dry_run && self.ctx.verbosity == Verbosity::Normal {
            self.ctx.verbosity = Verbosity::Verbose;
        }

        let mut executor = Executor::new(&self.config);
        executor.run_targets(&names, &mut self.ctx)?;

        debug!(commands = executor.report().commands, "build finished");
        Ok(())
    }

    /// Run a `list` subcommand
    pub fn list(&self, matches: &ArgMatches) -> Result<(), AuraError> {
        let format = matches
            .get_one::<ListFormat>("format")
            .copied()
            .unwrap_or_default();
        print_targets(&self.config, format, &mut io::stdout())
    }

    /// Run a `validate` subcommand
    pub fn validate(&self) -> Result<(), AuraError> {
        validate_config(&self.config)?;
        if self.ctx.verbosity >= Verbosity::Normal {
            println!(
                "{}",
                ui::success_line(&format!(
                    "{} is valid ({} targets)",
                    self.config_path.display(),
                    self.config.targets.len()
                ))
            );
        }
        Ok(())
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("aura")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A declarative build-target runner")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to aura.yaml config file")
                .global(true),
        )
        .arg(
            Arg::new("directory")
                .short('C')
                .long("directory")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Run as if started in DIR")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Echo every command before it runs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Run targets with their dependencies")
                .arg(
                    Arg::new("targets")
                        .value_name("TARGET")
                        .num_args(0..)
                        .help("Targets to run, in order"),
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .value_name("TARGETS")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Comma separated targets to run before the positional ones"),
                )
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .help("Print commands without running them")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("always-epilogue")
                        .long("always-epilogue")
                        .help("Run the epilogue even when a target fails")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list").about("List available targets").arg(
                Arg::new("format")
                    .long("format")
                    .value_name("FORMAT")
                    .value_parser(value_parser!(ListFormat))
                    .default_value("table")
                    .help("Output format"),
            ),
        )
        .subcommand(Command::new("validate").about("Check the configuration"))
        .subcommand(
            Command::new("completions")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .value_parser(value_parser!(Shell))
                        .required(true),
                ),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Targets named with `-t`, followed by the positional ones
fn requested_targets(matches: &ArgMatches) -> Vec<String> {
    let flagged = matches.get_many::<String>("target").into_iter().flatten();
    let positional = matches.get_many::<String>("targets").into_iter().flatten();

    flagged
        .chain(positional)
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Default log filter for a verbosity level
fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Silent => "off",
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    }
}

fn init_tracing(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter(verbosity))),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Working directory for the run, from `-C` or the process
fn working_dir(matches: &ArgMatches) -> Result<PathBuf, AuraError> {
    let cwd = env::current_dir()?;
    let Some(dir) = matches.get_one::<PathBuf>("directory") else {
        return Ok(cwd);
    };

    let path = cwd.join(dir);
    if !path.is_dir() {
        return Err(ExecutionError::ChangeDirectory {
            path,
            error: "not a directory".to_string(),
        }
        .into());
    }
    Ok(path)
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), AuraError> {
    run_from(env::args_os())
}

/// Run the CLI application with provided arguments
///
/// Errors are reported on stderr according to the verbosity before they are
/// returned.
pub fn run_from<I, T>(args: I) -> Result<(), AuraError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut command = build_command();
    let matches = command.clone().get_matches_from(args);

    let verbosity = get_verbosity(&matches);
    init_tracing(verbosity);

    let ctx = Context::new().with_verbosity(verbosity);
    let result = dispatch_subcommand(&mut command, &matches, ctx.clone());
    if let Err(e) = &result {
        ctx.print_error(&e.to_string());
    }
    result
}

fn dispatch_subcommand(
    command: &mut Command,
    matches: &ArgMatches,
    ctx: Context,
) -> Result<(), AuraError> {
    let Some((name, sub_matches)) = matches.subcommand() else {
        // No subcommand specified, show help
        command.print_help()?;
        println!();
        return Ok(());
    };

    if name == "completions" {
        if let Some(shell) = sub_matches.get_one::<Shell>("shell").copied() {
            clap_complete::generate(shell, command, "aura", &mut io::stdout());
        }
        return Ok(());
    }

    let ctx = ctx.with_working_dir(working_dir(matches)?);
    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_config_file(path.clone(), ctx)?,
        None => App::new(ctx)?,
    };

    match name {
        "build" => app.build(sub_matches),
        "list" => app.list(sub_matches),
        "validate" => app.validate(),
        _ => Ok(()),
    }
}
