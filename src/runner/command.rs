//! Command execution
//!
//! This module hands a single, already substituted command to the platform
//! shell. The `cd` pseudo-command is handled here without a subprocess: it
//! moves the working directory kept in the [`Context`].

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

/// Shell used to run commands on this platform, with its "run string" flag
pub fn platform_shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd", "/C")
    } else {
        ("/bin/bash", "-c")
    }
}

/// Dispatch one command and return its combined output
pub fn dispatch(command: &str, ctx: &mut Context) -> ExecutionResult<String> {
    if command.trim().is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    ctx.print_command(command);

    if ctx.dry_run {
        ctx.print_dry_run(command);
        return Ok(String::new());
    }

    if let Some(dir) = command.strip_prefix("cd ") {
        change_directory(dir.trim(), ctx)?;
        return Ok(String::new());
    }

    run_shell(command, ctx.working_dir())
}

/// Move the context's working directory
fn change_directory(dir: &str, ctx: &mut Context) -> ExecutionResult<()> {
    if dir.is_empty() {
        return Err(ExecutionError::MissingDirectory);
    }

    let target = ctx.working_dir().join(dir);
    let resolved = target
        .canonicalize()
        .map_err(|e| ExecutionError::ChangeDirectory {
            path: target.clone(),
            error: e.to_string(),
        })?;

    if !resolved.is_dir() {
        return Err(ExecutionError::ChangeDirectory {
            path: target,
            error: "not a directory".to_string(),
        });
    }

    debug!(from = %ctx.working_dir().display(), to = %resolved.display(), "changing directory");
    ctx.working_dir = resolved;
    Ok(())
}

/// Run a command through the platform shell, capturing stdout and stderr together
fn run_shell(command: &str, working_dir: &Path) -> ExecutionResult<String> {
    let (shell, flag) = platform_shell();
    let spawn_error = |e: io::Error| ExecutionError::Spawn {
        command: command.to_string(),
        error: e.to_string(),
    };

    let (mut reader, writer) = io::pipe().map_err(spawn_error)?;
    let stderr_writer = writer.try_clone().map_err(spawn_error)?;

    let mut child = {
        let mut cmd = StdCommand::new(shell);
        cmd.arg(flag)
            .arg(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        // `cmd` holds the write ends until it is dropped at the end of this block
        cmd.spawn().map_err(spawn_error)?
    };

    let mut raw = Vec::new();
    let read_result = reader.read_to_end(&mut raw);
    let status = child.wait().map_err(spawn_error)?;
    read_result.map_err(spawn_error)?;

    let output = String::from_utf8_lossy(&raw).into_owned();

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            code: status.code(),
            output,
        });
    }

    Ok(output)
}
