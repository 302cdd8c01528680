//! Target execution
//!
//! The [`Executor`] runs a session: the prologue, the requested targets with
//! their dependencies, then the epilogue. Every command is substituted,
//! dispatched, and its failure weighed against the continue-on-error policy.

use crate::config::{Config, Target};
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{
    dispatch, Context, DependencyWalker, TargetId, TargetRegistry, VariableResolver,
};
use std::collections::HashSet;
use tracing::warn;

/// Name used for the `@` variable while the prologue runs
pub const PROLOGUE: &str = "prologue";

/// Name used for the `@` variable while the epilogue runs
pub const EPILOGUE: &str = "epilogue";

/// What happened while running targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of commands dispatched
    pub commands: usize,

    /// Diagnostics of failures tolerated by continue-on-error
    pub tolerated: Vec<String>,
}

impl RunReport {
    fn absorb(&mut self, other: RunReport) {
        self.commands += other.commands;
        self.tolerated.extend(other.tolerated);
    }
}

/// Runs targets from one configuration
pub struct Executor<'a> {
    config: &'a Config,
    registry: TargetRegistry<'a>,
    completed: HashSet<TargetId>,
    report: RunReport,
}

impl<'a> Executor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Executor {
            config,
            registry: TargetRegistry::new(config),
            completed: HashSet::new(),
            report: RunReport::default(),
        }
    }

    /// Everything run so far in this session
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Run the prologue, each requested target in order, then the epilogue
    ///
    /// A failure skips the epilogue unless the context asks for it to run
    /// anyway; the first error is returned either way.
    pub fn run_targets<S: AsRef<str>>(
        &mut self,
        names: &[S],
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        let result = self.run_body(names, ctx);

        match result {
            Ok(()) => self.run_epilogue(ctx),
            Err(err) => {
                if ctx.always_run_epilogue {
                    if let Err(epilogue_err) = self.run_epilogue(ctx) {
                        warn!(error = %epilogue_err, "epilogue failed after an earlier error");
                    }
                }
                Err(err)
            }
        }
    }

    fn run_body<S: AsRef<str>>(&mut self, names: &[S], ctx: &mut Context) -> ExecutionResult<()> {
        self.run_prologue(ctx)?;
        for name in names {
            self.run(name.as_ref(), ctx)?;
        }
        Ok(())
    }

    /// Run a named target after its dependencies
    pub fn run(&mut self, name: &str, ctx: &mut Context) -> ExecutionResult<()> {
        let order = DependencyWalker::new(&self.registry).walk_named(name, &self.completed)?;
        if order.is_empty() {
            warn!(name, "target already ran in this session, skipping");
        }
        self.run_order(&order, ctx)
    }

    pub fn run_prologue(&mut self, ctx: &mut Context) -> ExecutionResult<()> {
        let config = self.config;
        self.run_unnamed(PROLOGUE, &config.prologue, ctx)
    }

    pub fn run_epilogue(&mut self, ctx: &mut Context) -> ExecutionResult<()> {
        let config = self.config;
        self.run_unnamed(EPILOGUE, &config.epilogue, ctx)
    }

    /// Run a target that is not part of the registry, after its dependencies
    fn run_unnamed(
        &mut self,
        name: &str,
        target: &Target,
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        let order = DependencyWalker::new(&self.registry).walk(target, &self.completed)?;
        self.run_order(&order, ctx)?;

        let report = self.run_all(name, target, ctx)?;
        self.report.absorb(report);
        Ok(())
    }

    fn run_order(&mut self, order: &[TargetId], ctx: &mut Context) -> ExecutionResult<()> {
        for &id in order {
            let name = self.registry.name(id);
            let target = self.registry.get(id);

            let report = self.run_all(name, target, ctx)?;
            self.report.absorb(report);
            self.completed.insert(id);
        }
        Ok(())
    }

    /// Run the commands of one target, without its dependencies
    pub fn run_all(
        &self,
        name: &str,
        target: &Target,
        ctx: &mut Context,
    ) -> ExecutionResult<RunReport> {
        let mut report = RunReport::default();
        if target.run.is_empty() {
            return Ok(report);
        }

        ctx.print_target_start(name);
        let keep_going = target.continue_on_error || self.config.continue_on_error;

        for command in &target.run {
            let substituted = VariableResolver::new(&self.config.vars, ctx.working_dir())
                .substitute(command, name);

            report.commands += 1;
            let err = match dispatch(&substituted.text, ctx) {
                Ok(output) => {
                    ctx.print_output(&output);
                    continue;
                }
                Err(_) if ctx.dry_run => continue,
                Err(err) => err,
            };

            if let Some(output) = err.output() {
                ctx.print_output(output);
            }

            let message = target
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());

            if !keep_going {
                return Err(ExecutionError::TargetFailed {
                    target: name.to_string(),
                    message,
                    source: Box::new(err),
                });
            }

            let diagnostic = format!("in {} -> {}", name, message);
            warn!("{}", diagnostic);
            report.tolerated.push(diagnostic);
        }

        Ok(report)
    }
}
