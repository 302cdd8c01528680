//! Dependency resolution
//!
//! Computes the order in which targets run so that every dependency's full
//! lifecycle completes before its dependent. The traversal is iterative and
//! keeps a per-node mark, so a back-edge to a target still in progress is
//! reported as a cycle instead of recursing forever.

use crate::config::Target;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::registry::{dependencies, Dependency, TargetId, TargetRegistry};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Plans dependency execution over a registry
pub struct DependencyWalker<'r, 'a> {
    registry: &'r TargetRegistry<'a>,
}

impl<'r, 'a> DependencyWalker<'r, 'a> {
    pub fn new(registry: &'r TargetRegistry<'a>) -> Self {
        DependencyWalker { registry }
    }

    /// Order in which the dependencies of an unnamed target run
    ///
    /// Targets in `completed` are skipped along with their dependencies.
    pub fn walk(
        &self,
        target: &Target,
        completed: &HashSet<TargetId>,
    ) -> ExecutionResult<Vec<TargetId>> {
        let mut marks = self.initial_marks(completed);
        let mut order = Vec::new();

        for dep in dependencies(target) {
            if let Some(id) = self.resolve(&dep)? {
                self.visit(id, &mut marks, &mut order)?;
            }
        }

        Ok(order)
    }

    /// Order in which a named target and its dependencies run
    ///
    /// The named target comes last unless it is already in `completed`.
    pub fn walk_named(
        &self,
        name: &str,
        completed: &HashSet<TargetId>,
    ) -> ExecutionResult<Vec<TargetId>> {
        let id = self
            .registry
            .id_of(name)
            .ok_or_else(|| ExecutionError::TargetNotFound(name.to_string()))?;

        let mut marks = self.initial_marks(completed);
        let mut order = Vec::new();
        self.visit(id, &mut marks, &mut order)?;
        Ok(order)
    }

    fn initial_marks(&self, completed: &HashSet<TargetId>) -> Vec<Mark> {
        self.registry
            .ids()
            .map(|id| {
                if completed.contains(&id) {
                    Mark::Done
                } else {
                    Mark::Unvisited
                }
            })
            .collect()
    }

    /// Map a dependency entry to a target id; file dependencies yield `None`
    fn resolve(&self, dep: &Dependency<'_>) -> ExecutionResult<Option<TargetId>> {
        match dep {
            Dependency::File(path) => {
                debug!(path = *path, "file dependency, nothing to check");
                Ok(None)
            }
            Dependency::Target(name) => self
                .registry
                .id_of(name)
                .map(Some)
                .ok_or_else(|| ExecutionError::TargetNotFound(name.to_string())),
        }
    }

    /// Post-order depth-first visit from `start` using an explicit stack
    fn visit(
        &self,
        start: TargetId,
        marks: &mut [Mark],
        order: &mut Vec<TargetId>,
    ) -> ExecutionResult<()> {
        if marks[start] == Mark::Done {
            debug!(name = self.registry.name(start), "already complete, skipping");
            return Ok(());
        }

        // each frame is a target and the index of its next dependency
        let mut stack: Vec<(TargetId, usize)> = vec![(start, 0)];
        marks[start] = Mark::Visiting;

        while let Some(&(id, next)) = stack.last() {
            let target = self.registry.get(id);

            let Some(entry) = target.deps.get(next) else {
                stack.pop();
                marks[id] = Mark::Done;
                order.push(id);
                continue;
            };
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }

            let Some(dep) = self.resolve(&Dependency::parse(entry))? else {
                continue;
            };

            match marks[dep] {
                Mark::Done => {}
                Mark::Visiting => return Err(self.cycle_error(&stack, dep)),
                Mark::Unvisited => {
                    marks[dep] = Mark::Visiting;
                    stack.push((dep, 0));
                }
            }
        }

        Ok(())
    }

    fn cycle_error(&self, stack: &[(TargetId, usize)], back_edge: TargetId) -> ExecutionError {
        let start = stack
            .iter()
            .position(|(id, _)| *id == back_edge)
            .unwrap_or(0);

        let mut path: Vec<&str> = stack[start..]
            .iter()
            .map(|(id, _)| self.registry.name(*id))
            .collect();
        path.push(self.registry.name(back_edge));

        ExecutionError::CircularDependency(path.join(" -> "))
    }
}
