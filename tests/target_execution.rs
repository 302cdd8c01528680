//! Integration tests for target execution

mod common;

use aura::config::{parse_config, parse_config_file, validate_config, Config};
use aura::error::{ErrorKind, ExecutionError};
use aura::runner::{Context, Executor, Verbosity};
use common::{create_test_config, read_lines};
use std::path::Path;
use tempfile::TempDir;

fn silent_ctx(dir: &Path) -> Context {
    Context::new()
        .with_working_dir(dir.to_path_buf())
        .with_verbosity(Verbosity::Silent)
}

fn load(yaml: &str) -> (TempDir, Config) {
    let (temp_dir, config_path) = create_test_config(yaml);
    let config = parse_config_file(&config_path).unwrap();
    validate_config(&config).unwrap();
    (temp_dir, config)
}

#[test]
fn test_run_simple_target() {
    let (temp_dir, config) = load(
        r#"
targets:
  hello:
    run: ["echo hello > out.txt"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config).run("hello", &mut ctx).unwrap();

    assert_eq!(read_lines(&temp_dir.path().join("out.txt")), vec!["hello"]);
}

#[test]
fn test_variables_are_substituted() {
    let (temp_dir, config) = load(
        r#"
vars:
  CC: gcc
  OUT: app
targets:
  build:
    run: ["echo $CC -o ${OUT} main.c for $@ > out.txt"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config).run("build", &mut ctx).unwrap();

    assert_eq!(
        read_lines(&temp_dir.path().join("out.txt")),
        vec!["gcc -o app main.c for build"]
    );
}

#[test]
fn test_dependencies_run_first_and_once() {
    let (temp_dir, config) = load(
        r#"
targets:
  base:
    run: ["echo base >> log.txt"]
  left:
    run: ["echo left >> log.txt"]
    deps: [base]
  right:
    run: ["echo right >> log.txt"]
    deps: [base]
  top:
    run: ["echo top >> log.txt"]
    deps: [left, right, README.md]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    let mut executor = Executor::new(&config);
    executor.run_targets(&["top", "left"], &mut ctx).unwrap();

    assert_eq!(
        read_lines(&temp_dir.path().join("log.txt")),
        vec!["base", "left", "right", "top"]
    );
    assert_eq!(executor.report().commands, 4);
}

#[test]
fn test_prologue_and_epilogue_wrap_targets() {
    let (temp_dir, config) = load(
        r#"
prologue:
  run: ["echo $@ >> log.txt"]
epilogue:
  run: ["echo $@ >> log.txt"]
targets:
  build:
    run: ["echo $@ >> log.txt"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config)
        .run_targets(&["build"], &mut ctx)
        .unwrap();

    assert_eq!(
        read_lines(&temp_dir.path().join("log.txt")),
        vec!["prologue", "build", "epilogue"]
    );
}

#[test]
fn test_failure_stops_target_and_skips_epilogue() {
    let (temp_dir, config) = load(
        r#"
epilogue:
  run: ["echo epilogue >> log.txt"]
targets:
  build:
    run: ["echo ok1 >> log.txt", "exit 4", "echo ok2 >> log.txt"]
    onerror: "build broke"
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    let err = Executor::new(&config)
        .run_targets(&["build"], &mut ctx)
        .unwrap_err();

    assert_eq!(err.to_string(), "TargetError: in build -> build broke");
    assert_eq!(err.kind(), ErrorKind::CommandExecution);
    assert_eq!(read_lines(&temp_dir.path().join("log.txt")), vec!["ok1"]);
}

#[test]
fn test_always_epilogue_runs_after_failure() {
    let (temp_dir, config) = load(
        r#"
epilogue:
  run: ["echo epilogue >> log.txt"]
targets:
  build:
    run: ["false"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path()).with_always_run_epilogue(true);
    let result = Executor::new(&config).run_targets(&["build"], &mut ctx);

    assert!(matches!(result, Err(ExecutionError::TargetFailed { .. })));
    assert_eq!(read_lines(&temp_dir.path().join("log.txt")), vec!["epilogue"]);
}

#[test]
fn test_continue_on_error_runs_remaining_commands() {
    let (temp_dir, config) = load(
        r#"
targets:
  build:
    run: ["echo ok1 >> log.txt", "exit 1", "echo ok2 >> log.txt"]
    continue_on_error: true
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    let mut executor = Executor::new(&config);
    executor.run("build", &mut ctx).unwrap();

    assert_eq!(read_lines(&temp_dir.path().join("log.txt")), vec!["ok1", "ok2"]);
    assert_eq!(executor.report().tolerated.len(), 1);
    assert_eq!(executor.report().tolerated[0], "in build -> exit status 1");
}

#[test]
fn test_global_continue_on_error() {
    let (temp_dir, config) = load(
        r#"
continue_on_error: true
targets:
  build:
    run: ["exit 2", "echo after >> log.txt"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config).run("build", &mut ctx).unwrap();

    assert_eq!(read_lines(&temp_dir.path().join("log.txt")), vec!["after"]);
}

#[test]
fn test_unknown_target_is_not_tolerated() {
    let config = parse_config("continue_on_error: true\ntargets: {}\n").unwrap();
    let temp_dir = TempDir::new().unwrap();

    let mut ctx = silent_ctx(temp_dir.path());
    let err = Executor::new(&config)
        .run_targets(&["deploy"], &mut ctx)
        .unwrap_err();

    assert!(matches!(err, ExecutionError::TargetNotFound(ref name) if name == "deploy"));
    assert_eq!(err.kind(), ErrorKind::TargetNotFound);
}

#[test]
fn test_cd_persists_between_commands_and_targets() {
    let (temp_dir, config) = load(
        r#"
targets:
  enter:
    run: ["mkdir -p nested", "cd nested"]
  write:
    run: ["echo $cwd > where.txt"]
    deps: [enter]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config).run("write", &mut ctx).unwrap();

    let nested = temp_dir.path().join("nested").canonicalize().unwrap();
    assert_eq!(ctx.working_dir(), nested);
    assert_eq!(
        read_lines(&nested.join("where.txt")),
        vec![nested.display().to_string()]
    );
}

#[test]
fn test_dry_run_executes_nothing() {
    let (temp_dir, config) = load(
        r#"
prologue:
  run: ["touch prologue.txt"]
targets:
  build:
    run: ["touch built.txt", "exit 1", "cd missing"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path()).with_dry_run(true);
    let mut executor = Executor::new(&config);
    executor.run_targets(&["build"], &mut ctx).unwrap();

    assert_eq!(executor.report().commands, 4);
    assert!(!temp_dir.path().join("prologue.txt").exists());
    assert!(!temp_dir.path().join("built.txt").exists());
    assert_eq!(ctx.working_dir(), temp_dir.path());
}

#[test]
fn test_undefined_variable_is_left_verbatim() {
    let (temp_dir, config) = load(
        r#"
targets:
  show:
    run: ["echo '${AURA_TEST_SURELY_UNDEFINED}' > out.txt"]
"#,
    );

    let mut ctx = silent_ctx(temp_dir.path());
    Executor::new(&config).run("show", &mut ctx).unwrap();

    assert_eq!(
        read_lines(&temp_dir.path().join("out.txt")),
        vec!["${AURA_TEST_SURELY_UNDEFINED}"]
    );
}
