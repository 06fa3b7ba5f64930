// Orchestration tests for PylintHook using a recording runner (no real processes)


use serial_test::serial;
use snp_pylint::{exit_codes, ConfigError, HookError, PylintHook};
use std::collections::HashMap;
use std::ffi::OsString;
use test_utils::{FakeRunner, Sandbox};

const MANIFEST: &str = "pylint==3.0.0\n";

fn env_snapshot() -> HashMap<OsString, OsString> {
    std::env::vars_os().collect()
}

#[test]
#[serial]
fn test_first_run_provisions_then_lints() {
    let sandbox = Sandbox::new(MANIFEST);
    let cache_dir = sandbox.cache_dir(MANIFEST);
    let runner = FakeRunner::new();

    let code = PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert_eq!(code, 0);
    let python = snp_pylint::environment::python_executable(&sandbox.active_venv());
    assert_eq!(
        runner.command_lines(),
        [
            format!("{} -m virtualenv {}", python.display(), cache_dir.display()),
            format!("pip install -r {}", sandbox.requirements().display()),
            "pylint a.py".to_string(),
        ]
    );
    assert!(cache_dir.is_dir());
}

#[test]
#[serial]
fn test_linter_exit_code_is_propagated() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new().with_exit_code("pylint", 16);

    let code = PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert_eq!(code, 16);
    assert_eq!(runner.count("pip"), 1);
}

#[test]
#[serial]
fn test_cache_hit_skips_provisioning() {
    let sandbox = Sandbox::new(MANIFEST);
    std::fs::create_dir_all(sandbox.cache_dir(MANIFEST)).unwrap();
    let runner = FakeRunner::new();

    let code = PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert_eq!(code, 0);
    assert_eq!(runner.command_lines(), ["pylint a.py"]);
}

#[test]
#[serial]
fn test_provisioning_happens_once_across_runs() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new();
    let hook = PylintHook::new(sandbox.config(), &runner);

    hook.run().unwrap();
    hook.run().unwrap();

    assert_eq!(runner.count("pip"), 1);
    assert_eq!(runner.count("pylint"), 2);
}

#[test]
#[serial]
fn test_changed_manifest_gets_new_environment() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new();
    let hook = PylintHook::new(sandbox.config(), &runner);

    hook.run().unwrap();
    sandbox.write_requirements("pylint==3.0.0\nrequests\n");
    hook.run().unwrap();

    assert!(sandbox.cache_dir(MANIFEST).is_dir());
    assert!(sandbox.cache_dir("pylint==3.0.0\nrequests\n").is_dir());
    assert_eq!(runner.count("pip"), 2);
}

#[test]
#[serial]
fn test_reordered_manifest_is_a_different_environment() {
    let sandbox = Sandbox::new("pylint\nrequests\n");
    let runner = FakeRunner::new();
    let hook = PylintHook::new(sandbox.config(), &runner);

    hook.run().unwrap();
    sandbox.write_requirements("requests\npylint\n");
    hook.run().unwrap();

    assert_eq!(runner.count("pip"), 2);
}

#[test]
#[serial]
fn test_annotated_manifest_keys_on_raw_text_and_installs_via_file() {
    let manifest = "pylint==3.0.0  # pinned linter\nrequests==2.31 --hash=sha256:abc\n";
    let sandbox = Sandbox::new(manifest);
    let runner = FakeRunner::new();

    PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert!(sandbox.cache_dir(manifest).is_dir());
    assert_eq!(
        runner.command_lines()[1],
        format!("pip install -r {}", sandbox.requirements().display())
    );
}

#[test]
#[serial]
fn test_crlf_manifest_shares_the_lf_environment() {
    let sandbox = Sandbox::new("pylint==3.0.0\r\n");
    std::fs::create_dir_all(sandbox.cache_dir(MANIFEST)).unwrap();
    let runner = FakeRunner::new();

    PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert_eq!(runner.command_lines(), ["pylint a.py"]);
}

#[test]
#[serial]
fn test_pip_and_linter_run_inside_cached_venv() {
    let sandbox = Sandbox::new(MANIFEST);
    let cache_dir = sandbox.cache_dir(MANIFEST).into_os_string();
    let runner = FakeRunner::new();

    PylintHook::new(sandbox.config(), &runner).run().unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0].virtual_env, Some(sandbox.active_venv().into_os_string()));
    assert!(calls[0].capture_output);

    assert_eq!(calls[1].virtual_env.as_ref(), Some(&cache_dir));
    assert_eq!(calls[1].pip_version_check, Some(OsString::from("1")));
    assert!(calls[1].capture_output);

    assert_eq!(calls[2].virtual_env.as_ref(), Some(&cache_dir));
    assert!(!calls[2].capture_output);
}

#[test]
#[serial]
fn test_environment_unchanged_after_run() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new().with_exit_code("pylint", 2);
    let before = env_snapshot();

    PylintHook::new(sandbox.config(), &runner).run().unwrap();

    assert_eq!(env_snapshot(), before);
}

#[test]
#[serial]
fn test_install_failure_aborts_with_its_exit_code() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new().with_exit_code("pip", 4);
    let before = env_snapshot();

    let err = PylintHook::new(sandbox.config(), &runner).run().unwrap_err();

    assert_eq!(err.exit_code(), 4);
    let message = err.user_message(false);
    assert!(message.contains(&format!(
        "command:\n\npip install -r {}",
        sandbox.requirements().display()
    )));
    assert!(message.contains("pip stderr"));
    assert_eq!(runner.count("pylint"), 0);
    assert_eq!(env_snapshot(), before);
}

#[test]
#[serial]
fn test_virtualenv_failure_aborts_before_install() {
    let sandbox = Sandbox::new(MANIFEST);
    let python = snp_pylint::environment::python_executable(&sandbox.active_venv());
    let runner = FakeRunner::new().with_exit_code(&python.to_string_lossy(), 3);

    let err = PylintHook::new(sandbox.config(), &runner).run().unwrap_err();

    assert_eq!(err.exit_code(), 3);
    assert_eq!(runner.command_lines().len(), 1);
    assert!(!sandbox.cache_dir(MANIFEST).exists());
}

#[test]
#[serial]
fn test_python_override_creates_the_venv() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new();
    let config = sandbox.config().with_python("/usr/bin/python3.12");

    PylintHook::new(config, &runner).run().unwrap();

    assert!(runner.command_lines()[0].starts_with("/usr/bin/python3.12 -m virtualenv "));
}

#[test]
#[serial]
fn test_missing_virtual_env_fails_before_side_effects() {
    let sandbox = Sandbox::new(MANIFEST);
    std::env::remove_var("VIRTUAL_ENV");
    let runner = FakeRunner::new();
    // A manifest that does not exist proves it is never read
    let config = sandbox.config().with_requirements(sandbox.root().join("absent.txt"));

    let err = PylintHook::new(config, &runner).run().unwrap_err();

    match &err {
        HookError::Config(config_err) => {
            assert!(matches!(**config_err, ConfigError::NoActiveEnvironment { .. }));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(runner.calls().is_empty());
    assert!(!sandbox.root().join("pylint_venvs").exists());
}

#[test]
#[serial]
fn test_missing_manifest_is_a_config_error() {
    let sandbox = Sandbox::new(MANIFEST);
    let runner = FakeRunner::new();
    let config = sandbox.config().with_requirements(sandbox.root().join("absent.txt"));

    let err = PylintHook::new(config, &runner).run().unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    assert!(runner.calls().is_empty());
}
