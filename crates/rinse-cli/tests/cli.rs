//! Runs the `rinse` binary against files in a temporary directory.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn rinse(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rinse"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RINSE_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_single_file_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.ts"), "const f = (a: number): number => a + 1;").unwrap();

    let output = rinse(&["-t", "typescript", "a.ts"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "const f = (a) => a + 1;\n");
}

#[test]
fn test_directory_to_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/components")).unwrap();
    fs::write(
        dir.path().join("src/components/App.jsx"),
        "export const App = () => <div />;",
    )
    .unwrap();
    fs::write(dir.path().join("src/README.md"), "# not code").unwrap();

    let output = rinse(
        &["-t", "jsx,imports", "--production", "-d", "lib", "src"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let code = fs::read_to_string(dir.path().join("lib/components/App.js")).unwrap();
    assert!(code.contains("React.createElement('div', null )"), "{code}");
    assert!(code.contains("exports.App = App;"), "{code}");
    assert!(!dir.path().join("lib/README.md").exists());
}

#[test]
fn test_failure_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.js"), "let = ;").unwrap();

    let output = rinse(&["bad.js"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error transforming bad.js"), "{stderr}");
}

#[test]
fn test_conflicting_transforms_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.js"), "").unwrap();

    let output = rinse(&["-t", "typescript,flow", "a.js"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot combine flow and typescript plugins."), "{stderr}");
}
