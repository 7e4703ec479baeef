//! Runs the `docgen` binary against fixture projects.

mod common;

use std::process::Command;

use common::{Fixture, MODULES};

fn docgen(fixture: &Fixture) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_docgen"));
    command.arg("--root").arg(fixture.root());
    command
}

#[test]
fn test_generates_every_module() {
    let fixture = Fixture::with_button();

    let output = docgen(&fixture).output().expect("failed to run docgen");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    for module in MODULES {
        assert!(fixture.output_dir().join(format!("{module}.ts")).is_file());
    }
}

#[test]
fn test_config_file_and_output_override() {
    let fixture = Fixture::with_button();
    fixture.write("docgen.toml", "output_dir = \"site/data\"\n");

    let status = docgen(&fixture).status().unwrap();
    assert!(status.success());
    assert!(fixture.path("site/data/components.ts").is_file());

    let status = docgen(&fixture).args(["--output", "public/data"]).status().unwrap();
    assert!(status.success());
    assert!(fixture.path("public/data/components.ts").is_file());
}

#[test]
fn test_failed_initial_generation_exits_with_error() {
    let fixture = Fixture::with_button();
    fixture.write(
        "components/legacy/button.tsx",
        "export function Button() { return null }\n",
    );

    let output = docgen(&fixture).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("initial generation failed"));
    assert!(stderr.contains("Duplicate slug 'button'"));
    assert!(!fixture.output_dir().exists());
}
