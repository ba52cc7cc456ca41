use std::path::PathBuf;
use std::process::{Command, Output};

fn backpack() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/backpack.toml")
}

fn stashgrid(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stashgrid"))
        .arg(backpack())
        .args(args)
        .output()
        .expect("failed to run stashgrid binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn show_renders_zones_and_items() {
    let output = stashgrid(&["show"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "2rxeeeex\nrrxeeeex\nxxx11333\nxxx113..\nxxx.....\n"
    );
}

#[test]
fn stow_merges_stacks_and_fills_free_space() {
    let output = stashgrid(&["stow"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(
        text.contains("merged item 4 into item 2 (now 5)"),
        "unexpected output:\n{text}"
    );
    assert!(text.contains("2rx555ex\n66xeeeex\n"), "unexpected grid:\n{text}");
}

#[test]
fn check_reports_direct_fit_without_changes() {
    let output = stashgrid(&["check", "--item", "6", "--column", "3", "--row", "0"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "fits directly\n");
}

#[test]
fn place_rearranges_colliding_items() {
    let output = stashgrid(&["place", "--item", "6", "--column", "3", "--row", "2"]);
    let text = stdout(&output);

    assert!(output.status.success(), "unexpected output:\n{text}");
    assert!(text.contains("relocated [1 -> (3, 3) @ 0]"));
    assert!(text.contains("placed item 6 at (3, 2) rotated 0 degrees"));
    assert!(text.ends_with("xxx66333\nxxx113..\nxxx11...\n"), "unexpected grid:\n{text}");
}

#[test]
fn rotate_turns_item_in_place() {
    let output = stashgrid(&["rotate", "--item", "3"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("rotated item 3 to 90 degrees at (5, 2)"));
}

#[test]
fn refused_commands_exit_with_failure() {
    let output = stashgrid(&["remove", "--item", "9"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no such item"));
}

#[test]
fn missing_scenario_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_stashgrid"))
        .args(["does-not-exist.toml", "show"])
        .output()
        .expect("failed to run stashgrid binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read scenario"));
}

#[test]
fn place_onto_matching_stack_merges_quantities() {
    let output = stashgrid(&["place", "--item", "4", "--column", "0", "--row", "0"]);
    let text = stdout(&output);

    assert!(output.status.success(), "unexpected output:\n{text}");
    assert!(text.contains("merged item 4 into item 2 (now 5)"));
    assert!(text.starts_with("merged"), "unexpected output:\n{text}");
}
