//! Init and delete from the command line

use crate::common::TestProject;
use anyhow::Result;

#[test]
fn test_init_twice_fails() -> Result<()> {
    let project = TestProject::initialized()?;
    assert!(project.root().join(".pebble/project_info.json").is_file());

    let result = project.pebble(&["init", "--name", "other"]).assert_failure()?;
    assert!(result.contains_stderr("already initialized"));
    Ok(())
}

#[test]
fn test_project_names_are_unique() -> Result<()> {
    let project = TestProject::initialized()?;
    let other = project.scratch().join("other");
    std::fs::create_dir(&other)?;

    let result = project
        .pebble_in(&other, &["init", "--name", "proj"])
        .assert_failure()?;
    assert!(result.contains_stderr("already registered"));
    assert!(!other.join(".pebble").exists());
    Ok(())
}

#[test]
fn test_delete_requires_double_confirmation() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("keep.txt", "mine")?;

    let aborted = project
        .pebble(&["delete"])
        .stdin("YES\nno\n")
        .assert_success()?;
    assert!(aborted.contains_stdout("Aborted"));
    assert!(project.root().join(".pebble").is_dir());

    project
        .pebble(&["delete"])
        .stdin("YES\nYES\n")
        .assert_success()?;
    assert!(!project.root().join(".pebble").exists());
    assert_eq!(project.read("keep.txt").as_deref(), Some("mine"));

    // The name is free again
    project.pebble(&["init", "--name", "proj"]).assert_success()?;
    Ok(())
}

#[test]
fn test_commands_outside_a_project_fail() -> Result<()> {
    let project = TestProject::new()?;
    let result = project
        .pebble(&["-C", ".", "status"])
        .assert_failure()?;
    assert!(result.contains_stderr("not a pebble project"));
    Ok(())
}
