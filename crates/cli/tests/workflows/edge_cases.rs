//! Edge cases: binary content, unreadable documents, locking

use crate::common::TestProject;
use anyhow::Result;
use std::fs;

#[test]
fn test_binary_files_round_trip() -> Result<()> {
    let project = TestProject::initialized()?;
    let bytes = vec![0u8, 159, 146, 150, 255, 10];
    fs::write(project.root().join("blob.bin"), &bytes)?;
    project.commit("binary")?;

    fs::write(project.root().join("blob.bin"), b"overwritten")?;
    project.commit("text now")?;

    project.pebble(&["reset"]).assert_success()?;
    assert_eq!(fs::read(project.root().join("blob.bin"))?, bytes);
    Ok(())
}

#[test]
fn test_malformed_staging_document_is_reported() -> Result<()> {
    let project = TestProject::initialized()?;
    fs::write(project.root().join(".pebble/track.json"), "{ broken")?;
    project.write("a.txt", "a")?;

    let result = project.pebble(&["throw", "-m", "x"]).assert_failure()?;
    assert!(result.contains_stderr("track.json"));
    Ok(())
}

#[test]
fn test_interrupted_update_is_replayed() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write("a.txt", "a")?;
    project.pebble(&["gather"]).assert_success()?;

    // A crash after the write-ahead record was made durable: the staging
    // document still holds the old content
    fs::write(
        project.root().join(".pebble/pending.json"),
        r#"{"writes":[{"file":"track.json","contents":{}}]}"#,
    )?;

    let result = project.pebble(&["throw", "-m", "x"]).assert_failure()?;
    assert!(result.contains_stderr("no files are staged"));
    assert!(!project.root().join(".pebble/pending.json").exists());
    Ok(())
}

#[test]
fn test_many_throws_then_reset_chain() -> Result<()> {
    let project = TestProject::initialized()?;
    let mut ids = Vec::new();
    for i in 0..6 {
        project.write("counter.txt", &i.to_string())?;
        project.write(&format!("files/f{}.txt", i), "x")?;
        ids.push(project.commit(&format!("throw {}", i))?);
    }

    for expected in (0..5).rev() {
        project.pebble(&["reset"]).assert_success()?;
        assert_eq!(project.read("counter.txt"), Some(expected.to_string()));
        assert!(!project.root().join(format!("files/f{}.txt", expected + 1)).exists());
    }

    let log = project.pebble(&["log"]).assert_success()?;
    assert!(log.contains_stdout(&ids[0]));
    assert!(!log.contains_stdout(&ids[1]));
    Ok(())
}
