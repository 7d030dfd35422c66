use crate::harness::{Assertion, Scenario};
use anyhow::anyhow;
use sandbox_core::Sandbox;

#[test]
fn test_transcript_keeps_commands_and_output() {
    Scenario::new("transcript")
        .expect_ok("git init")
        .expect_fail("git commit")
        .assert(Assertion::TranscriptContains("$ git init".to_string()))
        .assert(Assertion::TranscriptContains(
            "nothing to commit, working tree clean".to_string(),
        ))
        .expect_ok("clear")
        .assert(Assertion::Custom(Box::new(|sandbox: &mut Sandbox| {
            if sandbox.transcript().is_empty() {
                Ok(())
            } else {
                Err(anyhow!("transcript not cleared"))
            }
        })))
        .run()
        .unwrap();
}

#[test]
fn test_history_builtin() {
    Scenario::new("history_builtin")
        .expect_ok("git init")
        .expect_ok("touch a.txt")
        .expect_ok("history")
        .assert_output_contains("    1  git init\n    2  touch a.txt\n    3  history")
        .run()
        .unwrap();
}

#[test]
fn test_script_step() {
    Scenario::new("script_step")
        .script(
            "# set up a repository\n\
             git init\n\
             echo hello > greeting.txt\n\
             git add .\n\
             git commit -m \"Greeting\"\n",
        )
        .assert_commit_count(1)
        .assert_file_committed("greeting.txt")
        .run()
        .unwrap();
}

#[test]
fn test_file_helpers() {
    Scenario::new("file_helpers")
        .expect_ok("echo one > notes.txt")
        .expect_ok("echo two >> notes.txt")
        .expect_ok("cat notes.txt")
        .assert_output_contains("one\ntwo")
        .expect_ok("ls")
        .assert_output_contains("notes.txt")
        .expect_fail_with("cat missing.txt", "cat: missing.txt: No such file or directory")
        .run()
        .unwrap();
}
