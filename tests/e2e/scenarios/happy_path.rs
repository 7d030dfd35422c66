use crate::harness::{Assertion, Scenario, EPOCH};
use sandbox_core::FileStatus;

#[test]
fn test_first_commit() {
    Scenario::new("first_commit")
        .expect_ok("git init")
        .expect_ok("touch a.txt")
        .assert_untracked(&["a.txt"])
        .expect_ok("git add a.txt")
        .assert_staged(&["a.txt"])
        .expect_ok("git commit -m \"first\"")
        .assert_output_contains("[main (root-commit) c1] first")
        .assert_commit_count(1)
        .assert_head_contains("first")
        .assert_status("a.txt", FileStatus::Tracked)
        .assert_staged(&[])
        .assert(Assertion::WorkingTreeClean)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_edit_stage_commit_cycle() {
    Scenario::new("edit_stage_commit_cycle")
        .expect_ok("git init")
        .commit_file("README.md", "# Project", "Add readme")
        .expect_ok("echo \"More docs\" >> README.md")
        .assert_modified(&["README.md"])
        .assert(Assertion::FileContent {
            path: "README.md".to_string(),
            content: "# Project\nMore docs".to_string(),
        })
        .expect_ok("git status")
        .assert_output_contains("modified:   README.md")
        .expect_ok("git add .")
        .assert_staged(&["README.md"])
        .expect_ok("git status")
        .assert_output_contains("Changes to be committed:")
        .expect_ok("git commit -m \"Expand readme\"")
        .assert_commit_count(2)
        .assert_history_length("main", 2)
        .assert_file_committed("README.md")
        .assert_partition()
        .run()
        .unwrap();
}

#[test]
fn test_add_dot_mixes_new_and_modified() {
    Scenario::new("add_dot_mixes_new_and_modified")
        .expect_ok("git init")
        .commit_file("a.txt", "one", "first")
        .expect_ok("echo two > a.txt")
        .expect_ok("touch b.txt src/c.txt")
        .assert_partition()
        .expect_ok("git add .")
        .assert_staged(&["a.txt", "b.txt", "src/c.txt"])
        .assert_untracked(&[])
        .assert_modified(&[])
        .expect_ok("git commit -m \"Batch\"")
        .assert_output_contains("3 files changed")
        .assert(Assertion::WorkingTreeClean)
        .run()
        .unwrap();
}

#[test]
fn test_unstage_round_trip() {
    Scenario::new("unstage_round_trip")
        .expect_ok("git init")
        .commit_file("a.txt", "one", "first")
        .expect_ok("echo two > a.txt")
        .expect_ok("touch b.txt")
        .expect_ok("git add .")
        .expect_ok("git restore --staged a.txt")
        .assert_modified(&["a.txt"])
        .assert_staged(&["b.txt"])
        .expect_ok("git reset b.txt")
        // Once a commit exists, unstaged files come back as modified
        .assert_modified(&["a.txt", "b.txt"])
        .assert_partition()
        .run()
        .unwrap();
}

#[test]
fn test_log_shows_history_newest_first() {
    Scenario::new("log_newest_first")
        .expect_ok("git init")
        .commit_file("a.txt", "1", "one")
        .wait_hours(2)
        .commit_file("b.txt", "2", "two")
        .assert(Assertion::HeadTimestamp(EPOCH + 7200))
        .expect_ok("git log --oneline")
        .assert_output_contains("c2 (HEAD -> main) two\nc1 one")
        .expect_ok("git log")
        .assert_output_contains("Author: Developer")
        .assert_output_contains("    one")
        .run()
        .unwrap();
}

#[test]
fn test_commit_all_flag() {
    Scenario::new("commit_all_flag")
        .expect_ok("git init")
        .commit_file("a.txt", "1", "one")
        .expect_ok("echo 2 > a.txt")
        .expect_ok("touch notes.txt")
        .expect_ok("git commit -am \"two\"")
        .assert_commit_count(2)
        .assert_status("a.txt", FileStatus::Tracked)
        .assert_untracked(&["notes.txt"])
        .run()
        .unwrap();
}

#[test]
fn test_quoted_messages_survive() {
    Scenario::new("quoted_messages")
        .expect_ok("git init")
        .expect_ok("touch a.txt")
        .expect_ok("git add a.txt")
        .expect_ok(r#"git commit -m "Fix \"login\" when a > b""#)
        .assert_head_contains("Fix \"login\" when a > b")
        .assert(Assertion::FileMissing {
            path: "b".to_string(),
        })
        .run()
        .unwrap();
}
