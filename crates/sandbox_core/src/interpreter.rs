//! Command interpreter turning terminal input into repository transitions.
//!
//! [`execute`] never fails and never panics: every rejected command becomes a
//! [`CommandResult`] with `success == false`, and a rejected command leaves
//! the repository exactly as it was. All preconditions are checked before
//! the first store call.

use crate::error::SandboxError;
use crate::lexer::{tokenize, Redirect, Token};
use crate::staging;
use crate::store::Repository;
use crate::types::{CommandResult, FileStatus, TerminalLine};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const NOT_A_REPOSITORY: &str =
    "fatal: not a git repository (or any of the parent directories): .git";
const PATHSPEC_NO_MATCH: &str = "fatal: pathspec did not match any files";
const EMPTY_MESSAGE: &str = "Aborting commit due to empty commit message.";

/// Git subcommands the sandbox understands.
const GIT_COMMANDS: &[&str] = &[
    "init", "status", "add", "commit", "branch", "checkout", "switch", "log", "merge", "restore",
    "reset", "help",
];

/// Interprets one line of terminal input against `repo`.
///
/// # Examples
///
/// ```
/// use sandbox_core::{execute, Repository};
///
/// let mut repo = Repository::new();
/// assert!(execute(&mut repo, "git init").success);
///
/// let again = execute(&mut repo, "git init");
/// assert!(!again.success);
/// assert_eq!(again.lines[0].text, "fatal: already a git repository");
/// ```
pub fn execute(repo: &mut Repository, input: &str) -> CommandResult {
    let result = match tokenize(input.trim()) {
        Ok(tokens) => dispatch(repo, tokens),
        Err(e) => CommandResult::fail(format!("error: {}", e)),
    };
    debug!(
        command = input.trim(),
        success = result.success,
        update_state = result.update_state,
        "interpreted command"
    );
    result
}

fn dispatch(repo: &mut Repository, tokens: Vec<Token>) -> CommandResult {
    let Some(first) = tokens.first() else {
        return CommandResult::ok(vec![]);
    };

    match first.as_word() {
        Some("git") => match words_only(&tokens[1..]) {
            Some(args) => run_git(repo, &args),
            None => CommandResult::fail("error: output redirection is only supported for echo"),
        },
        Some("echo") => run_echo(repo, &tokens[1..]),
        Some(name) => {
            let name = name.to_string();
            match words_only(&tokens[1..]) {
                Some(args) => run_shell(repo, &name, &args),
                None => CommandResult::fail("error: output redirection is only supported for echo"),
            }
        }
        None => CommandResult::fail("syntax error near unexpected token `>'"),
    }
}

/// Returns the words of `tokens`, or `None` if any redirection is present.
fn words_only(tokens: &[Token]) -> Option<Vec<String>> {
    tokens
        .iter()
        .map(|t| t.as_word().map(str::to_string))
        .collect()
}

// === Git commands ===

fn run_git(repo: &mut Repository, args: &[String]) -> CommandResult {
    let Some((cmd, rest)) = args.split_first() else {
        return CommandResult::fail_lines(vec![
            TerminalLine::error("usage: git <command> [<args>]"),
            TerminalLine::output("Run 'help' to see the supported commands."),
        ]);
    };

    if !GIT_COMMANDS.contains(&cmd.as_str()) {
        return CommandResult::fail(format!("git: '{}' is not a git command.", cmd));
    }
    if cmd != "init" && cmd != "help" && !repo.is_initialized() {
        return CommandResult::fail(NOT_A_REPOSITORY);
    }

    match cmd.as_str() {
        "init" => git_init(repo),
        "status" => git_status(repo),
        "add" => git_add(repo, rest),
        "commit" => git_commit(repo, rest),
        "branch" => git_branch(repo, rest),
        "checkout" => git_checkout(repo, rest, "-b"),
        "switch" => git_checkout(repo, rest, "-c"),
        "log" => git_log(repo, rest),
        "merge" => git_merge(repo, rest),
        "restore" => git_restore(repo, rest),
        "reset" => git_reset(repo, rest),
        _ => help(),
    }
}

fn git_init(repo: &mut Repository) -> CommandResult {
    if repo.is_initialized() {
        return CommandResult::fail("fatal: already a git repository");
    }
    repo.init();
    CommandResult::changed(vec![TerminalLine::success(
        "Initialized empty Git repository in /sandbox/.git/",
    )])
}

fn git_status(repo: &Repository) -> CommandResult {
    let state = repo.state_ref();
    let history = repo.head_history();
    let committed: BTreeSet<&str> = history
        .iter()
        .flat_map(|c| c.tree.keys().map(String::as_str))
        .collect();

    let mut lines = vec![TerminalLine::output(format!(
        "On branch {}",
        state.current_branch
    ))];

    if history.is_empty() {
        lines.push(TerminalLine::output(""));
        lines.push(TerminalLine::output("No commits yet"));
    }

    let staged = state.staged();
    if !staged.is_empty() {
        lines.push(TerminalLine::output(""));
        lines.push(TerminalLine::output("Changes to be committed:"));
        lines.push(TerminalLine::output(
            "  (use \"git restore --staged <file>...\" to unstage)",
        ));
        for path in staged {
            let label = if committed.contains(path) {
                "modified:"
            } else {
                "new file:"
            };
            lines.push(TerminalLine::success(format!("        {:<12}{}", label, path)));
        }
    }

    let mut unstaged: Vec<(&str, &str)> = state
        .modified()
        .into_iter()
        .map(|p| ("modified:", p))
        .collect();
    unstaged.extend(
        state
            .paths_with_status(FileStatus::Deleted)
            .into_iter()
            .map(|p| ("deleted:", p)),
    );
    if !unstaged.is_empty() {
        lines.push(TerminalLine::output(""));
        lines.push(TerminalLine::output("Changes not staged for commit:"));
        lines.push(TerminalLine::output(
            "  (use \"git add <file>...\" to update what will be committed)",
        ));
        for (label, path) in unstaged {
            lines.push(TerminalLine::error(format!("        {:<12}{}", label, path)));
        }
    }

    let untracked = state.untracked();
    if !untracked.is_empty() {
        lines.push(TerminalLine::output(""));
        lines.push(TerminalLine::output("Untracked files:"));
        lines.push(TerminalLine::output(
            "  (use \"git add <file>...\" to include in what will be committed)",
        ));
        for path in untracked {
            lines.push(TerminalLine::error(format!("        {}", path)));
        }
    }

    if state.is_clean() {
        lines.push(TerminalLine::output(""));
        if history.is_empty() {
            lines.push(TerminalLine::output(
                "nothing to commit (create/copy files and use \"git add\" to track)",
            ));
        } else {
            lines.push(TerminalLine::output("nothing to commit, working tree clean"));
        }
    }

    CommandResult::ok(lines)
}

fn git_add(repo: &mut Repository, args: &[String]) -> CommandResult {
    let specs: Vec<String> = args
        .iter()
        .filter(|a| !matches!(a.as_str(), "-A" | "--all"))
        .cloned()
        .collect();
    // `git add -A` behaves like `git add .` here
    let specs = if specs.is_empty() && !args.is_empty() {
        vec![".".to_string()]
    } else {
        specs
    };

    if specs.is_empty() {
        return CommandResult::fail_lines(vec![
            TerminalLine::error("Nothing specified, nothing added."),
            TerminalLine::output("hint: Maybe you wanted to say 'git add .'?"),
        ]);
    }

    let state = repo.state_ref();
    let resolved = staging::resolve_pathspecs(state, &specs);
    let to_stage: Vec<String> = staging::stageable(state, &resolved)
        .into_iter()
        .map(str::to_string)
        .collect();

    if to_stage.is_empty() {
        return CommandResult::fail(PATHSPEC_NO_MATCH);
    }

    let lines: Vec<TerminalLine> = resolved
        .iter()
        .filter(|p| !state.files.contains_key(p.as_str()))
        .map(|p| TerminalLine::error(format!("warning: pathspec '{}' did not match any files", p)))
        .collect();

    for path in &to_stage {
        repo.stage_file(path);
    }
    CommandResult::changed(lines)
}

/// Options accepted by `git commit`.
#[derive(Debug, Default)]
struct CommitArgs {
    messages: Vec<String>,
    all: bool,
}

fn parse_commit_args(args: &[String]) -> Result<CommitArgs, String> {
    let mut parsed = CommitArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-m" | "--message" => match iter.next() {
                Some(msg) => parsed.messages.push(msg.clone()),
                None => return Err(format!("error: switch `{}' requires a value", arg)),
            },
            "-a" | "--all" => parsed.all = true,
            "-am" => {
                parsed.all = true;
                match iter.next() {
                    Some(msg) => parsed.messages.push(msg.clone()),
                    None => return Err("error: switch `m' requires a value".to_string()),
                }
            }
            other => {
                if let Some(msg) = other.strip_prefix("--message=") {
                    parsed.messages.push(msg.to_string());
                } else if let Some(msg) = other.strip_prefix("-m") {
                    parsed.messages.push(msg.to_string());
                } else if let Some(opt) = other.strip_prefix("--") {
                    return Err(format!("error: unknown option `{}'", opt));
                } else {
                    return Err(format!(
                        "error: pathspec '{}' did not match any file(s) known to git",
                        other
                    ));
                }
            }
        }
    }

    Ok(parsed)
}

fn git_commit(repo: &mut Repository, args: &[String]) -> CommandResult {
    let parsed = match parse_commit_args(args) {
        Ok(parsed) => parsed,
        Err(message) => return CommandResult::fail(message),
    };

    let state = repo.state_ref();
    let auto_staged: Vec<String> = if parsed.all {
        state.modified().into_iter().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    if state.staged().is_empty() && auto_staged.is_empty() {
        let message = if state.is_clean() {
            "nothing to commit, working tree clean"
        } else {
            "nothing to commit (use \"git add\" to stage changes)"
        };
        return CommandResult::fail(message);
    }

    let message = parsed
        .messages
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if message.is_empty() {
        return CommandResult::fail(EMPTY_MESSAGE);
    }

    let is_root = repo.state_ref().head.is_none();
    let branch = repo.state_ref().current_branch.clone();

    let prior: Vec<(String, String, FileStatus)> = auto_staged
        .iter()
        .filter_map(|path| repo.get_file(path))
        .map(|file| (file.path.clone(), file.content.clone(), file.status))
        .collect();
    for path in &auto_staged {
        repo.stage_file(path);
    }

    match repo.create_commit(&message, None) {
        Ok(sha) => {
            let file_count = repo
                .state_ref()
                .commit(&sha)
                .map(|c| c.files.len())
                .unwrap_or_default();
            let summary = message.lines().next().unwrap_or_default();
            let root = if is_root { " (root-commit)" } else { "" };
            CommandResult::changed(vec![
                TerminalLine::success(format!("[{}{} {}] {}", branch, root, sha.short(), summary)),
                TerminalLine::output(format!(
                    " {} file{} changed",
                    file_count,
                    if file_count == 1 { "" } else { "s" }
                )),
            ])
        }
        Err(e) => {
            // Put auto-staged files back exactly as they were
            for (path, content, status) in prior {
                repo.set_file(&path, &content, Some(status));
            }
            store_failure(e)
        }
    }
}

fn git_branch(repo: &mut Repository, args: &[String]) -> CommandResult {
    match args {
        [] => list_branches(repo),
        [flag] if matches!(flag.as_str(), "-a" | "--all" | "-l" | "--list") => list_branches(repo),
        [name] => {
            if let Err(message) = validate_branch_name(name) {
                return CommandResult::fail(message);
            }
            if !repo.create_branch(name) {
                return CommandResult::fail(branch_exists(name));
            }
            CommandResult::changed(vec![])
        }
        _ => CommandResult::fail("usage: git branch [<branchname>]"),
    }
}

fn list_branches(repo: &Repository) -> CommandResult {
    let state = repo.state_ref();
    let lines = state
        .branches
        .iter()
        .map(|b| {
            if b.name == state.current_branch {
                TerminalLine::success(format!("* {}", b.name))
            } else {
                TerminalLine::output(format!("  {}", b.name))
            }
        })
        .collect();
    CommandResult::ok(lines)
}

fn git_checkout(repo: &mut Repository, args: &[String], create_flag: &str) -> CommandResult {
    match args {
        [flag, name] if flag == create_flag => {
            if let Err(message) = validate_branch_name(name) {
                return CommandResult::fail(message);
            }
            if !repo.create_branch(name) {
                return CommandResult::fail(branch_exists(name));
            }
            repo.switch_branch(name);
            CommandResult::changed(vec![TerminalLine::success(format!(
                "Switched to a new branch '{}'",
                name
            ))])
        }
        [flag] if flag == create_flag => {
            CommandResult::fail(format!("error: switch `{}' requires a value", &flag[1..]))
        }
        [name] => {
            if repo.state_ref().branch(name).is_none() {
                return CommandResult::fail(branch_not_found(name));
            }
            if repo.state_ref().current_branch == *name {
                return CommandResult::ok(vec![TerminalLine::output(format!(
                    "Already on '{}'",
                    name
                ))]);
            }
            repo.switch_branch(name);
            CommandResult::changed(vec![TerminalLine::success(format!(
                "Switched to branch '{}'",
                name
            ))])
        }
        [] => CommandResult::fail("fatal: missing branch name"),
        _ => CommandResult::fail(format!(
            "usage: git checkout [{} <new-branch> | <branch>]",
            create_flag
        )),
    }
}

fn git_log(repo: &Repository, args: &[String]) -> CommandResult {
    let mut oneline = false;
    for arg in args {
        match arg.as_str() {
            "--oneline" => oneline = true,
            other => return CommandResult::fail(format!("fatal: unrecognized argument: {}", other)),
        }
    }

    let state = repo.state_ref();
    let history = repo.branch_commits(&state.current_branch);
    if history.is_empty() {
        return CommandResult::fail("No commits yet");
    }

    let mut lines = Vec::new();
    for (i, commit) in history.iter().rev().enumerate() {
        let decoration = if i == 0 {
            format!(" (HEAD -> {})", state.current_branch)
        } else {
            String::new()
        };

        if oneline {
            let summary = commit.message.lines().next().unwrap_or_default();
            lines.push(TerminalLine::output(format!(
                "{}{} {}",
                commit.sha.short(),
                decoration,
                summary
            )));
            continue;
        }

        if i > 0 {
            lines.push(TerminalLine::output(""));
        }
        lines.push(TerminalLine::success(format!(
            "commit {}{}",
            commit.sha, decoration
        )));
        lines.push(TerminalLine::output(format!("Author: {}", commit.author)));
        lines.push(TerminalLine::output(format!(
            "Date:   {}",
            commit.date.format("%a %b %-d %H:%M:%S %Y %z")
        )));
        lines.push(TerminalLine::output(""));
        for line in commit.message.lines() {
            lines.push(TerminalLine::output(format!("    {}", line)));
        }
    }

    CommandResult::ok(lines)
}

fn git_merge(repo: &mut Repository, args: &[String]) -> CommandResult {
    let [name] = args else {
        return CommandResult::fail("usage: git merge <branch>");
    };
    if repo.state_ref().branch(name).is_none() {
        return CommandResult::fail(branch_not_found(name));
    }

    let into = repo.state_ref().current_branch.clone();
    match repo.merge_branch(name) {
        Ok(sha) => CommandResult::changed(vec![
            TerminalLine::output("Merge made by the 'ort' strategy."),
            TerminalLine::success(format!(
                "[{} {}] Merge branch '{}'",
                into,
                sha.short(),
                name
            )),
        ]),
        Err(e) => store_failure(e),
    }
}

fn git_restore(repo: &mut Repository, args: &[String]) -> CommandResult {
    match args.split_first() {
        Some((flag, paths)) if flag == "--staged" || flag == "-S" => unstage_paths(repo, paths),
        _ => CommandResult::fail("error: only 'git restore --staged <file>...' is supported"),
    }
}

fn git_reset(repo: &mut Repository, args: &[String]) -> CommandResult {
    let paths = match args.split_first() {
        Some((first, rest)) if first == "HEAD" => rest,
        Some((first, _)) if first.starts_with('-') => {
            return CommandResult::fail(format!(
                "error: '{}' is not supported; use 'git reset <file>' to unstage",
                first
            ));
        }
        _ => args,
    };

    if paths.is_empty() {
        let all: Vec<String> = repo
            .state_ref()
            .staged()
            .into_iter()
            .map(str::to_string)
            .collect();
        if all.is_empty() {
            return CommandResult::ok(vec![]);
        }
        return unstage_paths(repo, &all);
    }
    unstage_paths(repo, paths)
}

fn unstage_paths(repo: &mut Repository, specs: &[String]) -> CommandResult {
    if specs.is_empty() {
        return CommandResult::fail("fatal: you must specify path(s) to restore");
    }

    let state = repo.state_ref();
    let staged: BTreeSet<&str> = state.staged().into_iter().collect();
    let mut targets = Vec::new();
    for spec in specs {
        if spec == "." {
            targets.extend(staged.iter().map(|p| p.to_string()));
        } else {
            let path = staging::normalize_path(spec);
            if staged.contains(path.as_str()) {
                targets.push(path);
            }
        }
    }
    targets.sort();
    targets.dedup();

    if targets.is_empty() {
        return CommandResult::fail(format!(
            "error: pathspec '{}' did not match any staged files",
            specs.join(" ")
        ));
    }

    for path in &targets {
        repo.unstage_file(path);
    }
    CommandResult::changed(vec![])
}

// === Shell commands ===

fn run_echo(repo: &mut Repository, tokens: &[Token]) -> CommandResult {
    let mut words = Vec::new();
    let mut redirect = None;
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Word(w) if redirect.is_none() => words.push(w.as_str()),
            Token::Word(_) => {
                return CommandResult::fail("echo: only one output file is supported");
            }
            Token::Redirect(mode) => match iter.next() {
                Some(Token::Word(path)) if redirect.is_none() => {
                    redirect = Some((*mode, path.as_str()))
                }
                Some(Token::Word(_)) => {
                    return CommandResult::fail("echo: only one output file is supported");
                }
                Some(Token::Redirect(_)) => {
                    return CommandResult::fail("syntax error near unexpected token `>'");
                }
                None => {
                    return CommandResult::fail("syntax error near unexpected token `newline'");
                }
            },
        }
    }

    let text = words.join(" ");
    let Some((mode, path)) = redirect else {
        return CommandResult::ok(vec![TerminalLine::output(text)]);
    };

    let path = staging::normalize_path(path);
    if path.is_empty() || path.ends_with('/') {
        return CommandResult::fail(format!("echo: {}: Is a directory", path));
    }

    let content = match (mode, repo.get_file(&path)) {
        (Redirect::Append, Some(existing)) if !existing.content.is_empty() => {
            format!("{}\n{}", existing.content, text)
        }
        _ => text,
    };
    repo.set_file(&path, &content, None);
    CommandResult::changed(vec![])
}

fn run_shell(repo: &mut Repository, name: &str, args: &[String]) -> CommandResult {
    match name {
        "touch" => touch(repo, args),
        "ls" => ls(repo),
        "cat" => cat(repo, args),
        "help" => help(),
        other => CommandResult::fail(format!("command not found: {}", other)),
    }
}

fn touch(repo: &mut Repository, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::fail("touch: missing file operand");
    }
    if let Some(bad) = args.iter().find(|p| p.ends_with('/')) {
        return CommandResult::fail(format!(
            "touch: cannot touch '{}': Is a directory",
            bad
        ));
    }

    let mut created = false;
    for path in args {
        if repo.get_file(&staging::normalize_path(path)).is_none() {
            repo.set_file(path, "", None);
            created = true;
        }
    }

    if created {
        CommandResult::changed(vec![])
    } else {
        CommandResult::ok(vec![])
    }
}

fn ls(repo: &Repository) -> CommandResult {
    let lines = repo
        .state_ref()
        .files
        .values()
        .map(|f| TerminalLine::output(f.path.clone()))
        .collect();
    CommandResult::ok(lines)
}

fn cat(repo: &Repository, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::fail("cat: missing operand");
    }

    let mut lines = Vec::new();
    let mut success = true;
    for path in args {
        match repo.get_file(&staging::normalize_path(path)) {
            Some(file) => lines.extend(file.content.lines().map(|l| TerminalLine::output(l))),
            None => {
                success = false;
                lines.push(TerminalLine::error(format!(
                    "cat: {}: No such file or directory",
                    path
                )));
            }
        }
    }

    if success {
        CommandResult::ok(lines)
    } else {
        CommandResult::fail_lines(lines)
    }
}

fn help() -> CommandResult {
    let entries = [
        ("git init", "Create an empty repository"),
        ("git status", "Show staged, modified and untracked files"),
        ("git add <path>... | .", "Stage changes"),
        ("git commit -m \"<message>\"", "Record staged changes"),
        ("git branch [<name>]", "List branches or create one"),
        ("git checkout [-b] <name>", "Switch branches"),
        ("git switch [-c] <name>", "Switch branches"),
        ("git log [--oneline]", "Show history of the current branch"),
        ("git merge <name>", "Merge a branch into the current one"),
        ("git restore --staged <path>", "Unstage a file"),
        ("touch <path>...", "Create empty files"),
        ("echo <text> [> | >> <path>]", "Print text or write it to a file"),
        ("ls / cat <path>", "List files / print a file"),
        ("clear / history", "Clear the terminal / list entered commands"),
    ];
    let lines = entries
        .iter()
        .map(|(usage, about)| TerminalLine::output(format!("  {:<30}{}", usage, about)))
        .collect();
    CommandResult::ok(lines)
}

// === Helpers ===

fn validate_branch_name(name: &str) -> Result<(), String> {
    let invalid = name.is_empty()
        || name.starts_with('-')
        || name.starts_with('/')
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("..")
        || name == "HEAD"
        || name
            .chars()
            .any(|c| matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\') || c.is_control());
    if invalid {
        Err(format!("fatal: '{}' is not a valid branch name.", name))
    } else {
        Ok(())
    }
}

fn branch_exists(name: &str) -> String {
    format!("fatal: A branch named '{}' already exists.", name)
}

fn branch_not_found(name: &str) -> String {
    format!("fatal: branch '{}' not found", name)
}

/// Renders a store error that slipped past the interpreter's own checks.
fn store_failure(error: SandboxError) -> CommandResult {
    warn!(error = %error, "store rejected a pre-checked command");
    let mut lines = vec![TerminalLine::error(format!("error: {}", error))];
    if let Some(hint) = error.recovery_suggestion() {
        lines.push(TerminalLine::output(format!("hint: {}", hint)));
    }
    CommandResult::fail_lines(lines)
}
