//! `git log`/`git rev-parse` subprocess invocation and streamed commit
//! parsing (spec §4.4, §6).

use crate::error::{CoreError, Result};
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Commit {
    pub sha: String,
    pub subject: String,
    pub files: Vec<String>,
}

fn sha_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{7,40}$").unwrap())
}

/// `true` iff the `git` binary is runnable and `repo_root` sits inside a
/// git working tree. A `false` here is a graceful-degradation signal, not
/// an error (spec §7 `GitUnavailable`).
pub fn is_git_available(repo_root: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(repo_root)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn rev_parse_head(repo_root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_root)
        .output()
        .map_err(|e| CoreError::GitInvocation {
            command: "git rev-parse HEAD".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(CoreError::GitInvocation {
            command: "git rev-parse HEAD".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Rejects a ref that isn't a bare hex sha in the accepted length range —
/// the only shape this module ever needs to pass to `git log`.
fn validate_sha(sha: &str) -> Result<()> {
    if sha_pattern().is_match(sha) {
        Ok(())
    } else {
        Err(CoreError::GitInvocation {
            command: format!("git log {sha}..HEAD"),
            stderr: "ref does not match [0-9a-fA-F]{7,40}".to_string(),
        })
    }
}

/// Run `git log --pretty=format:%H%n%s --name-only --diff-filter=ACMRD
/// [<since_sha>..HEAD]` and parse the streamed output into commits, newest
/// first — the order git itself emits them in.
pub fn log_commits(repo_root: &Path, since_sha: Option<&str>) -> Result<Vec<Commit>> {
    let mut args = vec![
        "log".to_string(),
        "--pretty=format:%H%n%s".to_string(),
        "--name-only".to_string(),
        "--diff-filter=ACMRD".to_string(),
    ];

    if let Some(sha) = since_sha {
        validate_sha(sha)?;
        args.push(format!("{sha}..HEAD"));
    }

    let output = Command::new("git")
        .args(&args)
        .current_dir(repo_root)
        .output()
        .map_err(|e| CoreError::GitInvocation {
            command: args.join(" "),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(CoreError::GitInvocation {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(parse_log_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Each commit is `sha\nsubject\nfile1\nfile2\n...` separated from the
/// next by a blank line. Streamed line-by-line to bound memory on large
/// histories (spec §9).
fn parse_log_output(raw: &str) -> Vec<Commit> {
    let mut commits = Vec::new();
    let mut lines = raw.lines();

    while let Some(sha_line) = lines.next() {
        if sha_line.is_empty() {
            continue;
        }
        let sha = sha_line.to_string();
        let Some(subject) = lines.next() else { break };
        let mut files = Vec::new();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            files.push(line.to_string());
        }
        commits.push(Commit {
            sha,
            subject: subject.to_string(),
            files,
        });
    }

    commits
}

/// `git log --numstat -- <file>` sampled for complexity-trend checkpoints
/// (spec §4.4). Returns `(sha, lines_added - lines_removed contribution)`
/// pairs oldest-first.
pub fn numstat_for_file(repo_root: &Path, file: &str) -> Result<Vec<(String, i64)>> {
    if file.contains("..") || file.chars().any(|c| "&|;$><`\\\"'".contains(c)) {
        return Err(CoreError::GitInvocation {
            command: format!("git log --numstat -- {file}"),
            stderr: "path contains disallowed characters".to_string(),
        });
    }

    let output = Command::new("git")
        .args(["log", "--pretty=format:%H", "--numstat", "--", file])
        .current_dir(repo_root)
        .output()
        .map_err(|e| CoreError::GitInvocation {
            command: format!("git log --numstat -- {file}"),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(CoreError::GitInvocation {
            command: format!("git log --numstat -- {file}"),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut samples = Vec::new();
    let mut current_sha: Option<String> = None;

    for line in stdout.lines() {
        if line.is_empty() {
            continue;
        }
        if sha_pattern().is_match(line) {
            current_sha = Some(line.to_string());
            continue;
        }
        let mut parts = line.split_whitespace();
        let added: i64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let removed: i64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        if let Some(sha) = current_sha.clone() {
            samples.push((sha, added - removed));
        }
    }

    samples.reverse();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_commits_separated_by_blank_line() {
        let raw = "abc123\nfirst commit\na.rs\nb.rs\n\ndef456\nsecond commit\nc.rs\n";
        let commits = parse_log_output(raw);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, "abc123");
        assert_eq!(commits[0].files, vec!["a.rs", "b.rs"]);
        assert_eq!(commits[1].subject, "second commit");
    }

    #[test]
    fn parses_commit_with_no_files() {
        let raw = "abc123\nempty commit\n";
        let commits = parse_log_output(raw);
        assert_eq!(commits.len(), 1);
        assert!(commits[0].files.is_empty());
    }

    #[test]
    fn validate_sha_rejects_non_hex() {
        assert!(validate_sha("not-a-sha").is_err());
        assert!(validate_sha("abc123d").is_ok());
    }

    #[test]
    fn non_repo_reports_git_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_git_available(dir.path()));
    }
}
