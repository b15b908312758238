use std::{env, fs, path::PathBuf};

// Best-effort tail of the shell history file. Read-only; any failure is an
// empty list.
pub fn recent_commands(limit: usize) -> Vec<String> {
    match history_path() {
        Some(path) => fs::read_to_string(path)
            .map(|content| tail_commands(&content, limit))
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

fn history_path() -> Option<PathBuf> {
    if let Ok(histfile) = env::var("HISTFILE") {
        if !histfile.trim().is_empty() {
            return Some(PathBuf::from(histfile));
        }
    }
    let home = dirs::home_dir()?;
    for name in [".bash_history", ".zsh_history", ".history"] {
        let path = home.join(name);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn tail_commands(content: &str, limit: usize) -> Vec<String> {
    let commands: Vec<String> = content
        .lines()
        .map(strip_zsh_timestamp)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    let skip = commands.len().saturating_sub(limit);
    commands.into_iter().skip(skip).collect()
}

// zsh extended history lines look like ": 1700000000:0;git status"
fn strip_zsh_timestamp(line: &str) -> &str {
    if line.starts_with(": ") {
        if let Some(pos) = line.find(';') {
            return &line[pos + 1..];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_entries() {
        let content = "one\ntwo\nthree\nfour\n";
        assert_eq!(tail_commands(content, 2), vec!["three", "four"]);
    }

    #[test]
    fn test_tail_skips_blank_lines() {
        let content = "one\n\n\ntwo\n";
        assert_eq!(tail_commands(content, 10), vec!["one", "two"]);
    }

    #[test]
    fn test_zsh_extended_format_is_stripped() {
        let content = ": 1700000000:0;git status\n: 1700000001:0;cargo build\n";
        assert_eq!(tail_commands(content, 10), vec!["git status", "cargo build"]);
    }
}
