// src/client/args.rs

/// Disables colorized output. Always the first argument.
pub const NO_ANSI: &str = "--no-ansi";

/// Disables progress indicators for install/update work.
pub const NO_PROGRESS: &str = "--no-progress";

const PROGRESS_COMMANDS: [&str; 2] = ["install", "update"];

/// Produce the argument vector that is actually passed to the executable.
///
/// `args` is kept as-is and in order; in front of it go
/// - `--no-progress` when the subcommand (first argument) is `install` or
///   `update`,
/// - then `--no-ansi`, unconditionally.
///
/// The flags are added even if the caller already passed them.
pub fn rewrite_args(args: &[String]) -> Vec<String> {
    let mut rewritten = Vec::with_capacity(args.len() + 2);
    rewritten.push(NO_ANSI.to_string());

    if args
        .first()
        .is_some_and(|sub| PROGRESS_COMMANDS.contains(&sub.as_str()))
    {
        rewritten.push(NO_PROGRESS.to_string());
    }

    rewritten.extend(args.iter().cloned());
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn require_only_gets_no_ansi() {
        assert_eq!(
            rewrite_args(&owned(&["require", "foo/bar"])),
            owned(&["--no-ansi", "require", "foo/bar"])
        );
    }

    #[test]
    fn install_and_update_get_no_progress() {
        assert_eq!(
            rewrite_args(&owned(&["install"])),
            owned(&["--no-ansi", "--no-progress", "install"])
        );
        assert_eq!(
            rewrite_args(&owned(&["update", "vendor/pkg"])),
            owned(&["--no-ansi", "--no-progress", "update", "vendor/pkg"])
        );
    }

    #[test]
    fn flags_are_added_even_when_already_present() {
        assert_eq!(
            rewrite_args(&owned(&["install", "--no-progress"])),
            owned(&["--no-ansi", "--no-progress", "install", "--no-progress"])
        );
    }

    #[test]
    fn empty_args() {
        assert_eq!(rewrite_args(&[]), owned(&["--no-ansi"]));
    }
}
