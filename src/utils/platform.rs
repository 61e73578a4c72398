use std::path::PathBuf;
use std::process::Command;

/// Build a direct program invocation, never through a shell.
///
/// On Windows, package managers are often `.cmd` shims (`npm.cmd`) which
/// `Command::new("npm")` does not find, so the program is resolved on PATH first.
pub fn build_program_command(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(resolve_program(program));
    cmd.args(args);
    cmd
}

#[cfg(windows)]
fn resolve_program(program: &str) -> PathBuf {
    which::which(program).unwrap_or_else(|_| PathBuf::from(program))
}

#[cfg(not(windows))]
fn resolve_program(program: &str) -> PathBuf {
    PathBuf::from(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_program_keeps_args_separate() {
        let cmd = build_program_command("echo", &["a b".to_string(), "c".to_string()]);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["a b".to_string(), "c".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn build_program_uses_program_name() {
        let cmd = build_program_command("echo", &[]);
        assert_eq!(cmd.get_program(), "echo");
    }
}
