use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Runs `program` and returns its stdout.
///
/// The child is killed if the returned future is dropped, so a collector
/// timeout does not leave stray processes behind. Stdin is not inherited;
/// ours carries the bar's click events.
pub(crate) async fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to run {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{program} exited with {}: {}", output.status, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stdout_on_success() {
        let out = run("sh", &["-c", "echo hello"]).await.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[tokio::test]
    async fn nonzero_exit_reports_status_and_stderr() {
        let err = run("sh", &["-c", "echo nope >&2; exit 3"]).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("sh exited with"), "{message}");
        assert!(message.contains('3'), "{message}");
        assert!(message.ends_with("nope"), "{message}");
    }

    #[tokio::test]
    async fn missing_program_reports_spawn_failure() {
        let err = run("i3jazz-no-such-program", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to run i3jazz-no-such-program");
        assert!(err.root_cause().downcast_ref::<std::io::Error>().is_some());
    }
}
