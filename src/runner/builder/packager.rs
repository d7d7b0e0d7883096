//! External packaging command construction and execution.

use crate::runner::{BuildRunContext, Error, Result, error::Context};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    process::Stdio,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    time::Instant,
};

/// Lines of packager output kept for failure diagnostics.
pub const CAPTURED_OUTPUT_LINES: usize = 200;

/// Grace period for the packager to exit after being killed.
const KILL_GRACE: Duration = Duration::from_secs(10);

/// How long output is drained after the packager exits. Helper processes it
/// leaves behind (build servers, node reuse) can hold the pipes open forever.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(30);

/// Builds the UAT argument list for one run.
///
/// ```text
/// <cook-command> -project=<root>/<name>.uproject -noP4 -platform=<platform>
///     -clientconfig=<flavor> -cook -build -stage -pak -archive
///     -archivedirectory=<output dir> [-architecture=<arch>]
/// ```
pub fn packager_args(context: &BuildRunContext, archive_dir: &Path) -> Vec<String> {
    let mut args = vec![
        context.cook_command().to_string(),
        format!("-project={}", context.uproject_path().display()),
        "-noP4".to_string(),
        format!("-platform={}", context.platform()),
        format!("-clientconfig={}", context.flavor().client_config()),
        "-cook".to_string(),
        "-build".to_string(),
        "-stage".to_string(),
        "-pak".to_string(),
        "-archive".to_string(),
        format!("-archivedirectory={}", archive_dir.display()),
    ];

    if let Some(arch) = context.architecture() {
        args.push(format!("-architecture={}", arch.as_uat_str()));
    }

    args
}

/// One invocation of the packaging tool.
#[derive(Debug, Clone)]
pub struct Packager {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Packager {
    /// Creates a packager invocation for `context` archiving into `archive_dir`.
    pub fn new(program: PathBuf, context: &BuildRunContext, archive_dir: &Path) -> Self {
        Self {
            program,
            args: packager_args(context, archive_dir),
            timeout: context.packaging_timeout(),
        }
    }

    /// Human-readable command line, for logs and errors.
    pub fn command_line(&self) -> String {
        format!("{} {}", self.program.display(), self.args.join(" "))
    }

    /// Runs the packager to completion.
    ///
    /// Output is streamed to the log as it arrives and the last
    /// [`CAPTURED_OUTPUT_LINES`] lines are returned.
    ///
    /// # Errors
    ///
    /// - [`Error::PackagerLaunch`] if the process cannot be spawned or awaited
    /// - [`Error::PackagingFailed`] on a non-zero exit, with captured output
    /// - [`Error::PackagingTimeout`] if the timeout expires; the child is killed.
    ///   The timeout also covers draining output still held open by processes
    ///   the packager left running.
    pub async fn run(&self) -> Result<Vec<String>> {
        log::info!("Running: {}", self.command_line());
        let budget = self.timeout.map(|timeout| (timeout, Instant::now() + timeout));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::PackagerLaunch {
                command: self.command_line(),
                error,
            })?;

        let tail = Arc::new(Mutex::new(VecDeque::with_capacity(CAPTURED_OUTPUT_LINES)));
        let readers = [
            child
                .stdout
                .take()
                .map(|out| tokio::spawn(capture_lines(out, Arc::clone(&tail), log::Level::Info))),
            child
                .stderr
                .take()
                .map(|err| tokio::spawn(capture_lines(err, Arc::clone(&tail), log::Level::Warn))),
        ];

        let waited = match budget {
            Some((timeout, deadline)) => {
                match tokio::time::timeout_at(deadline, child.wait()).await {
                    Ok(waited) => waited,
                    Err(_elapsed) => {
                        log::warn!(
                            "Packaging timed out after {}s, terminating...",
                            timeout.as_secs()
                        );

                        if let Err(e) = child.kill().await {
                            log::warn!("Failed to kill packager: {}", e);
                        }
                        let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;

                        for reader in readers.into_iter().flatten() {
                            reader.abort();
                        }
                        return Err(Error::PackagingTimeout { timeout });
                    }
                }
            }
            None => child.wait().await,
        };

        let status = waited.map_err(|error| Error::PackagerLaunch {
            command: self.command_line(),
            error,
        })?;

        let drain_deadline = Instant::now() + OUTPUT_DRAIN_GRACE;
        let reader_deadline = budget.map_or(drain_deadline, |(_, d)| d.min(drain_deadline));
        let mut abandoned = false;
        for mut reader in readers.into_iter().flatten() {
            match tokio::time::timeout_at(reader_deadline, &mut reader).await {
                Ok(joined) => joined.context("packager output reader panicked")?,
                Err(_elapsed) => {
                    reader.abort();
                    abandoned = true;
                }
            }
        }

        if abandoned {
            match budget {
                Some((timeout, deadline)) if deadline <= drain_deadline => {
                    log::warn!(
                        "Packager output still open after {}s, a child process outlived it",
                        timeout.as_secs()
                    );
                    return Err(Error::PackagingTimeout { timeout });
                }
                _ => log::warn!(
                    "Packager exited but its output stayed open for {}s, no longer reading it",
                    OUTPUT_DRAIN_GRACE.as_secs()
                ),
            }
        }

        let output: Vec<String> = match tail.lock() {
            Ok(mut lines) => lines.drain(..).collect(),
            Err(_) => Vec::new(),
        };

        if !status.success() {
            return Err(Error::PackagingFailed {
                code: status.code(),
                output,
            });
        }

        log::info!("Packaging finished: {}", status);
        Ok(output)
    }
}

async fn capture_lines<R>(reader: R, tail: Arc<Mutex<VecDeque<String>>>, level: log::Level)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::debug!("Packager output read error: {}", e);
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                break;
            }
        }

        let line = decode_line(&buf);
        log::log!(level, "{}", line);
        if let Ok(mut tail) = tail.lock() {
            if tail.len() == CAPTURED_OUTPUT_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
    }
}

/// Decodes one raw output line, replacing bytes that are not UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{BuildFlavor, BuildRunContextBuilder, TargetArch};

    fn context(arch: Option<TargetArch>) -> BuildRunContext {
        BuildRunContextBuilder::new()
            .project_name("MyGame")
            .project_root("/projects/MyGame")
            .output_root("/builds")
            .engine_root("/opt/UE_5.4")
            .flavor(BuildFlavor::Shipping)
            .platform("Win64")
            .architecture(arch)
            .build()
            .unwrap()
    }

    #[test]
    fn argument_list_follows_uat_contract() {
        let archive_dir = PathBuf::from("/builds/040125_shipping_001");
        let args = packager_args(&context(None), &archive_dir);

        assert_eq!(args[0], "BuildCookRun");
        assert_eq!(
            args[1],
            format!(
                "-project={}",
                PathBuf::from("/projects/MyGame/MyGame.uproject").display()
            )
        );
        assert_eq!(
            &args[2..10],
            [
                "-noP4",
                "-platform=Win64",
                "-clientconfig=Shipping",
                "-cook",
                "-build",
                "-stage",
                "-pak",
                "-archive"
            ]
        );
        assert_eq!(
            args[10],
            format!("-archivedirectory={}", archive_dir.display())
        );
        assert_eq!(args.len(), 11);
    }

    #[test]
    fn architecture_is_appended_when_set() {
        let args = packager_args(&context(Some(TargetArch::Arm64)), Path::new("/out"));
        assert_eq!(args.last().map(String::as_str), Some("-architecture=arm64"));
    }

    #[test]
    fn non_utf8_bytes_are_replaced() {
        assert_eq!(decode_line(b"Cooking caf\xe9\r\n"), "Cooking caf\u{fffd}");
        assert_eq!(decode_line(b"no newline"), "no newline");
    }

    #[tokio::test]
    async fn capture_reads_past_invalid_utf8() {
        let tail = Arc::new(Mutex::new(VecDeque::new()));
        let input: &[u8] = b"Cooking caf\xe9\nBUILD SUCCESSFUL\n";
        capture_lines(input, Arc::clone(&tail), log::Level::Info).await;

        let lines: Vec<String> = tail.lock().unwrap().iter().cloned().collect();
        assert_eq!(lines, ["Cooking caf\u{fffd}", "BUILD SUCCESSFUL"]);
    }

    #[tokio::test]
    async fn missing_program_is_a_launch_error() {
        let packager = Packager::new(
            PathBuf::from("/nonexistent/RunUAT.sh"),
            &context(None),
            Path::new("/out"),
        );
        let err = packager.run().await.unwrap_err();
        assert_eq!(err.kind(), crate::runner::ErrorKind::PackagerLaunch);
    }
}
