//! PDF rasterization through an external process.
//!
//! The label PDF is written to the tool's stdin and the rendered PNG is read
//! from its stdout. One process per call, bounded by a timeout.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{DEFAULT_DPI, ExternalToolError};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Default upper bound on a single rasterizer run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Converts a one-page PDF into an alpha-capable PNG.
pub trait Rasterizer: Send + Sync {
    /// Human-readable rasterizer name used in logs.
    fn name(&self) -> &str;

    /// Render `pdf` and return the encoded PNG bytes.
    fn rasterize(
        &self,
        pdf: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, ExternalToolError>> + Send;
}

/// Runs an external command that reads a document on stdin and writes a
/// PNG on stdout.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRasterizer {
    /// Create a rasterizer for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Ghostscript in quiet batch mode, `pngalpha` device at `dpi`, sandboxed,
    /// PDF on stdin and PNG on stdout.
    pub fn ghostscript(program: impl Into<String>, dpi: u32) -> Self {
        Self::new(program).with_args([
            "-q".to_string(),
            "-sDEVICE=pngalpha".to_string(),
            "-sOutputFile=%stdout%".to_string(),
            format!("-r{dpi}"),
            "-dNOPAUSE".to_string(),
            "-dBATCH".to_string(),
            "-dSAFER".to_string(),
            "-".to_string(),
        ])
    }

    /// Builder: replace the argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the command once, feeding `input` on stdin and collecting stdout.
    ///
    /// The child is killed if the timeout elapses.
    pub async fn run(&self, input: &[u8]) -> Result<Vec<u8>, ExternalToolError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            input_len = input.len(),
            "Spawning rasterizer"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExternalToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("rasterizer stdin was not captured"))?;

        // Written from a separate task so a tool that streams output while
        // still reading input cannot deadlock on a full stdout pipe.
        let payload = input.to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&payload).await;
            drop(stdin);
            result
        });

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                writer.abort();
                warn!(program = %self.program, timeout = ?self.timeout, "Rasterizer timed out");
                return Err(ExternalToolError::Timeout {
                    after: self.timeout,
                });
            }
        };

        match writer.await {
            Ok(Ok(())) => {}
            // A tool that exits without draining stdin is judged by its exit status.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(ExternalToolError::Io(e)),
            Err(e) => return Err(ExternalToolError::Io(std::io::Error::other(e))),
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(ExternalToolError::Exit {
                code: output.status.code(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!(program = %self.program, %stderr, "Rasterizer reported warnings");
        }

        debug!(output_len = output.stdout.len(), "Rasterizer finished");
        Ok(output.stdout)
    }
}

impl Default for CommandRasterizer {
    fn default() -> Self {
        Self::ghostscript("gs", DEFAULT_DPI)
    }
}

impl Rasterizer for CommandRasterizer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn rasterize(&self, pdf: &[u8]) -> Result<Vec<u8>, ExternalToolError> {
        let output = self.run(pdf).await?;
        check_png(&output)?;
        Ok(output)
    }
}

fn check_png(output: &[u8]) -> Result<(), ExternalToolError> {
    if output.is_empty() {
        return Err(ExternalToolError::MalformedOutput(
            "rasterizer wrote nothing to stdout".to_string(),
        ));
    }
    if !output.starts_with(PNG_SIGNATURE) {
        return Err(ExternalToolError::MalformedOutput(format!(
            "expected PNG data, got {} bytes without a PNG signature",
            output.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn ghostscript_arguments() {
        let gs = CommandRasterizer::ghostscript("gs", 216);
        assert_eq!(gs.program(), "gs");
        assert_eq!(
            gs.args(),
            [
                "-q",
                "-sDEVICE=pngalpha",
                "-sOutputFile=%stdout%",
                "-r216",
                "-dNOPAUSE",
                "-dBATCH",
                "-dSAFER",
                "-",
            ]
        );
        assert_eq!(gs.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn default_is_ghostscript_at_216_dpi() {
        let gs = CommandRasterizer::default();
        assert_eq!(gs.name(), "gs");
        assert!(gs.args().iter().any(|a| a == "-r216"));
    }

    #[test]
    fn check_png_rejects_empty_and_garbage() {
        assert!(matches!(
            check_png(b""),
            Err(ExternalToolError::MalformedOutput(_))
        ));
        assert!(matches!(
            check_png(b"%PDF-1.4"),
            Err(ExternalToolError::MalformedOutput(_))
        ));
        assert!(check_png(&tiny_png()).is_ok());
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let r = CommandRasterizer::new("definitely-not-a-rasterizer-7f3a");
        let err = r.rasterize(b"%PDF-1.4").await.unwrap_err();
        match err {
            ExternalToolError::Spawn { program, .. } => {
                assert_eq!(program, "definitely-not-a-rasterizer-7f3a");
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipes_stdin_to_stdout() {
        let png = tiny_png();
        let r = CommandRasterizer::new("cat");
        let out = r.rasterize(&png).await.unwrap();
        assert_eq!(out, png);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_input_does_not_deadlock() {
        let mut payload = tiny_png();
        payload.resize(4 * 1024 * 1024, 0);
        let r = CommandRasterizer::new("cat");
        let out = r.run(&payload).await.unwrap();
        assert_eq!(out.len(), payload.len());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_png_output_is_malformed() {
        let r = CommandRasterizer::new("cat");
        let err = r.rasterize(b"not an image").await.unwrap_err();
        assert!(matches!(err, ExternalToolError::MalformedOutput(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_code_and_stderr() {
        let r = CommandRasterizer::new("sh").with_args(["-c", "echo broken page >&2; exit 3"]);
        let err = r.rasterize(b"%PDF-1.4").await.unwrap_err();
        match err {
            ExternalToolError::Exit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken page");
            }
            other => panic!("expected exit error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_tool_times_out() {
        let r = CommandRasterizer::new("sleep")
            .with_args(["5"])
            .with_timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = r.rasterize(b"%PDF-1.4").await.unwrap_err();
        assert!(matches!(err, ExternalToolError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
