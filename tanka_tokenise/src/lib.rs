//! Adapter around an external Japanese morphological analyzer (`mecab`).
//!
//! Treats the analyzer as a deterministic text-to-text function gated by a
//! process-wide semaphore: spawn, write the input, read the CSV-per-line
//! output, parse it into [`Morpheme`]s. No connection pooling — analyzer
//! startup is cheap relative to the work the caller does with the result.

mod classify;
mod pool;

use std::process::Stdio;

use snafu::{ResultExt, Snafu};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument};

pub use crate::classify::Morpheme;
pub use crate::pool::AnalyzerPool;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    SpawnFailed { source: std::io::Error },
    WriteStdinFailed { source: std::io::Error },
    WaitFailed { source: std::io::Error },
    InvalidUtf8Output { source: std::string::FromUtf8Error },
}

/// Run `text` through the analyzer and return its morphemes.
///
/// Acquires a permit from `pool` before spawning the subprocess and
/// releases it once the subprocess has exited, on every path. An
/// unavailable or failing analyzer is not fatal here: it is logged at
/// `info` and yields an empty morpheme sequence, so the caller degrades to
/// "no tanka found" rather than propagating an error.
#[instrument(skip(text, pool), level = "debug")]
pub async fn tokenise(text: &str, pool: &AnalyzerPool) -> Vec<Morpheme> {
    let _permit = pool.acquire().await;
    match run_analyzer(text).await {
        Ok(output) => classify::parse_morphemes(&output),
        Err(err) => {
            info!(%err, "analyzer unavailable or failed, treating input as non-tanka");
            Vec::new()
        }
    }
}

async fn run_analyzer(text: &str) -> Result<String> {
    let mut child = Command::new("mecab")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context(SpawnFailedError)?;

    let mut stdin = child.stdin.take().expect("stdin was piped");
    stdin
        .write_all(text.as_bytes())
        .await
        .context(WriteStdinFailedError)?;
    drop(stdin);

    let output = child.wait_with_output().await.context(WaitFailedError)?;
    debug!(status = ?output.status, "analyzer exited");
    String::from_utf8(output.stdout).context(InvalidUtf8OutputError)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_multi_line_analyzer_output() {
        let output = "富士\t名詞,一般,*,*,*,*,富士,フジ,フジ\nEOS\n";
        let morphemes = classify::parse_morphemes(output);
        assert_eq!(morphemes.len(), 2);
        assert_eq!(morphemes[0].surface, "富士");
        assert_eq!(morphemes[1].surface, "。");
    }
}
