use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use super::model::Dataset;
use super::parser::{parse, ParseOptions};
use super::schema::schema_drift;

// ---------------------------------------------------------------------------
// Source – where the dataset comes from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` inputs are URLs, anything else a file path.
    pub fn parse(input: &str) -> Self {
        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(input.to_string())
        } else {
            Source::Path(PathBuf::from(input))
        }
    }

    /// Parse options implied by the file extension (or the URL's path).
    pub fn parse_options(&self) -> ParseOptions {
        match self {
            Source::Path(path) => ParseOptions::for_path(path),
            Source::Url(url) => {
                let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url.as_str());
                ParseOptions::for_path(Path::new(path))
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be retrieved. The `Display` text is what the user
/// sees.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Network response was not ok")]
    Status(StatusCode),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Fetch + decode
// ---------------------------------------------------------------------------

/// Retrieve the raw bytes of `source`.
///
/// URL requests have no timeout; a slow request is superseded by issuing a
/// new load rather than cancelled.
pub fn fetch_bytes(source: &Source) -> Result<Vec<u8>, LoadError> {
    match source {
        Source::Path(path) => std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        }),
        Source::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(None::<Duration>)
                .build()?;
            let response = client.get(url).send()?;
            if !response.status().is_success() {
                return Err(LoadError::Status(response.status()));
            }
            Ok(response.bytes()?.to_vec())
        }
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences and dropping a
/// leading byte-order mark.
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Fetch, decode and parse `source` into a [`Dataset`].
///
/// Record-level parse errors and rows that disagree with the inferred schema
/// are logged and otherwise ignored.
pub fn load_dataset(source: &Source, options: &ParseOptions) -> Result<Dataset, LoadError> {
    let text = decode(&fetch_bytes(source)?);
    let parsed = parse(&text, options);

    for err in &parsed.errors {
        log::warn!("{source}: {err}");
    }

    let dataset = Dataset::from_rows(parsed.rows);
    let drift = schema_drift(&dataset.rows, &dataset.columns);
    if !drift.is_empty() {
        log::warn!(
            "{source}: {} rows do not match the header schema (first at row {})",
            drift.len(),
            drift[0].row
        );
    }

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// Result of one background load, tagged with the generation that issued it.
#[derive(Debug)]
pub struct LoadMessage {
    pub generation: u64,
    pub result: Result<Dataset, LoadError>,
}

/// Load `source` on a worker thread and send the outcome to `tx`.
///
/// `notify` runs after the message is sent (e.g. to wake the UI). If the
/// receiver is gone the result is dropped.
pub fn spawn_load<F>(
    source: Source,
    options: ParseOptions,
    generation: u64,
    tx: Sender<LoadMessage>,
    notify: F,
) -> thread::JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::spawn(move || {
        let result = load_dataset(&source, &options);
        if tx.send(LoadMessage { generation, result }).is_err() {
            log::debug!("load #{generation} of {source} finished after its receiver closed");
            return;
        }
        notify();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::channel;

    /// Serve exactly one HTTP response on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/Nebraska%2024.csv")
    }

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            Source::parse("HTTPS://example.com/a.csv"),
            Source::Url("HTTPS://example.com/a.csv".to_string())
        );
        assert_eq!(
            Source::parse("data/plays.csv"),
            Source::Path(PathBuf::from("data/plays.csv"))
        );
    }

    #[test]
    fn url_options_ignore_query() {
        let src = Source::parse("https://example.com/plays.tsv?token=abc");
        assert_eq!(src.parse_options().delimiter, b'\t');
    }

    #[test]
    fn decode_strips_bom_and_replaces_invalid_bytes() {
        assert_eq!(decode(b"\xEF\xBB\xBFa,b"), "a,b");
        assert_eq!(decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Quarter,Play\n1,Run\n2,Pass\n1,Pass\n").unwrap();
        let src = Source::Path(file.path().to_path_buf());
        let ds = load_dataset(&src, &src.parse_options()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.distinct_values("Play"), ["Run", "Pass"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_dataset(&Source::Path(path), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn non_success_status_is_reported_verbatim() {
        let url = serve_once("404 Not Found", "");
        let err = load_dataset(&Source::Url(url), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Status(s) if s == StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Network response was not ok");
    }

    #[test]
    fn load_from_url() {
        let url = serve_once("200 OK", "Quarter,Play\n1,Run\n");
        let ds = load_dataset(&Source::Url(url), &ParseOptions::default()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].get("Play"), Some("Run"));
    }

    #[test]
    fn spawn_load_tags_generation_and_notifies() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "a\n1\n").unwrap();
        let (tx, rx) = channel();
        let (done_tx, done_rx) = channel();
        let src = Source::Path(file.path().to_path_buf());
        spawn_load(src.clone(), src.parse_options(), 7, tx, move || {
            done_tx.send(()).unwrap();
        })
        .join()
        .unwrap();
        let msg = rx.recv().unwrap();
        assert_eq!(msg.generation, 7);
        assert_eq!(msg.result.unwrap().len(), 1);
        assert!(done_rx.try_recv().is_ok());
    }

    #[test]
    fn spawn_load_survives_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        let handle = spawn_load(
            Source::Path(PathBuf::from("does/not/exist.csv")),
            ParseOptions::default(),
            1,
            tx,
            || panic!("notify must not run without a receiver"),
        );
        assert!(handle.join().is_ok());
    }
}
