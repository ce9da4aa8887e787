use log::{info, warn};
use reqwest::Client;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tokio::{fs, fs::File, io::AsyncWriteExt, sync::mpsc::UnboundedSender};

use crate::error::ClientResult;

/// Longest file name we suggest, in characters
const MAX_FILENAME_CHARS: usize = 200;

/// Progress reports for one save, consumed by the side panel
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    Progress { received: u64, total: Option<u64> },
    Finished(PathBuf),
    Failed(String),
}

/// Turns a video title into a file name every desktop OS accepts.
pub fn sanitize_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed: String = collapsed
        .trim_end_matches(['.', ' '])
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect();
    if trimmed.trim().is_empty() {
        "video".to_string()
    } else {
        trimmed.trim().to_string()
    }
}

/// Sibling of `dest` that receives bytes until the body is complete
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Streams `source` into `dest`, reporting progress after every chunk.
/// `dest` only appears once the whole body has been written.
pub async fn save_remote_file(
    client: Client,
    source: String,
    dest: PathBuf,
    progress_tx: UnboundedSender<SaveEvent>,
) -> ClientResult<PathBuf> {
    let mut response = client.get(&source).send().await?.error_for_status()?;
    let total = response.content_length().filter(|len| *len > 0);

    let partial = partial_path(&dest);
    let mut file = File::create(&partial).await?;
    let mut received = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        let _ = progress_tx.send(SaveEvent::Progress { received, total });
    }
    file.flush().await?;
    drop(file);
    fs::rename(&partial, &dest).await?;

    info!("saved {received} bytes from {source} to {}", dest.display());
    Ok(dest)
}

/// Runs a save to completion and reports the final state on the same channel.
pub async fn run_save(client: Client, source: String, dest: PathBuf, progress_tx: UnboundedSender<SaveEvent>) {
    let partial = partial_path(&dest);
    let final_event = match save_remote_file(client, source, dest, progress_tx.clone()).await {
        Ok(path) => SaveEvent::Finished(path),
        Err(err) => {
            warn!("save failed: {err}");
            if let Err(rm_err) = fs::remove_file(&partial).await {
                if rm_err.kind() != std::io::ErrorKind::NotFound {
                    warn!("cannot remove {}: {rm_err}", partial.display());
                }
            }
            SaveEvent::Failed(err.to_string())
        }
    };
    let _ = progress_tx.send(final_event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tokio::sync::mpsc::unbounded_channel;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn sanitize_replaces_forbidden_chars() {
        assert_eq!(sanitize_filename("AC/DC: Live? <2024>"), "AC_DC_ Live_ _2024_");
    }

    #[test]
    fn sanitize_collapses_whitespace_and_trailing_dots() {
        assert_eq!(sanitize_filename("  hello \t\n world...  "), "hello world");
    }

    #[test]
    fn sanitize_falls_back_for_empty_titles() {
        assert_eq!(sanitize_filename(""), "video");
        assert_eq!(sanitize_filename(" ... "), "video");
    }

    #[test]
    fn sanitize_limits_length() {
        assert_eq!(sanitize_filename(&"x".repeat(500)).chars().count(), MAX_FILENAME_CHARS);
    }

    #[tokio::test]
    async fn test_save_streams_body_to_disk() {
        let server = MockServer::start().await;
        let body = vec![7u8; 4096];
        Mock::given(method("GET"))
            .and(path("/file.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let (tx, mut rx) = unbounded_channel();

        run_save(Client::new(), format!("{}/file.mp4", server.uri()), dest.clone(), tx).await;

        assert_eq!(std::fs::read(&dest).unwrap(), body);
        let mut last_progress = None;
        let mut finished = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                SaveEvent::Progress { received, total } => last_progress = Some((received, total)),
                SaveEvent::Finished(path) => finished = Some(path),
                SaveEvent::Failed(reason) => panic!("unexpected failure: {reason}"),
            }
        }
        assert_eq!(last_progress, Some((4096, Some(4096))));
        assert_eq!(finished, Some(dest));
    }

    #[tokio::test]
    async fn test_save_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.mp4");
        let (tx, mut rx) = unbounded_channel();

        run_save(Client::new(), format!("{}/gone", server.uri()), dest.clone(), tx).await;

        assert!(matches!(rx.try_recv(), Ok(SaveEvent::Failed(_))));
        assert!(!dest.exists());
    }

    #[test]
    fn partial_path_keeps_the_extension() {
        assert_eq!(partial_path(Path::new("/tmp/clip.mp4")), PathBuf::from("/tmp/clip.mp4.part"));
    }

    #[tokio::test]
    async fn test_truncated_body_leaves_no_file() {
        // Announces 10000 bytes, sends 100, then hangs up
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10000\r\nConnection: close\r\n\r\n")
                .unwrap();
            stream.write_all(&[1u8; 100]).unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let (tx, mut rx) = unbounded_channel();

        run_save(Client::new(), format!("http://{addr}/clip.mp4"), dest.clone(), tx).await;
        server.join().unwrap();

        let mut failed = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                SaveEvent::Failed(_) => failed = true,
                SaveEvent::Finished(path) => panic!("truncated save finished at {}", path.display()),
                SaveEvent::Progress { .. } => {}
            }
        }
        assert!(failed);
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
