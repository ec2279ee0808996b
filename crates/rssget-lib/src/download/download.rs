use super::content_disposition::{base_file_name, parse_content_disposition};
use super::types::EnclosureOutcome;
use crate::feed::{Enclosure, FeedItem};
use crate::session::Session;
use eyre::{Result, WrapErr};
use reqwest::header::CONTENT_DISPOSITION;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Downloads every enclosure of `item` into `destination`, one at a time.
///
/// Failures never abort the item; each enclosure reports its own outcome.
pub async fn download_item(
    item: &FeedItem,
    session: &Session,
    destination: &Path,
) -> Vec<EnclosureOutcome> {
    info!(title = %item.title, enclosures = item.enclosures.len(), "Fetching");

    let mut outcomes = Vec::with_capacity(item.enclosures.len());
    for enclosure in &item.enclosures {
        outcomes.push(download_enclosure(enclosure, session, destination).await);
    }
    outcomes
}

/// Fetches one enclosure and stores it under the name the server suggests in
/// `Content-Disposition`.
///
/// An existing file with that name is left untouched and the response body is
/// never read. New files appear atomically: the body is streamed into a
/// temporary file next to the destination and only renamed into place once
/// complete.
pub async fn download_enclosure(
    enclosure: &Enclosure,
    session: &Session,
    destination: &Path,
) -> EnclosureOutcome {
    let failed = |reason: String| {
        warn!(url = %enclosure.url, "Skipping enclosure: {}", reason);
        EnclosureOutcome::Failed {
            url: enclosure.url.clone(),
            reason,
        }
    };

    let url = match session.feed_url().join(&enclosure.url) {
        Ok(url) => url,
        Err(e) => return failed(format!("invalid enclosure URL: {}", e)),
    };

    let response = match session.client().get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return failed(format!("could not get enclosure: {}", e)),
    };

    let status = response.status();
    if !status.is_success() {
        return failed(format!("server returned HTTP {}", status));
    }

    let Some(header) = response.headers().get(CONTENT_DISPOSITION) else {
        return failed("response has no Content-Disposition header".to_string());
    };
    // Servers commonly send raw UTF-8 filenames, which `to_str` rejects.
    let header = String::from_utf8_lossy(header.as_bytes());
    let Some(suggested) = parse_content_disposition(&header) else {
        return failed(format!("no filename in Content-Disposition {:?}", header));
    };
    let Some(file_name) = base_file_name(&suggested) else {
        return failed(format!("unusable filename {:?}", suggested));
    };

    let output_path = destination.join(&file_name);
    if output_path.exists() {
        info!(url = %url, output = %output_path.display(), "Already exists, skipping");
        return EnclosureOutcome::AlreadyExists { path: output_path };
    }

    info!(url = %url, output = %output_path.display(), "Storing");
    match store_body(response, destination, &output_path).await {
        Ok(bytes) => {
            info!(output = %output_path.display(), bytes, "Stored");
            EnclosureOutcome::Stored {
                path: output_path,
                bytes,
            }
        }
        Err(err) => failed(format!("{:#}", err)),
    }
}

async fn store_body(
    mut response: reqwest::Response,
    destination: &Path,
    output_path: &Path,
) -> Result<u64> {
    tokio::fs::create_dir_all(destination)
        .await
        .wrap_err_with(|| format!("Failed to create directory: {}", destination.display()))?;

    // Removed on drop unless persisted.
    let (file, temp_path) = tempfile::Builder::new()
        .prefix(".rssget-")
        .suffix(".part")
        .tempfile_in(destination)
        .wrap_err_with(|| format!("Failed to create temporary file in {}", destination.display()))?
        .into_parts();

    let mut writer = tokio::io::BufWriter::new(tokio::fs::File::from_std(file));
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .wrap_err("Failed to read response body")?
    {
        writer
            .write_all(&chunk)
            .await
            .wrap_err_with(|| format!("Failed to write to {}", temp_path.display()))?;
        written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .wrap_err_with(|| format!("Failed to flush {}", temp_path.display()))?;
    writer
        .into_inner()
        .sync_all()
        .await
        .wrap_err_with(|| format!("Failed to sync {}", temp_path.display()))?;

    temp_path
        .persist_noclobber(output_path)
        .wrap_err_with(|| format!("Failed to move download into {}", output_path.display()))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HttpOptions;
    use reqwest::header::HeaderValue;
    use tokio::io::AsyncReadExt;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn session_for(server: &MockServer) -> Session {
        let url = Url::parse(&format!("{}/rss", server.uri())).unwrap();
        Session::new(url, "", &HttpOptions::default()).unwrap()
    }

    fn enclosure(server: &MockServer, route: &str) -> Enclosure {
        Enclosure {
            url: format!("{}{}", server.uri(), route),
        }
    }

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".rssget-"))
            .collect()
    }

    #[tokio::test]
    async fn test_download_stores_file_under_suggested_name() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/1",
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="ep1.mkv""#)
                .set_body_bytes(b"episode one".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();

        let outcome =
            download_enclosure(&enclosure(&server, "/download/1"), &session_for(&server), dir.path())
                .await;

        let expected = dir.path().join("ep1.mkv");
        assert_eq!(
            outcome,
            EnclosureOutcome::Stored {
                path: expected.clone(),
                bytes: 11
            }
        );
        assert_eq!(std::fs::read(&expected).unwrap(), b"episode one");
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_download_skips_existing_file() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/1",
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=ep1.mkv")
                .set_body_bytes(b"new content".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("ep1.mkv");
        std::fs::write(&existing, b"old content").unwrap();

        let outcome =
            download_enclosure(&enclosure(&server, "/download/1"), &session_for(&server), dir.path())
                .await;

        assert_eq!(outcome, EnclosureOutcome::AlreadyExists { path: existing.clone() });
        assert_eq!(std::fs::read(&existing).unwrap(), b"old content");
    }

    #[tokio::test]
    async fn test_download_strips_directories_from_suggested_name() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/2",
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", r#"attachment; filename="../../evil/ep2.mkv""#)
                .set_body_bytes(b"two".to_vec()),
        )
        .await;
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("shows");

        let outcome =
            download_enclosure(&enclosure(&server, "/download/2"), &session_for(&server), &dir).await;

        assert!(outcome.is_stored());
        assert!(dir.join("ep2.mkv").exists());
        assert!(!root.path().join("evil").exists());
    }

    #[tokio::test]
    async fn test_download_without_content_disposition_is_skipped() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/3",
            ResponseTemplate::new(200).set_body_bytes(b"anonymous".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();

        let outcome =
            download_enclosure(&enclosure(&server, "/download/3"), &session_for(&server), dir.path())
                .await;

        assert!(matches!(outcome, EnclosureOutcome::Failed { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_error_status_is_skipped() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/4",
            ResponseTemplate::new(404)
                .insert_header("Content-Disposition", "attachment; filename=ep4.mkv"),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();

        let outcome =
            download_enclosure(&enclosure(&server, "/download/4"), &session_for(&server), dir.path())
                .await;

        assert!(matches!(outcome, EnclosureOutcome::Failed { ref reason, .. } if reason.contains("404")));
        assert!(!dir.path().join("ep4.mkv").exists());
    }

    #[tokio::test]
    async fn test_download_relative_enclosure_url_resolves_against_feed() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/files/5",
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=ep5.mkv")
                .set_body_bytes(b"five".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let relative = Enclosure {
            url: "/files/5".to_string(),
        };

        let outcome = download_enclosure(&relative, &session_for(&server), dir.path()).await;

        assert!(outcome.is_stored());
    }

    #[tokio::test]
    async fn test_download_item_continues_after_failure() {
        let server = MockServer::start().await;
        serve(&server, "/bad", ResponseTemplate::new(500)).await;
        serve(
            &server,
            "/good",
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=good.mkv")
                .set_body_bytes(b"ok".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let item = FeedItem {
            title: "Foo S01E01 720p".to_string(),
            enclosures: vec![enclosure(&server, "/bad"), enclosure(&server, "/good")],
        };

        let outcomes = download_item(&item, &session_for(&server), dir.path()).await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], EnclosureOutcome::Failed { .. }));
        assert!(outcomes[1].is_stored());
    }

    #[tokio::test]
    async fn test_download_accepts_utf8_filename() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/download/6",
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    HeaderValue::from_bytes("attachment; filename=\"Café.mkv\"".as_bytes()).unwrap(),
                )
                .set_body_bytes(b"six".to_vec()),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();

        let outcome =
            download_enclosure(&enclosure(&server, "/download/6"), &session_for(&server), dir.path())
                .await;

        let expected = dir.path().join("Café.mkv");
        assert_eq!(
            outcome,
            EnclosureOutcome::Stored {
                path: expected.clone(),
                bytes: 3
            }
        );
        assert_eq!(std::fs::read(&expected).unwrap(), b"six");
    }

    #[tokio::test]
    async fn test_download_truncated_body_leaves_no_file() {
        // Announces 1000 bytes, sends 7, then closes the connection.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\n\
                      Content-Disposition: attachment; filename=cut.mkv\r\n\
                      Content-Length: 1000\r\n\
                      \r\n\
                      partial",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let feed_url = Url::parse(&format!("http://{}/rss", address)).unwrap();
        let session = Session::new(feed_url, "", &HttpOptions::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let cut = Enclosure {
            url: format!("http://{}/cut", address),
        };

        let outcome = download_enclosure(&cut, &session, dir.path()).await;

        assert!(matches!(outcome, EnclosureOutcome::Failed { .. }), "{:?}", outcome);
        assert!(!dir.path().join("cut.mkv").exists());
        assert!(leftover_temp_files(dir.path()).is_empty());
    }
}
