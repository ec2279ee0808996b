use eyre::Result;
use rssget_lib::config::{Config, Task};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A feed item served by [`start_tracker`]; `file_name` is announced through
/// `Content-Disposition` when its enclosure is fetched.
pub struct TrackerItem {
    pub title: &'static str,
    pub file_name: &'static str,
    pub body: &'static str,
}

pub const TRACKER_ITEMS: &[TrackerItem] = &[
    TrackerItem {
        title: "Foo S01E01 720p WEB",
        file_name: "Foo.S01E01.720p.mkv",
        body: "foo episode one",
    },
    TrackerItem {
        title: "Foo S01E01 1080p WEB",
        file_name: "Foo.S01E01.1080p.mkv",
        body: "foo episode one, bigger",
    },
    TrackerItem {
        title: "Bar S02E05 720p HDTV",
        file_name: "Bar.S02E05.720p.mkv",
        body: "bar episode five",
    },
    TrackerItem {
        title: "Foobar S01E01 720p",
        file_name: "Foobar.S01E01.720p.mkv",
        body: "not foo",
    },
];

pub fn feed_document(base_uri: &str) -> String {
    let items: String = TRACKER_ITEMS
        .iter()
        .enumerate()
        .map(|(id, item)| {
            format!(
                r#"<item><title>{}</title><enclosure url="{}/download/{}" length="{}" type="application/x-matroska"/></item>"#,
                item.title,
                base_uri,
                id,
                item.body.len()
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Tracker</title><link>{}</link><description>Latest</description>{}</channel></rss>"#,
        base_uri, items
    )
}

/// Starts a tracker serving `/rss` and one `/download/<n>` per item.
///
/// With `cookie` set, every route only answers requests presenting exactly
/// that `Cookie` header; anything else falls through to wiremock's 404.
pub async fn start_tracker(cookie: Option<&str>) -> MockServer {
    let server = MockServer::start().await;

    let with_cookie = |mock: wiremock::MockBuilder| match cookie {
        Some(cookie) => mock.and(header("cookie", cookie)),
        None => mock,
    };

    with_cookie(Mock::given(method("GET")).and(path("/rss")))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_document(&server.uri())))
        .mount(&server)
        .await;

    for (id, item) in TRACKER_ITEMS.iter().enumerate() {
        with_cookie(Mock::given(method("GET")).and(path(format!("/download/{}", id))))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "Content-Disposition",
                        format!("attachment; filename=\"{}\"", item.file_name).as_str(),
                    )
                    .set_body_string(item.body),
            )
            .mount(&server)
            .await;
    }

    server
}

pub fn create_test_task(server: &MockServer, download: &Path, shows: &[&str]) -> Task {
    Task {
        title: "Test tracker".to_string(),
        rss: format!("{}/rss", server.uri()),
        cookies: String::new(),
        quality: "720p".to_string(),
        download: download.to_path_buf(),
        shows: shows.iter().map(|show| show.to_string()).collect(),
        ignore_case: false,
    }
}

/// Writes `tasks` as a config document in a fresh temp dir. Returns the dir
/// guard and the config path.
pub fn setup_test_environment(tasks: Vec<(&str, Task)>) -> Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;

    let config = Config {
        db: Some("unused.db".to_string()),
        tasks: tasks
            .into_iter()
            .map(|(name, task)| (name.to_string(), task))
            .collect::<HashMap<_, _>>(),
    };
    let config_path = temp_dir.path().join("rssget.yaml");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    Ok((temp_dir, config_path))
}

/// Names of regular files in `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("rssget_lib=debug,rssget_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
