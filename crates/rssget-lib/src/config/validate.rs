use super::{Config, Task};
use crate::error::RssGetError;
use itertools::Itertools;
use url::Url;

impl Config {
    /// Validates every task, reporting the first offending task by name.
    pub fn validate(&self) -> Result<(), RssGetError> {
        for (name, task) in self.tasks.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            task.validate(name)?;
        }
        Ok(())
    }
}

impl Task {
    pub fn validate(&self, name: &str) -> Result<(), RssGetError> {
        let invalid = |details: String| RssGetError::ConfigValidation {
            task: name.to_string(),
            details,
        };

        self.feed_url().map_err(invalid)?;

        if self.download.as_os_str().is_empty() {
            return Err(invalid("Download directory must not be empty".to_string()));
        }

        if self.shows.is_empty() {
            return Err(invalid("Shows must list at least one show".to_string()));
        }

        if let Some(position) = self.shows.iter().position(|show| show.trim().is_empty()) {
            return Err(invalid(format!("Shows entry #{} is empty", position + 1)));
        }

        Ok(())
    }

    /// Parses the `Rss` field, accepting only absolute http(s) URLs.
    pub fn feed_url(&self) -> Result<Url, String> {
        if self.rss.trim().is_empty() {
            return Err("Rss feed URL must not be empty".to_string());
        }
        let url = Url::parse(self.rss.trim())
            .map_err(|e| format!("Rss feed URL {:?} is invalid: {}", self.rss, e))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(format!(
                "Rss feed URL {:?} has unsupported scheme {:?}",
                self.rss, scheme
            )),
        }
    }
}
