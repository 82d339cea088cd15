use std::path::Path;

use url::Url;

use crate::error::Result;

/// Read the newline-separated feed list.
///
/// One trailing empty line is dropped; blank lines, `#` comments and
/// anything that is not an absolute http(s) URL are skipped.
pub fn load_feed_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_feed_list(&content))
}

pub fn parse_feed_list(content: &str) -> Vec<String> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter(|l| {
            let valid = Url::parse(l)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                tracing::warn!("Skipping invalid feed URL: {}", l);
            }
            valid
        })
        .map(str::to_string)
        .collect()
}
