//! Link to the server-side download/conversion endpoint

use anyhow::Result;
use reqwest::Url;

const DOWNLOAD_PATH: &str = "/api/download";

/// Build `{server}/api/download?url=<encoded external url>`.
pub fn download_link(server: &str, external_url: &str) -> Result<Url> {
    let base = format!("{}{DOWNLOAD_PATH}", server.trim_end_matches('/'));
    Ok(Url::parse_with_params(&base, &[("url", external_url)])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_the_external_url() {
        let link = download_link(
            "http://localhost:8080/",
            "https://www.youtube.com/watch?v=abc&t=10",
        )
        .unwrap();
        assert_eq!(link.path(), "/api/download");
        let (key, value) = link.query_pairs().next().unwrap();
        assert_eq!(key, "url");
        assert_eq!(value, "https://www.youtube.com/watch?v=abc&t=10");
        assert!(!link.as_str().contains("&t=10"));
    }

    #[test]
    fn rejects_an_unusable_server() {
        assert!(download_link("not a server", "https://example.org").is_err());
    }
}
