use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("amastro/", env!("CARGO_PKG_VERSION"));

pub fn client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GET `url` and return the body, failing on non-2xx status.
pub fn fetch_bytes(client: &Client, url: &str) -> reqwest::Result<Vec<u8>> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// GET `url` with URL-encoded query parameters.
pub fn fetch_bytes_with_query(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> reqwest::Result<Vec<u8>> {
    let response = client.get(url).query(query).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

pub fn fetch_text(client: &Client, url: &str) -> reqwest::Result<String> {
    client.get(url).send()?.error_for_status()?.text()
}

/// Write through a temporary file so an interrupted run leaves no partial image.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    {
        let mut file = BufWriter::new(File::create(&temp_path)?);
        file.write_all(bytes)?;
        file.flush()?;
    }
    fs::rename(&temp_path, path)
}

/// Existing, non-empty files are treated as cached.
pub fn is_cached(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_only_when_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("M31.jpg");
        assert!(!is_cached(&path));

        write_atomically(&path, b"").unwrap();
        assert!(!is_cached(&path));

        write_atomically(&path, b"\xff\xd8\xff").unwrap();
        assert!(is_cached(&path));
        assert!(!path.with_extension("tmp").exists());
    }
}
