use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Resolve a model file by name, checking local copies before downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Each of `search_dirs`, in order (system installs, bundled assets)
/// 3. Download from URL to cache
pub fn resolve(name: &str, url: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, name, url, search_dirs)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    search_dirs: &[PathBuf],
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    if let Some(found) = search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
    {
        return Ok(found);
    }

    log::info!("{name} not found locally, downloading from {url}");
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(url, &cached_path)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/LiveCheck/models/`
/// - Linux: `$XDG_CACHE_HOME/LiveCheck/models/` or `~/.cache/LiveCheck/models/`
/// - Windows: `%LOCALAPPDATA%/LiveCheck/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("LiveCheck").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("LiveCheck").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url).map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;
    if !response.status().is_success() {
        return Err(ModelResolveError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().map_err(|e| ModelResolveError::Download {
        url: url.to_string(),
        source: e,
    })?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let write_err = |e| ModelResolveError::Write {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    log::info!("Saved {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNREACHABLE_URL: &str = "http://invalid.nonexistent.example.com/model.xml";

    #[test]
    fn test_resolve_prefers_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let system = tmp.path().join("system");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&system).unwrap();
        fs::write(cache.join("cascade.xml"), b"cached").unwrap();
        fs::write(system.join("cascade.xml"), b"system").unwrap();

        let path = resolve_in(&cache, "cascade.xml", UNREACHABLE_URL, &[system]).unwrap();
        assert_eq!(path, cache.join("cascade.xml"));
    }

    #[test]
    fn test_resolve_falls_back_to_first_search_dir_with_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let empty = tmp.path().join("empty");
        let system = tmp.path().join("system");
        fs::create_dir_all(&system).unwrap();
        fs::write(system.join("cascade.xml"), b"system").unwrap();

        let path = resolve_in(
            &cache,
            "cascade.xml",
            UNREACHABLE_URL,
            &[empty, system.clone()],
        )
        .unwrap();
        assert_eq!(path, system.join("cascade.xml"));
    }

    #[test]
    fn test_model_cache_dir_is_namespaced() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("LiveCheck"));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_download_invalid_url_returns_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.xml");
        let result = download(UNREACHABLE_URL, &dest);
        assert!(result.is_err());
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.xml");
        let _ = download(UNREACHABLE_URL, &dest);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
