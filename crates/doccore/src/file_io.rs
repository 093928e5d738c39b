//! Whole-file text I/O.
//!
//! Reads and writes are synchronous and not atomic: a failed write may
//! leave the destination truncated.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Read `path` as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    if path.is_dir() {
        anyhow::bail!("{} is a directory", path.display());
    }

    match fs::metadata(path) {
        Ok(metadata) if metadata.len() > LARGE_FILE_THRESHOLD => {
            log::warn!(
                "Large file detected ({} bytes): {}",
                metadata.len(),
                path.display()
            );
        }
        Ok(_) => {}
        Err(e) => log::debug!("Failed to get file metadata: {}", e),
    }

    let bytes = fs::read(path).map_err(|e| io_error(e, path))?;
    let content = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8 text", path.display()))?;

    log::info!("Successfully opened file: {}", path.display());
    Ok(content)
}

/// Write `text` to `path`, creating or truncating it.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text.as_bytes()).map_err(|e| io_error(e, path))?;
    log::info!(
        "Successfully saved file: {} ({} bytes)",
        path.display(),
        text.len()
    );
    Ok(())
}

fn io_error(error: std::io::Error, path: &Path) -> anyhow::Error {
    let reason = match error.kind() {
        ErrorKind::NotFound => format!("No such file or directory: {}", path.display()),
        ErrorKind::PermissionDenied => format!("Permission denied: {}", path.display()),
        ErrorKind::WriteZero => format!("Disk may be full: {}", path.display()),
        _ => format!("{}: {}", path.display(), error),
    };
    anyhow::Error::new(error).context(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_existing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "Hello World\nTest content").unwrap();

        let content = read_text(temp_file.path()).unwrap();
        assert_eq!(content, "Hello World\nTest content");
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = read_text(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("No such file or directory"));
    }

    #[test]
    fn test_read_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = read_text(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is a directory"));
    }

    #[test]
    fn test_read_invalid_utf8_fails() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = read_text(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        write_text(&path, "日本語\r\nline two\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "日本語\r\nline two\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.txt");
        assert!(write_text(&path, "text").is_err());
    }
}
