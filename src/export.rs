use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use crossterm::{clipboard::CopyToClipboard, execute};

/// Write CSV text to `path`, creating missing parent directories
pub fn write_csv(path: &Path, csv: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, csv)?;
    tracing::info!(path = %path.display(), bytes = csv.len(), "Exported CSV");
    Ok(())
}

/// Destination for copied text
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Copies through the terminal with an OSC 52 escape sequence
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, CopyToClipboard::to_clipboard_from(text))?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("query_result.csv");
        write_csv(&path, "a,b\n1,2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2");
    }

    #[test]
    fn test_write_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query_result.csv");
        write_csv(&path, "old").unwrap();
        write_csv(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
