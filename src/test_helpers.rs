//! Test utilities for creating temporary log files and mutating them the way
//! log writers and rotators do.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct TempLogFile {
    pub path: PathBuf,
    temp_dir: tempfile::TempDir,
}

impl TempLogFile {
    /// Create a new empty temporary log file
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            temp_dir,
        })
    }

    /// Create a temporary log file with initial raw content
    pub fn with_bytes(content: &[u8]) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append_bytes(content)?;
        Ok(temp_file)
    }

    /// Append raw bytes to the file
    pub fn append_bytes(&self, content: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content)?;
        file.flush()?;
        Ok(())
    }

    /// Append a newline-terminated line to the file
    pub fn append_line(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", content)?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file in place, keeping its identity
    pub fn truncate(&self) -> std::io::Result<()> {
        OpenOptions::new().write(true).truncate(true).open(&self.path)?;
        Ok(())
    }

    /// Remove the file from its directory
    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }

    /// Rename the file within the temporary directory, returning the new path
    pub fn rename_to(&self, name: &str) -> std::io::Result<PathBuf> {
        let target = self.sibling(name);
        std::fs::rename(&self.path, &target)?;
        Ok(target)
    }

    /// Create a brand new file at the tracked path with the given content
    pub fn recreate_with(&self, content: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        file.write_all(content)?;
        file.flush()?;
        Ok(())
    }

    /// Path of another file in the same temporary directory
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
        assert_eq!(std::fs::metadata(temp_file.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_append_bytes_and_lines() {
        let temp_file = TempLogFile::with_bytes(b"abc").unwrap();
        temp_file.append_line("line 1").unwrap();

        let content = std::fs::read(temp_file.path()).unwrap();
        assert_eq!(content, b"abcline 1\n");
    }

    #[test]
    fn test_truncate() {
        let temp_file = TempLogFile::with_bytes(b"initial content").unwrap();
        temp_file.truncate().unwrap();

        let content = std::fs::read(temp_file.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_remove_and_recreate() {
        let temp_file = TempLogFile::with_bytes(b"old").unwrap();
        temp_file.remove().unwrap();
        assert!(!temp_file.path().exists());

        temp_file.recreate_with(b"new").unwrap();
        assert_eq!(std::fs::read(temp_file.path()).unwrap(), b"new");
    }

    #[test]
    fn test_rename_to() {
        let temp_file = TempLogFile::with_bytes(b"data").unwrap();
        let renamed = temp_file.rename_to("test.log.1").unwrap();

        assert!(!temp_file.path().exists());
        assert_eq!(std::fs::read(renamed).unwrap(), b"data");
    }
}
