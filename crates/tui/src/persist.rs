use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::BaseDirs;
use term_core::{HistoryStore, OutputLog, StoreError};

/// Fixed key the command history is stored under.
pub const HISTORY_KEY: &str = "terminalHistory";

pub fn data_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("codemate"))
}

pub fn history_path() -> Option<PathBuf> {
    Some(data_dir()?.join(format!("{}.json", HISTORY_KEY)))
}

pub fn transcript_path() -> Option<PathBuf> {
    Some(data_dir()?.join("transcript.html"))
}

/// Command history kept as a JSON array in a single file.
#[derive(Clone, Debug)]
pub struct FileHistoryStore {
    path: Option<PathBuf>,
}

impl FileHistoryStore {
    pub fn new() -> Self {
        Self {
            path: history_path(),
        }
    }

    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save(&self, entries: &[String]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = serde_json::to_vec(entries)?;
        write_atomic(path, &data)?;
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.to_path_buf();
    let ext = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp.set_extension(ext);
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(data)?;
        f.flush()?;
    }
    fs::rename(tmp, path)
}

pub fn save_transcript_to(path: &Path, log: &OutputLog) -> Result<()> {
    write_atomic(path, log.to_html().as_bytes())
        .with_context(|| format!("write transcript: {}", path.display()))
}

/// Writes the output log as HTML to the default location and returns the path.
pub fn save_transcript(log: &OutputLog) -> Result<PathBuf> {
    let path = transcript_path().context("no data directory available")?;
    save_transcript_to(&path, log)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use term_core::OutputLine;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::at(dir.path().join("terminalHistory.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("terminalHistory.json");
        let store = FileHistoryStore::at(&path);
        store
            .save(&["ls".to_string(), "pwd".to_string(), "ls".to_string()])
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"["ls","pwd","ls"]"#);
        assert_eq!(FileHistoryStore::at(&path).load().unwrap(), vec!["ls", "pwd", "ls"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminalHistory.json");
        fs::write(&path, "not json").unwrap();
        let err = FileHistoryStore::at(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn transcript_is_written_as_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.html");
        let mut log = OutputLog::new();
        log.push(OutputLine::command("<b>x</b>"));
        log.push(OutputLine::error("boom"));
        save_transcript_to(&path, &log).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("<div class=\"output-line error-line\">boom</div>"));
    }
}
