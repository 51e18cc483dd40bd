use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SELECTION_FILE: &str = "selection.json";

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_dir() -> PathBuf {
    home_dir().join(".petal")
}

fn selection_path() -> PathBuf {
    data_dir().join(SELECTION_FILE)
}

fn read_selection_file(path: &Path) -> Result<Vec<String>, String> {
    let data = fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let ids: Vec<String> = serde_json::from_slice(&data)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    Ok(ids)
}

pub fn ensure_data_dir() -> io::Result<PathBuf> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Overwrites the durable record wholesale with the given ordered ids.
pub fn save(ids: &[String]) -> io::Result<()> {
    let dir = ensure_data_dir()?;
    let final_path = dir.join(SELECTION_FILE);
    let tmp_path = dir.join(format!("{SELECTION_FILE}.tmp"));
    let bytes = serde_json::to_vec_pretty(ids)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, &final_path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if final_path.exists() {
                fs::remove_file(&final_path)?;
                fs::rename(&tmp_path, &final_path)?;
                Ok(())
            } else {
                Err(rename_err)
            }
        }
    }
}

/// A missing record is an empty selection; an unreadable one is empty plus a
/// warning for the diagnostics log.
pub fn load() -> (Vec<String>, Option<String>) {
    let path = selection_path();
    if !path.exists() {
        return (Vec::new(), None);
    }

    match read_selection_file(&path) {
        Ok(ids) => (ids, None),
        Err(err) => (Vec::new(), Some(err)),
    }
}
