use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::app::Result;
use crate::domain::Watermark;
use crate::store::WatermarkStore;

/// Keeps the watermark in a small JSON file, overwritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WatermarkStore for JsonFileStore {
    fn load(&self) -> Result<Watermark> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No watermark file yet");
                Ok(Watermark::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, watermark: &Watermark) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(watermark)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
