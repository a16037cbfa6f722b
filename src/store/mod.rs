pub mod json;

use crate::app::Result;
use crate::domain::Watermark;

pub use json::JsonFileStore;

/// Durable home of the single watermark record.
pub trait WatermarkStore {
    /// Read the stored watermark. A store that was never written yields
    /// `Watermark::default()`.
    fn load(&self) -> Result<Watermark>;

    /// Replace the stored watermark.
    fn save(&self, watermark: &Watermark) -> Result<()>;
}
