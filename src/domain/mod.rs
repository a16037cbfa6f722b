pub mod entry;
pub mod watermark;

pub use entry::{FeedEntry, Media};
pub use watermark::Watermark;
