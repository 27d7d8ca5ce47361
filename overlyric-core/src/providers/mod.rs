pub mod genius;
pub mod lrclib;
pub mod placeholder;

pub use genius::GeniusProvider;
pub use lrclib::LrclibProvider;
pub use placeholder::PlaceholderProvider;
