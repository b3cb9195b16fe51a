//! CLI library for testing purposes

pub mod export;
pub mod import;
pub mod progress;
pub mod view;

pub use export::resolve_locales;
pub use view::truncate_to_width;
