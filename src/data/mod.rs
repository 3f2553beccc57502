pub mod loader;
pub mod models;

pub use self::loader::SeriesLoader;
pub use self::models::MoodSeries;
