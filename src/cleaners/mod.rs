mod movies;
mod series;

pub use movies::MoviesCleaner;
pub use series::SeriesCleaner;
