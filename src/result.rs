use crate::error::Error as PosterErr;
pub type Result<T> = std::result::Result<T, PosterErr>;
