pub mod clip;
pub mod video;
