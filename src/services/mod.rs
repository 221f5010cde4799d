pub mod image;
pub mod insights;
pub mod trends;
