pub mod hash;
pub mod merkle;
