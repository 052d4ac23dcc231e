pub mod score;
pub mod system;
