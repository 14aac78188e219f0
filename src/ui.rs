pub mod input;
pub mod interaction;
