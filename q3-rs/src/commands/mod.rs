//! Command implementations for each file type

pub mod anim;
pub mod md3;
pub mod player;
pub mod skin;
