mod game;
mod player;
mod summary;

pub use game::*;
pub use player::*;
pub use summary::*;
