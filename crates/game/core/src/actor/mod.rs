//! Things that live in a zone: the player, enemies and resource nodes.
mod enemy;
mod player;
mod resource;

pub use enemy::Enemy;
pub use player::Player;
pub use resource::ResourceNode;
