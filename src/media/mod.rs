//! Audio file inspection helpers shared by the importer and the player.

pub mod metadata;
