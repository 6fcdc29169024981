// Library exports for the Battlesnake bot
// The server binary and the integration tests drive the bot through these

pub mod bitfield;
pub mod bot;
pub mod config;
pub mod error;
pub mod grid;
pub mod mob;
pub mod position;
pub mod snake;
pub mod types;
