pub mod models;
pub mod config;
pub mod simulator;
pub mod arena;
pub mod bot_strategy;
