pub mod catalog;
pub mod config;
pub mod error;
pub mod match_listing;
pub mod model;
pub mod pagination;
pub mod player_leaderboard;
pub mod season;
pub mod service;
pub mod store;
pub mod team_leaderboard;
