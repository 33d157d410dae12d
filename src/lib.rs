pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod semester;
pub mod state;
