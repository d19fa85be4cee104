pub mod auth;
pub mod config;
pub mod error;
pub mod object_store;
pub mod services;
pub mod state;
pub mod web;
