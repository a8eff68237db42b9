pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod movie;
pub mod state;
pub mod tmdb;
pub mod view;
