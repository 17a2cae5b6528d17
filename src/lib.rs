pub mod api;
pub mod cli;
pub mod config;
pub mod drawer;
pub mod error;
pub mod list;
pub mod mutation;
pub mod permissions;
pub mod resources;
pub mod session;
pub mod settings;
pub mod tenants;
