pub mod audit;
pub mod config;
pub mod currency;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
