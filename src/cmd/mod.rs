pub mod config;
pub mod sitemap;
pub mod tickets;
