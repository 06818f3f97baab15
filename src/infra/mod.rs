pub mod linear;
pub mod shell_profile;
pub mod sitemap;
