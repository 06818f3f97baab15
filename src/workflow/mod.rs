pub mod service_tickets;
pub mod sitemap_urls;
