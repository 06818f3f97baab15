pub mod competitor;
pub mod page;
pub mod ticket;
