//! Application services layer.

pub mod chrome;
pub mod error;
pub mod jobs;
pub mod listing;
pub mod markdown;
pub mod og;
pub mod page;
pub mod repos;
pub mod sitemap;
pub mod structured_data;
pub mod syndication;
