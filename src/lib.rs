//! Bordful: a job board that serves Airtable listings with feeds, sitemaps and Open Graph images.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
