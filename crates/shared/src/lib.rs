pub mod basemap;
pub mod config;
pub mod encoding;
pub mod feed;
pub mod geo;
pub mod projection;
