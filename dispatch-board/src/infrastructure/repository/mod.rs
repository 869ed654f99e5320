mod file;
mod rest;

pub use file::FileRepo;
pub use rest::{build_http_client, parse_base_url, RestRepo};
