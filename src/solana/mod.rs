pub mod fetcher;
pub mod parser;
