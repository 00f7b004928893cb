pub mod errors;
pub mod db;
pub mod config;

#[cfg(test)]
mod tests;
