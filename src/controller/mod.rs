pub mod admin;
pub mod cache;
pub mod db_prefill;
pub mod http_handlers;
pub mod league;
pub mod standings;
