mod common;
mod http_api;
