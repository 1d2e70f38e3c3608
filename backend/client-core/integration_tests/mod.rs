mod auth;
mod config;
mod connection_tests;
