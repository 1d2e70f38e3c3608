mod config;
mod connection;
