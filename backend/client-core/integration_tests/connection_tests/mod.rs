mod helpers;
mod lifecycle;
mod monitor;
mod reconnect;
mod roles;
