mod cli;
mod logger;
mod watch;
