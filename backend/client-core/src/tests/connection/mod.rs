mod handlers;
mod machine;
mod policy;
mod queue;
