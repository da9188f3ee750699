pub mod builder;
pub mod command;
pub mod query;

#[cfg(test)]
pub mod memory;
