pub mod client;
pub mod errors;
pub mod events;
#[cfg(test)]
pub(crate) mod recording;
pub mod types;
