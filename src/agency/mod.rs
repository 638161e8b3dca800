pub mod agency;
pub mod content;
pub mod directory;
pub mod effects;
pub mod errors;
pub mod lure;
pub mod maintenance;
pub mod parser;
pub mod sync;
pub mod types;
