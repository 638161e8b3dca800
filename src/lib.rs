pub mod agency;
pub mod application;
pub mod rctogether;
pub mod scheduler;
