pub mod announce;
pub mod listen;
pub mod messages;
pub mod search;
pub mod socket;
