pub mod chat;
pub mod doctor;
pub mod onboard;
pub mod program;
pub mod session;
