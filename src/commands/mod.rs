pub mod chat;
pub mod dashboard;
pub mod offers;
pub mod requests;
