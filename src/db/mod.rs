pub mod availability;
pub mod entities;
pub mod feedback;
pub mod migration;
pub mod profile;
pub mod request;
pub mod session;
pub mod user;
