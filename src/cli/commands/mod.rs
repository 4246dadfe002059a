pub mod command;
pub mod material;
pub mod route;
pub mod session;
