pub mod company;
pub mod invitation;
pub mod session;
pub mod user;
