pub mod handlers;
pub mod invitations;
