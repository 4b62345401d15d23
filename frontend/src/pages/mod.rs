pub mod book;
pub mod home;
pub mod not_found;
