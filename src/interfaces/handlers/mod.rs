pub mod blocks;
pub mod contact;
pub mod contact_admin;
pub mod system;
