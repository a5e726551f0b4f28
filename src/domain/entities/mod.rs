pub mod block;
pub mod contact;
