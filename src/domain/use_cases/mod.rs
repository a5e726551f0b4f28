pub mod blocks;
pub mod contact;
pub mod extractors;
