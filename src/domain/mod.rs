pub mod entities;
pub mod phone_rules;
pub mod use_cases;
