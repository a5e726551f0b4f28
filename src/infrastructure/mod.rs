pub mod captcha;
pub mod db;
pub mod email;
pub mod limiter;
pub mod utils;
