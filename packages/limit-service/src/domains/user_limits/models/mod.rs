mod user_limit;

pub use user_limit::*;
