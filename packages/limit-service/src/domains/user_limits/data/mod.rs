pub mod memory;
pub mod pg;
mod repository;

pub use memory::InMemoryUserLimitRepository;
pub use pg::PgUserLimitRepository;
pub use repository::UserLimitRepository;
