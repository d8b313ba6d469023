//! 用户资源

pub mod handler;
pub mod memory;
pub mod model;
pub mod repository;
pub mod validator;

pub use memory::MemoryUserRepository;
pub use model::{AgeChange, NewUser, User, UserChanges};
pub use repository::{MySqlUserRepository, UserRepository};
