//! User management collaborator: a plain in-memory CRUD store.

pub mod models;
pub mod store;

pub use models::{ApiResponse, CreateUserRequest, UpdateUserRequest, User, ValidationError};
pub use store::UserStore;
