pub mod handlers;
pub mod health;
pub mod lists;
pub mod schema;
