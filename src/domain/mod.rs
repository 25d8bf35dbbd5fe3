pub mod book;
pub mod commands;
pub mod errors;
pub mod events;
pub mod loan;
pub mod recommendation;
pub mod user;
pub mod value_objects;

pub use book::Book;
pub use errors::*;
pub use events::*;
pub use loan::{LendingPolicy, Loan};
pub use user::User;
pub use value_objects::*;
