//! Page domain types. Pure data structures with no task or channel concerns.

pub mod cart;
pub mod contact;
pub mod order;
pub mod session;

pub use cart::*;
pub use contact::*;
pub use order::*;
pub use session::*;
