mod common;
mod customer;
mod payment;
mod refund;
mod subscription;
mod user;

pub use common::*;
pub use customer::*;
pub use payment::*;
pub use refund::*;
pub use subscription::*;
pub use user::*;
