mod question;
mod user;

pub use question::Question;
pub use user::{Registration, RegistrationError, User};
