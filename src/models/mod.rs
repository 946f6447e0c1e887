pub mod invoice;
pub mod user;

pub use invoice::{Invoice, InvoiceItem};
pub use user::User;
