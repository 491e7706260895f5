mod notification_signature;
mod order_id;

pub use notification_signature::{notification_signature, verify_notification_signature};
pub use order_id::OrderIdGenerator;
