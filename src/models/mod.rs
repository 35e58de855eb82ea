mod account;
mod channel;
mod extracted;
mod id;
mod id_generator;
mod message;
mod refund;
mod scan_state;

pub use account::{EmailAccount, EmailProvider};
pub use channel::{Channel, Currency};
pub use extracted::ExtractedFields;
pub use id::Id;
pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use message::{EmailMessage, RawMessage, SmsMessage};
pub use refund::{RefundRecord, RefundStatus};
pub use scan_state::ScanState;
