pub mod filter;
pub mod record;
pub mod transaction;
pub mod views;

pub use filter::{FilterEvent, FilterSpec, Granularity, TypeFilter};
pub use record::{DocumentType, TransactionRecord, TransactionReason, WithdrawalExtra, WithdrawalMethod};
pub use transaction::{FlatTransaction, TransactionType, CATEGORIES};
pub use views::{CategoryTotal, CategoryView, SeriesPoint, Views};
