mod transaction;
mod user_balance;

pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
pub use user_balance::UserBalance;
