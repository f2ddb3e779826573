pub mod item;
pub mod ledger;

pub use item::{Item, ItemDisplay, ItemUpdate, NewItem};
pub use ledger::{
    IssuedItem, IssuedItemDisplay,
    LedgerEntry, LedgerEntryDisplay,
    NewIssuedItem, NewLedgerEntry, TransactionType,
};
