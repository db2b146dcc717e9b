// FILE stage: record allocation and the CSV ledger.

pub mod allocator;
pub mod ledger;

pub use allocator::ApplicationAllocator;
pub use ledger::{Ledger, LEDGER_COLUMNS};
