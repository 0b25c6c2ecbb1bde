pub mod clients;
pub mod ledger;
pub mod removal;
pub mod statement;

pub use clients::ClientService;
pub use ledger::LedgerService;
pub use removal::{RemovalService, ShipmentRemoval};
pub use statement::StatementService;
