pub mod client;
pub mod debit;
pub mod product;
pub mod requests;
pub mod shipment;

pub use client::{Client, ClientDraft};
pub use debit::{ClientStatement, CurrencyBalance, Debit, DebitFilter, NewDebit};
pub use product::{Product, StoreListing};
pub use requests::{ClientRequest, NewDebitRequest, NewShipmentRequest, ShipmentUpdateRequest};
pub use shipment::{Currency, NewShipment, Shipment, ShipmentType, ShipmentUpdate};
