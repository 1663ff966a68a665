//! Domain record types stored in the key-value namespace.
//!
//! These are the shapes persisted as JSON values under the `product:`,
//! `order:` and `invoice:` key prefixes, plus the customer projection
//! derived from platform user records. Wire names are camelCase, matching
//! the JSON contract the storefront client speaks.

pub mod customer;
pub mod invoice;
pub mod order;
pub mod product;

pub use customer::CustomerView;
pub use invoice::Invoice;
pub use order::{LineItemRef, Order, OrderLineItem};
pub use product::Product;
