//! Connector Services
//!
//! This module contains the layers built on top of the query executor:
//!
//! - `PageFetcher` - One bounded `SKIP`/`LIMIT` page per call
//! - `Cursor` - Forward-only, lazily advanced iterator over pages
//! - `GraphConnector` - Facade for queries, transactions, schema and CRUD
//! - `cypher` - Fixed statements issued by the facade
//!
//! Services never retry or cache; every call maps onto executor work that
//! the caller awaits to completion.

pub mod connector;
pub mod cursor;
pub mod cypher;
pub mod page_fetcher;

pub use connector::{GraphConnector, TransactionHandle};
pub use cursor::{Cursor, CursorState, CursorStep, FilteredCursor, MappedCursor};
pub use page_fetcher::{Page, PageFetcher};
