//! Persistence entities: the flat document shapes records are stored as.

pub mod role;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

use domain::DomainResult;

/// Bridge between an in-memory record and its persisted row shape.
pub trait Entity: Sized + Send {
    /// Flat row type carrying the document attribute layout.
    type Row: Serialize + DeserializeOwned + Send;

    /// Primary key of the record.
    fn key(&self) -> &str;

    /// Flatten the record into its row shape.
    fn to_row(&self) -> Self::Row;

    /// Rebuild the record from a decoded row.
    fn from_row(row: Self::Row) -> DomainResult<Self>;
}
