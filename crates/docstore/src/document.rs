//! Document shape stored in a table.

use serde_json::{Map, Value};

/// A schemaless document: attribute names mapped to JSON values.
///
/// Engines persist documents however they like; the contract only
/// requires that a document round-trips through [`put`] and [`get`]
/// unchanged.
///
/// [`put`]: crate::store::DocumentStore::put
/// [`get`]: crate::store::DocumentStore::get
pub type Document = Map<String, Value>;
