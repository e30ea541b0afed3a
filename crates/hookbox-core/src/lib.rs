// ABOUTME: Core library for hookbox, containing the record model shared by every component.
// ABOUTME: Defines records, the ordered collection, delete outcomes, and the on-disk envelope.

pub mod collection;
pub mod envelope;
pub mod record;

pub use collection::{Collection, DeleteOutcome};
pub use envelope::{Decoded, ENVELOPE_VERSION, EnvelopeError, decode_collection, encode_collection};
pub use record::Record;
