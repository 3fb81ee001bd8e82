#![forbid(unsafe_code)]

//! Board documents.
//!
//! A board is the root document of one canvas tool. Three variants exist:
//!
//! - [`EventStormingBoard`]: flows of sticky-note slots, hotspots, free notes
//! - [`DomainModelingBoard`]: bounded contexts, context-map connections and a
//!   Business Model Canvas sub-document
//! - [`StoryMappingBoard`]: activities with stories and an example-mapping
//!   sub-document
//!
//! All three implement [`BoardDocument`], which is everything the runtime's
//! history and persistence layers need to know about a board. Positioned
//! entities are exposed uniformly through the closed [`NodeRef`] union so
//! connection routing works the same on every board.

pub mod document;
pub mod domain_modeling;
pub mod event_storming;
pub mod model;
pub mod node;
pub mod schema;
pub mod snapshot;
pub mod story_mapping;

pub use document::{BoardDocument, BoardKind};
pub use domain_modeling::{BusinessModelCanvas, DomainModelingBoard};
pub use event_storming::EventStormingBoard;
pub use model::{
    Activity, BoundedContext, Connection, ContextMapPattern, Flow, Hotspot, Note, SlotType,
    StickyNote, new_id,
};
pub use node::NodeRef;
pub use schema::{
    ExportEnvelope, SCHEMA_VERSION, board_violation, export_filename, export_violation,
    parse_export_value, parse_stored_value, validate_board_value, validate_export_data,
};
pub use snapshot::{ContentSnapshot, canonical_json};
pub use story_mapping::{ExampleMapping, Rule, StoryMappingBoard};
