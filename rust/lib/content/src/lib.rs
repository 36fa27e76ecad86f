pub mod error;
pub mod events;
pub mod memory;
pub mod post_type;
pub mod record;
pub mod redb;
pub mod traits;
pub mod writer;

pub use crate::redb::RedbRepository;
pub use error::ContentError;
pub use events::{FormData, InsertContext, RenderContext, SaveContext, WriteRequest};
pub use memory::MemoryRepository;
pub use post_type::{MetaBox, PostTypeDefinition, PostTypeLabels, PostTypeRegistry};
pub use record::{
    AUTO_DRAFT_TITLE, MetaValue, Record, RecordChanges, RecordFields, RecordId, RecordStatus,
};
pub use traits::ContentRepository;
pub use writer::ContentWriter;

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
