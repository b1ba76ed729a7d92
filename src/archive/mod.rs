//! On-disk archive: records and their atomic persistence
//!
//! - `fragment`: owned body tree, rewritten in place by the asset resolver
//! - `frontmatter`: header rendering and the two-strategy metadata parser
//! - `writer` / `reader`: `posts/<id>.md` records
//! - `persist`: temp-file-then-rename writes shared with asset storage

mod fragment;
mod frontmatter;
mod persist;
mod reader;
mod writer;

pub use fragment::{BodyFragment, ContentElement, ContentNode};
pub use frontmatter::{
    parse_metadata, parse_metadata_lines, parse_metadata_structured, render_frontmatter,
    split_record, RecordMetadata,
};
pub use persist::{ensure_dir, write_atomic, PersistError};
pub use reader::{list_records, read_archive, read_record, ArchivedPost};
pub use writer::{body_to_markdown, render_record, ArchiveWriter, POSTS_DIR, RECORD_EXTENSION};
