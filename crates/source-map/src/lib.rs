//! Source position tracking and mapping for rinse.
//!
//! An index for turning byte offsets into line/column pairs, and a builder
//! for the line-granular v3 source maps the transformer emits.

mod builder;
mod line_index;
mod vlq;

pub use builder::{Mapping, RawSourceMap, SourceMapBuilder};
pub use line_index::{ByteOffset, LineCol, LineIndex};
pub use vlq::encode_vlq;
