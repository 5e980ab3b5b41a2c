//! Generic in-memory markup tree for templates and output pages
//!
//! Elements carry their qualified name as an opaque string, an ordered
//! attribute list and ordered children. Reading and writing go through
//! quick-xml so that prefixes and attribute order survive a round trip.

mod node;
mod reader;
mod writer;

pub use node::{Element, Node};
pub use reader::parse;
pub use writer::write;
