//! Template instancing
//!
//! A template is a vector design whose top-level groups ("layers") are lifted
//! out as stencils. Each data record gets a deep copy of every stencil,
//! shifted to its grid slot, with labelled text replaced from the record.
//!
//! # Example
//!
//! ```text
//! <svg width="85mm" height="55mm" ...>
//!   <g inkscape:label="Card">
//!     <text inkscape:label="txt_1"><tspan>Name</tspan></text>
//!     <text inkscape:label="txt_2"><tspan>Title</tspan></text>
//!   </g>
//! </svg>
//! ```
//!
//! With the record `Ada,Engineer` the copy reads "Ada" and "Engineer".

mod extract;
mod instance;
mod substitute;

pub use extract::{extract_layers, Length, Stencil, Template, Vocabulary, INKSCAPE_NS};
pub use instance::Instancer;
pub use substitute::{
    parse_label, substitute, MissingFieldPolicy, SubstitutionError, SubstitutionReport,
};
