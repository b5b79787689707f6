//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use constgen_core::prelude::*;
//! ```

// Core pipeline
pub use crate::builder::{Constgen, Generated};
pub use crate::error::{ConstgenError, ConstgenResult};
pub use crate::group::OutputRecord;
pub use crate::naming::OutputMode;

// Corpus loading
pub use crate::scan::{gather_header_files, gather_inputs, read_corpus_lines, DEFAULT_EXTENSIONS};

// Output
pub use crate::report::{format_output, write_output};

// Configuration
pub use crate::config::{load_config, ConstgenConfig};
