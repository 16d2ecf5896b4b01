//! Reads Metasequoia `.mqo` text documents and writes them as Wavefront `.obj`/`.mtl`.

pub mod error;
pub mod obj;
pub mod parser;
mod scanner;
pub mod scene;

pub use error::{Diagnostic, FormatError, ParseError, Result};
pub use parser::{parse, parse_with_mode, ParseMode, Parsed};
pub use scene::{Face, Material, Object, Scene, Vertex, MAX_FACE_VERTICES};
