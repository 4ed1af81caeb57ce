//! Style profiles: definition files, typed parameters and their application

pub mod ast;
pub mod context;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod params;
pub mod profile;

pub use context::{StyleContext, StyleScope, StyleSnapshot};
pub use error::StyleError;
pub use grammar::parse;
pub use params::{FontSize, StyleParams, TickParams, ValueError};
pub use profile::{LoadedStyle, StyleLibrary, StyleProfile, STYLE_DIR_ENV};
