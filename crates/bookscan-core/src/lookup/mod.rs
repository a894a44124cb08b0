//! Book metadata lookup for ISBN barcodes.
//!
//! Provides a source abstraction over the bibliographic web services and a
//! resolver that queries them in a fixed fallback order (Open Library, then
//! Google Books).

pub(crate) mod google_books;
pub(crate) mod open_library;
pub(crate) mod resolver;
pub(crate) mod source;

pub use google_books::GoogleBooksSource;
pub use open_library::OpenLibrarySource;
pub use resolver::LookupResolver;
pub use source::{resolve_env_var, MetadataSource};
