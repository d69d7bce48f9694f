//! Filesystem adapters for the uploaded corpus.

pub mod fs_store;

pub use fs_store::FsCorpusStore;
