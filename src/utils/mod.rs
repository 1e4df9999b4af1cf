/// JSON summaries of compilation passes
pub mod summary;
