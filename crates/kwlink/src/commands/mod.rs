//! CLI command implementations.

mod cache;
mod context;
mod dictionary;
mod keywords;
mod render;

pub(crate) use cache::CacheCommand;
pub(crate) use context::CommonArgs;
pub(crate) use dictionary::DictionaryArgs;
pub(crate) use keywords::KeywordsCommand;
pub(crate) use render::RenderArgs;
