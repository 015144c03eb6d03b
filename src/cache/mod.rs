pub mod reverse_cache;

pub use reverse_cache::ReverseLookupCache;
