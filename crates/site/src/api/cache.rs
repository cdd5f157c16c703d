//! Cache types for backend read responses.

use pet_haven_core::BlogPost;

/// Cached value types for blog reads.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Blogs(Vec<BlogPost>),
    Blog(Box<BlogPost>),
}
