//! 大文本懒分页

mod engine;
mod fitter;
mod stream;
mod worker;

pub use engine::{Layout, PaginationError, Paginator};
pub use fitter::{Feed, LINE_BUFFER_BYTES, LineFitter};
pub use worker::{Precompute, PrecomputeQueue, PrecomputeRequest};
