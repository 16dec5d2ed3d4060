mod manager;
mod page;
mod page_set;
mod refresh;

pub use manager::PageManager;
pub use page::{Page, PageContext, PageRequest, RenderContext};
pub use page_set::{PageSet, Reachability};
pub use refresh::RefreshGuard;
