use aria_desk_common::*;
use alloc::{boxed::Box, vec::Vec};

use super::Page;

/// 页面是否可以通过左右切换到达
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Cycling,
    /// Only through an explicit action such as opening a file.
    ExplicitOnly,
}

struct PageSlot<D: Panel> {
    page: Box<dyn Page<D>>,
    reachability: Reachability,
}

pub struct PageSet<D: Panel> {
    slots: Vec<PageSlot<D>>,
}

impl<D: Panel> Default for PageSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Panel> PageSet<D> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Appends a page and returns its index.
    pub fn register<P>(&mut self, page: P, reachability: Reachability) -> usize
    where
        P: Page<D> + 'static,
    {
        self.slots.push(PageSlot {
            page: Box::new(page),
            reachability,
        });
        self.slots.len() - 1
    }

    pub fn with<P>(mut self, page: P, reachability: Reachability) -> Self
    where
        P: Page<D> + 'static,
    {
        self.register(page, reachability);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Modular index, negative values wrap from the end.
    pub fn normalize(&self, index: isize) -> Option<usize> {
        let len = isize::try_from(self.slots.len()).ok().filter(|n| *n > 0)?;
        Some(index.rem_euclid(len) as usize)
    }

    pub fn reachability(&self, index: usize) -> Option<Reachability> {
        self.slots.get(index).map(|s| s.reachability)
    }

    pub fn name(&self, index: usize) -> &'static str {
        self.slots.get(index).map_or("?", |s| s.page.name())
    }

    pub(crate) fn page(&self, index: usize) -> Option<&dyn Page<D>> {
        self.slots.get(index).map(|s| s.page.as_ref())
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut (dyn Page<D> + 'static)> {
        self.slots.get_mut(index).map(|s| s.page.as_mut())
    }

    /// Nearest cycling page from `from` in direction `step` (+1 / -1),
    /// scanning the ring once and never returning `from` itself.
    pub fn next_cycling(&self, from: usize, step: isize) -> Option<usize> {
        let len = self.slots.len() as isize;
        (1..len)
            .map(|k| (from as isize + step * k).rem_euclid(len) as usize)
            .find(|&i| self.slots[i].reachability == Reachability::Cycling)
    }

    /// Names of the pages Left and Right cycle to from `index`.
    pub fn cycling_neighbours(&self, index: usize) -> (Option<&'static str>, Option<&'static str>) {
        (
            self.next_cycling(index, -1).map(|i| self.name(i)),
            self.next_cycling(index, 1).map(|i| self.name(i)),
        )
    }
}
