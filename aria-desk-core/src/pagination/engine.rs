use aria_desk_common::*;
use alloc::{
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::cell::RefCell;
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embedded_io::{Seek, SeekFrom};
use thiserror::Error;

use super::{
    fitter::{Feed, LineFitter},
    stream::{CharStream, Limited},
    worker::{Precompute, PrecomputeQueue, PrecomputeRequest},
};

const MAX_PAGE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("page {page} is past the end of the document")]
    PageOutOfRange { page: usize },
}

/// 每页的排版参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub max_width: u32,
    pub lines_per_page: u8,
}

impl Layout {
    pub fn new(max_width: u32, lines_per_page: u8) -> Self {
        Self {
            max_width,
            lines_per_page: lines_per_page.max(1),
        }
    }
}

/// Start offsets of the pages found so far.
///
/// Entry 0 is always 0 and entries strictly increase. Once the end of the
/// file is reached the file size is appended as an end marker (unless the
/// file is empty) and `complete` is set.
#[derive(Debug)]
struct OffsetTable {
    offsets: Vec<u64>,
    complete: bool,
    precompute_running: bool,
}

impl OffsetTable {
    fn last(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }
}

/// 懒分页引擎
///
/// Page boundaries are computed on demand by streaming the file from the
/// last known boundary. The offset table is shared between the UI loop and
/// one background precompute at a time; the lock is only taken to read or
/// append entries, never across storage I/O.
pub struct Paginator<F: FileSystem, M: FontMetrics> {
    fs: Arc<F>,
    metrics: M,
    path: String,
    layout: Layout,
    file_size: u64,
    lookahead: usize,
    queue: Option<&'static PrecomputeQueue>,
    table: Mutex<CriticalSectionRawMutex, RefCell<OffsetTable>>,
}

impl<F: FileSystem, M: FontMetrics> Paginator<F, M> {
    pub fn open(fs: Arc<F>, metrics: M, path: &str, layout: Layout) -> Result<Self, PaginationError> {
        let mut file = open_file(fs.as_ref(), path)?;
        let file_size = file.seek(SeekFrom::End(0)).map_err(|e| {
            warn!("cannot size {}: {:?}", path, e);
            StorageError::ReadFailed
        })?;
        info!("opened {} ({} bytes)", path, file_size);

        Ok(Self {
            fs,
            metrics,
            path: path.to_string(),
            layout: Layout::new(layout.max_width, layout.lines_per_page),
            file_size,
            lookahead: 2,
            queue: None,
            table: Mutex::new(RefCell::new(OffsetTable {
                offsets: alloc::vec![0],
                complete: false,
                precompute_running: false,
            })),
        })
    }

    /// Pages computed past the requested one by the background precompute.
    pub fn with_lookahead(mut self, pages: usize) -> Self {
        self.lookahead = pages;
        self
    }

    /// Run precompute requests on the worker behind `queue` instead of
    /// inline.
    pub fn with_queue(mut self, queue: &'static PrecomputeQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn is_complete(&self) -> bool {
        self.table.lock(|t| t.borrow().complete)
    }

    /// Snapshot of the offset table, end marker included.
    pub fn known_offsets(&self) -> Vec<u64> {
        self.table.lock(|t| t.borrow().offsets.clone())
    }

    /// Grow the table until it holds an entry for `page`. Returns false if
    /// the document ends first.
    pub fn ensure_offset_known_up_to(&self, page: usize) -> Result<bool, PaginationError> {
        loop {
            let (last, len, complete) = self.table.lock(|t| {
                let t = t.borrow();
                (t.last(), t.offsets.len(), t.complete)
            });
            if len > page {
                return Ok(true);
            }
            if complete {
                return Ok(false);
            }

            let next = self.next_page_offset(last)?;

            self.table.lock(|t| {
                let mut t = t.borrow_mut();
                if t.complete || t.last() != last {
                    // the other context got there first
                    return;
                }
                match next {
                    Some(offset) => t.offsets.push(offset),
                    None => {
                        if self.file_size > last {
                            t.offsets.push(self.file_size);
                        }
                        t.complete = true;
                    }
                }
            });
        }
    }

    /// Where the page after the one starting at `start` begins, or `None`
    /// when that page runs to the end of the file.
    fn next_page_offset(&self, start: u64) -> Result<Option<u64>, PaginationError> {
        let mut file = open_file(self.fs.as_ref(), &self.path)?;
        file.seek(SeekFrom::Start(start)).map_err(|e| {
            warn!("seek to {} in {} failed: {:?}", start, self.path, e);
            StorageError::ReadFailed
        })?;

        let mut stream = CharStream::new(&mut file, start);
        let mut fitter = LineFitter::new(&self.metrics, self.layout.max_width);
        let mut lines = 0u8;
        let next = loop {
            let before = stream.offset();
            let c = match stream.next_char() {
                Ok(Some(c)) => c,
                Ok(None) => break None,
                Err(e) => {
                    warn!("read of {} failed at {}: {:?}", self.path, before, e);
                    return Err(StorageError::ReadFailed.into());
                }
            };
            match fitter.feed(c) {
                Feed::Appended | Feed::Ignored => {}
                Feed::Newline => {
                    fitter.clear();
                    lines += 1;
                    if lines >= self.layout.lines_per_page {
                        break Some(stream.offset());
                    }
                }
                Feed::Wrap => {
                    lines += 1;
                    if lines >= self.layout.lines_per_page {
                        break Some(before);
                    }
                    fitter.clear();
                    fitter.feed(c);
                }
            }
        };

        Ok(next.filter(|offset| *offset < self.file_size))
    }

    /// Text of `page`, read in small chunks from `[offset[page],
    /// offset[page + 1])`.
    pub fn load_page_content(&self, page: usize) -> Result<String, PaginationError> {
        self.ensure_offset_known_up_to(page + 1)?;
        let bounds = self.table.lock(|t| {
            let t = t.borrow();
            (t.offsets.get(page).copied(), t.offsets.get(page + 1).copied())
        });
        let (start, end) = match bounds {
            (Some(start), Some(end)) => (start, end),
            (Some(0), None) if self.file_size == 0 => return Ok(String::new()),
            _ => return Err(PaginationError::PageOutOfRange { page }),
        };

        let mut file = open_file(self.fs.as_ref(), &self.path)?;
        file.seek(SeekFrom::Start(start))
            .map_err(|_| StorageError::ReadFailed)?;

        // decode exactly as next_page_offset did so the text wraps the same way
        let mut limited = Limited::new(&mut file, end - start);
        let mut stream = CharStream::new(&mut limited, start);
        let mut text = String::with_capacity(((end - start) as usize).min(MAX_PAGE_CAPACITY));
        while let Some(c) = stream.next_char().map_err(|e| {
            warn!("read of {} failed: {:?}", self.path, e);
            StorageError::ReadFailed
        })? {
            text.push(c);
        }
        Ok(text)
    }

    /// Pages found so far, not counting the end marker. Never below 1.
    pub fn discovered_pages(&self) -> usize {
        let size = self.file_size;
        let found = self.table.lock(|t| {
            t.borrow()
                .offsets
                .iter()
                .filter(|offset| **offset < size)
                .count()
        });
        found.max(1)
    }

    /// File size divided by the length of the first page. Only meant for a
    /// "3/~40" style indicator.
    pub fn estimate_total_pages_approx(&self) -> usize {
        let first_len = self.table.lock(|t| t.borrow().offsets.get(1).copied());
        match first_len {
            Some(len) if len > 0 => (self.file_size / len).max(1) as usize,
            _ => 1,
        }
    }

    /// Total for the footer. The estimate holds until the discovered count
    /// outgrows it, so the shown number never shrinks.
    pub fn displayed_total_pages(&self) -> usize {
        self.estimate_total_pages_approx()
            .max(self.discovered_pages())
    }

    pub fn is_precompute_running(&self) -> bool {
        self.table.lock(|t| t.borrow().precompute_running)
    }
}

impl<F, M> Paginator<F, M>
where
    F: FileSystem + Send + Sync + 'static,
    M: FontMetrics + Send + Sync + 'static,
{
    /// Fill in pages up to `center + lookahead` off the UI path. A no-op
    /// while an earlier request is still running or once the whole document
    /// is known.
    pub fn start_precompute_async(self: &Arc<Self>, center: usize) -> bool {
        let claimed = self.table.lock(|t| {
            let mut t = t.borrow_mut();
            if t.precompute_running || t.complete {
                false
            } else {
                t.precompute_running = true;
                true
            }
        });
        if !claimed {
            return false;
        }

        let target = center + self.lookahead;
        match self.queue {
            Some(queue) => {
                let request = PrecomputeRequest {
                    engine: self.clone(),
                    target,
                };
                if queue.try_submit(request).is_err() {
                    debug!("precompute queue full, skipping {}", self.path);
                    self.table.lock(|t| t.borrow_mut().precompute_running = false);
                    return false;
                }
            }
            None => self.precompute(target),
        }
        true
    }
}

impl<F, M> Precompute for Paginator<F, M>
where
    F: FileSystem + Send + Sync,
    M: FontMetrics + Send + Sync,
{
    fn precompute(&self, target: usize) {
        if let Err(e) = self.ensure_offset_known_up_to(target) {
            warn!("background pagination of {} failed: {}", self.path, e);
        }
        self.table.lock(|t| t.borrow_mut().precompute_running = false);
    }
}

fn open_file<F: FileSystem>(fs: &F, path: &str) -> Result<F::File, StorageError> {
    fs.open(path).map_err(|e| {
        warn!("cannot open {}: {:?}", path, e);
        if fs.is_available() {
            StorageError::NotFound
        } else {
            StorageError::Unavailable
        }
    })
}
