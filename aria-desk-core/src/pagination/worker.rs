use alloc::sync::Arc;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

use aria_desk_common::*;

const QUEUE_DEPTH: usize = 2;

/// Work a paginator can do off the UI loop.
pub trait Precompute: Send + Sync {
    /// Compute boundaries up to `target` and release the in-flight marker.
    fn precompute(&self, target: usize);
}

pub struct PrecomputeRequest {
    pub engine: Arc<dyn Precompute>,
    pub target: usize,
}

/// 后台分页任务队列
///
/// Bounded hand-off from the UI loop to the pagination worker. Each engine
/// keeps at most one request in here at a time.
pub struct PrecomputeQueue {
    channel: Channel<CriticalSectionRawMutex, PrecomputeRequest, QUEUE_DEPTH>,
}

impl Default for PrecomputeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecomputeQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    pub fn try_submit(&self, request: PrecomputeRequest) -> Result<(), PrecomputeRequest> {
        self.channel.try_send(request).map_err(|e| match e {
            embassy_sync::channel::TrySendError::Full(request) => request,
        })
    }

    /// Worker loop: wait for requests and run them one after another.
    pub async fn run(&self) -> ! {
        info!("pagination worker started");
        loop {
            let request = self.channel.receive().await;
            trace!("precompute up to page {}", request.target);
            request.engine.precompute(request.target);
        }
    }

    /// Drain whatever is queued right now. Returns how many requests ran.
    pub fn run_pending(&self) -> usize {
        let mut done = 0;
        while let Ok(request) = self.channel.try_receive() {
            request.engine.precompute(request.target);
            done += 1;
        }
        done
    }
}
