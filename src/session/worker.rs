use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::pattern::model::Pattern;
use crate::render::config::RenderConfig;
use crate::render::pipeline::{Rendered, render_with};
use crate::render::raster::{CpuRasterizer, RasterBackend};
use crate::render::scale::Viewport;
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One render request.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Pattern to render.
    pub pattern: Arc<Pattern>,
    /// Viewport hint.
    pub viewport: Viewport,
    /// Render settings.
    pub config: RenderConfig,
}

/// A finished render, tagged with the request it answers.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Generation of the request.
    pub generation: u64,
    /// The pattern that was rendered.
    pub pattern: Arc<Pattern>,
    /// Pipeline output.
    pub rendered: Rendered,
}

struct Request {
    generation: u64,
    job: RenderJob,
    cancel: CancelToken,
}

/// Renders on a dedicated thread, one job at a time.
///
/// Submitting a job cancels the one in flight. Only results for the latest generation are ever
/// returned; anything older is dropped on receipt.
pub struct RenderWorker {
    tx: Option<mpsc::Sender<Request>>,
    rx: mpsc::Receiver<RenderResult>,
    generation: u64,
    cancel: Option<CancelToken>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWorker")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl RenderWorker {
    /// Start a worker using the CPU rasterizer.
    pub fn new() -> PreviewResult<Self> {
        Self::with_backend(Box::new(CpuRasterizer::new()))
    }

    /// Start a worker that rasterizes with `backend`.
    pub fn with_backend(backend: Box<dyn RasterBackend>) -> PreviewResult<Self> {
        let (tx, job_rx) = mpsc::channel::<Request>();
        let (result_tx, rx) = mpsc::channel::<RenderResult>();
        let handle = std::thread::Builder::new()
            .name("stitchview-render".to_string())
            .spawn(move || worker_loop(backend, job_rx, result_tx))?;
        Ok(Self {
            tx: Some(tx),
            rx,
            generation: 0,
            cancel: None,
            handle: Some(handle),
        })
    }

    /// Queue `job`, cancelling whatever is in flight. Returns the job's generation.
    pub fn submit(&mut self, job: RenderJob) -> PreviewResult<u64> {
        self.cancel();
        let cancel = CancelToken::new();
        let generation = self.generation;
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| PreviewError::render("render worker is shut down"))?;
        tx.send(Request {
            generation,
            job,
            cancel: cancel.clone(),
        })
        .map_err(|_| PreviewError::render("render worker thread exited"))?;
        self.cancel = Some(cancel);
        tracing::debug!(generation, "render job submitted");
        Ok(generation)
    }

    /// Cancel the job in flight; its result will never be returned.
    pub fn cancel(&mut self) {
        if let Some(c) = self.cancel.take() {
            c.cancel();
        }
        self.generation += 1;
    }

    /// Generation of the most recent submission (or cancellation).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current result if it is ready.
    pub fn try_recv(&mut self) -> Option<RenderResult> {
        while let Ok(res) = self.rx.try_recv() {
            if let Some(res) = self.accept(res) {
                return Some(res);
            }
        }
        None
    }

    /// Wait up to `timeout` for the current result. A timeout past the clock's range waits until
    /// a result arrives or the worker thread exits.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<RenderResult> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.recv();
        };
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            let res = self.rx.recv_timeout(left).ok()?;
            if let Some(res) = self.accept(res) {
                return Some(res);
            }
        }
    }

    fn recv(&mut self) -> Option<RenderResult> {
        loop {
            let res = self.rx.recv().ok()?;
            if let Some(res) = self.accept(res) {
                return Some(res);
            }
        }
    }

    fn accept(&mut self, res: RenderResult) -> Option<RenderResult> {
        if res.generation != self.generation {
            tracing::debug!(
                stale = res.generation,
                current = self.generation,
                "dropping stale render"
            );
            return None;
        }
        self.cancel = None;
        Some(res)
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        if let Some(c) = self.cancel.take() {
            c.cancel();
        }
        drop(self.tx.take());
        if let Some(h) = self.handle.take()
            && h.join().is_err()
        {
            tracing::warn!("render worker thread panicked");
        }
    }
}

fn worker_loop(
    mut backend: Box<dyn RasterBackend>,
    jobs: mpsc::Receiver<Request>,
    results: mpsc::Sender<RenderResult>,
) {
    while let Ok(mut req) = jobs.recv() {
        // Coalesce: only the newest queued request is worth rendering.
        while let Ok(newer) = jobs.try_recv() {
            req = newer;
        }
        if req.cancel.is_cancelled() {
            continue;
        }
        let rendered = render_with(
            backend.as_mut(),
            &req.job.pattern,
            req.job.viewport,
            &req.job.config,
            &req.cancel,
        );
        let res = RenderResult {
            generation: req.generation,
            pattern: req.job.pattern,
            rendered,
        };
        if results.send(res).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/worker.rs"]
mod tests;
