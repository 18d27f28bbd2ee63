// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render pipeline.
//!
//! The calling thread enumerates every pixel onto a work queue.  A
//! fixed pool of workers pulls pixels off it, maps each to the complex
//! plane, runs the escape-time test, and pushes the result onto a
//! results queue.  A single compositor drains the results queue and is
//! the only thing that ever writes to the output buffer.
//!
//! Shutdown happens in two phases.  Dropping the generator's sender
//! closes the work queue; once every worker has been joined, the last
//! results sender is gone and the results queue is closed.  Only then
//! is the compositor joined.  A buffer is handed back only when both
//! phases completed cleanly and every cell has been written.

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info, trace, warn};
use std::any::Any;
use std::time::{Duration, Instant};

use crate::cancel::{CancelToken, NeverCancel, GENERATOR_POLL_BATCH};
use crate::canvas::{Canvas, OutputBuffer};
use crate::colour;
use crate::config::RenderConfig;
use crate::errors::{ConfigError, RenderError};
use crate::escape::{self, SampleResult};
use crate::planes::{PlaneMapper, Pixel};

/// Results queue slots per worker.
const RESULTS_PER_WORKER: usize = 64;

/// What a successful render looked like.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSummary {
    /// Cells written, which is always the whole raster.
    pub samples: usize,
    /// How many of those were inside the set.
    pub in_set: usize,
    /// Wall time from first enqueue to the compositor finishing.
    pub elapsed: Duration,
}

/// Renders the whole field described by `config` and returns the
/// finished buffer.  Blocks until every cell has been written.
pub fn render_field(config: &RenderConfig) -> Result<OutputBuffer, RenderError> {
    render_field_with_cancel(config, &NeverCancel)
}

/// As `render_field`, but stops early with `RenderError::Cancelled`
/// once `token` fires.
pub fn render_field_with_cancel<T: CancelToken>(
    config: &RenderConfig,
    token: &T,
) -> Result<OutputBuffer, RenderError> {
    config.validate()?;
    let mut buffer = OutputBuffer::new(config.width, config.height)?;
    render_into(config, &mut buffer, token)?;
    Ok(buffer)
}

/// Renders into a caller-supplied canvas, which must be exactly the
/// configured raster size.  Nothing is spawned if it is not.
pub fn render_into<C, T>(
    config: &RenderConfig,
    canvas: &mut C,
    token: &T,
) -> Result<RenderSummary, RenderError>
where
    C: Canvas + Send,
    T: CancelToken,
{
    let mapper = config.mapper()?;
    if canvas.width() != mapper.width() || canvas.height() != mapper.height() {
        return Err(ConfigError::CanvasMismatch(
            canvas.width(),
            canvas.height(),
            mapper.width(),
            mapper.height(),
        )
        .into());
    }
    debug!("rendering {:?}", config);
    let max_iterations = config.max_iterations;
    run(&mapper, config.workers, canvas, token, |pixel| SampleResult {
        pixel,
        escape: escape::evaluate(mapper.pixel_to_point(pixel), max_iterations),
    })
}

#[derive(Copy, Clone, Debug, Default)]
struct WorkerReport {
    processed: usize,
    skipped: usize,
}

#[derive(Copy, Clone, Debug, Default)]
struct Tally {
    written: usize,
    in_set: usize,
}

/// The pipeline proper, generic over how a pixel becomes a sample so
/// that the shutdown paths can be exercised directly.
fn run<C, T, F>(
    mapper: &PlaneMapper,
    workers: usize,
    canvas: &mut C,
    token: &T,
    sampler: F,
) -> Result<RenderSummary, RenderError>
where
    C: Canvas + Send,
    T: CancelToken,
    F: Fn(Pixel) -> SampleResult + Sync,
{
    let started = Instant::now();
    // Workers beyond one per pixel would only ever see a closed queue.
    let workers = workers.min(mapper.len());
    let (work_tx, work_rx) = channel::bounded::<Pixel>(mapper.len());
    let (result_tx, result_rx) = channel::bounded::<SampleResult>(
        workers.saturating_mul(RESULTS_PER_WORKER).min(mapper.len()),
    );
    let sampler = &sampler;

    let outcome = crossbeam::scope(|spawner| {
        let compositor = spawner.spawn(move |_| composite(canvas, result_rx));

        let pool: Vec<_> = (0..workers)
            .map(|id| {
                let work = work_rx.clone();
                let results = result_tx.clone();
                spawner.spawn(move |_| work_loop(id, work, results, sampler, token))
            })
            .collect();
        // The pool holds the only remaining ends now.
        drop(work_rx);
        drop(result_tx);

        let enqueued = generate(mapper, work_tx, token);
        trace!("enqueued {} of {} pixels", enqueued, mapper.len());

        // Phase one: every worker has finished emitting, so the
        // results queue is closed once the last one is joined.
        let mut faults = Vec::new();
        let mut processed = 0;
        for handle in pool {
            match handle.join() {
                Ok(report) => processed += report.processed,
                Err(payload) => faults.push(RenderError::WorkerFault(format!(
                    "worker panicked: {}",
                    panic_message(&*payload)
                ))),
            }
        }
        trace!("workers done, {} samples produced", processed);

        // Phase two: the compositor drains whatever is left.
        let tally = match compositor.join() {
            Ok(Ok(tally)) => Some(tally),
            Ok(Err(fault)) => {
                faults.push(fault);
                None
            }
            Err(payload) => {
                faults.push(RenderError::CompositorFault(format!(
                    "compositor panicked: {}",
                    panic_message(&*payload)
                )));
                None
            }
        };
        (faults, tally)
    });

    let (faults, tally) = outcome.map_err(|payload| {
        RenderError::WorkerFault(format!("render thread panicked: {}", panic_message(&*payload)))
    })?;

    let mut faults = faults.into_iter();
    if let Some(first) = faults.next() {
        for other in faults {
            warn!("additional render fault: {}", other);
        }
        return Err(first);
    }

    let tally = tally.unwrap_or_default();
    if tally.written != mapper.len() {
        if let Some(cancelled) = token.explain_shortfall(tally.written, mapper.len()) {
            warn!("{}", cancelled);
            return Err(cancelled);
        }
        return Err(RenderError::CompositorFault(format!(
            "{} of {} cells written",
            tally.written,
            mapper.len()
        )));
    }

    let summary = RenderSummary {
        samples: tally.written,
        in_set: tally.in_set,
        elapsed: started.elapsed(),
    };
    info!(
        "rendered {}x{} with {} workers in {:?}",
        mapper.width(),
        mapper.height(),
        workers,
        summary.elapsed
    );
    Ok(summary)
}

/// Enqueues every pixel once, then closes the queue by dropping the
/// sender.  Stops early if the token fires or if no worker is left to
/// receive.
fn generate<T: CancelToken>(mapper: &PlaneMapper, work: Sender<Pixel>, token: &T) -> usize {
    let mut sent = 0;
    for pixel in mapper.pixels() {
        if sent % GENERATOR_POLL_BATCH == 0 && token.is_cancelled() {
            break;
        }
        if work.send(pixel).is_err() {
            break;
        }
        sent += 1;
    }
    sent
}

fn work_loop<F, T>(
    id: usize,
    work: Receiver<Pixel>,
    results: Sender<SampleResult>,
    sampler: &F,
    token: &T,
) -> WorkerReport
where
    F: Fn(Pixel) -> SampleResult,
    T: CancelToken,
{
    let mut report = WorkerReport::default();
    for pixel in work.iter() {
        if token.is_cancelled() {
            report.skipped += 1;
            continue;
        }
        // A closed results queue means the compositor has already
        // failed; its fault is the one worth reporting.
        if results.send(sampler(pixel)).is_err() {
            trace!("worker {} lost the compositor", id);
            break;
        }
        report.processed += 1;
    }
    trace!(
        "worker {} exiting: {} processed, {} skipped",
        id,
        report.processed,
        report.skipped
    );
    report
}

fn composite<C: Canvas>(canvas: &mut C, results: Receiver<SampleResult>) -> Result<Tally, RenderError> {
    let mut tally = Tally::default();
    for sample in results.iter() {
        canvas.put(sample.pixel, colour::sample_colour(&sample.escape))?;
        tally.written += 1;
        if sample.escape.in_set {
            tally.in_set += 1;
        }
    }
    Ok(tally)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
