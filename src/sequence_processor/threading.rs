//! Fan-out / fan-in streaming pipeline.
//!
//! ```text
//! reader ──> [input queue] ──> worker 0 ──> [out 0] ──┐
//!                         ├──> worker 1 ──> [out 1] ──┼──> [merged] ──> collector
//!                         └──> worker N ──> [out N] ──┘
//! ```
//!
//! The reader runs on the calling thread and pushes records into one bounded
//! queue. Workers pull from that queue, so each record is processed exactly
//! once. Every worker has its own bounded output channel; the merger forwards
//! them into a single channel that a lone collector thread drains. All queues
//! are bounded, giving backpressure from the collector back to the reader.

use super::collectors::Collector;
use super::core::{ProcessingStats, Sequence, SequenceProcessor, SequenceReader};
use super::reorder::ReorderBuffer;
use crate::error::{PipelineError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::ProgressBar;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Scope};
use std::time::Instant;

const PROGRESS_INTERVAL: u64 = 10_000;

/// Shared flag that asks a running pipeline to stop.
///
/// Once raised, the reader stops producing, workers stop processing, and the
/// collector drains the remaining results without folding them. The run then
/// fails instead of returning a partial result. Only the caller raises it;
/// a run that fails internally leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An item tagged with the input index of the record it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    pub index: u64,
    pub item: T,
}

type WorkerMessage<T> = Result<Tagged<T>>;

/// Stop condition for one run: the caller's token, or an abort raised by
/// the run itself after a fatal error. Aborts never touch the caller's token.
struct RunSignal<'a> {
    cancel: &'a CancellationToken,
    abort: AtomicBool,
}

impl<'a> RunSignal<'a> {
    fn new(cancel: &'a CancellationToken) -> Self {
        Self {
            cancel,
            abort: AtomicBool::new(false),
        }
    }

    fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.abort.load(Ordering::SeqCst) || self.cancel.is_cancelled()
    }
}

/// A fixed-size worker pool fed from a single bounded queue.
#[derive(Debug, Clone)]
pub struct Pipeline {
    workers: usize,
    channel_capacity: usize,
    keep_order: bool,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Pipeline {
    /// Creates a pool with `workers` threads; `0` uses every available core.
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        Self {
            workers,
            channel_capacity: workers * 2,
            keep_order: false,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Release results in input order instead of completion order
    pub fn keep_order(mut self, keep_order: bool) -> Self {
        self.keep_order = keep_order;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Streams every record from `reader` through `processor` into `collector`.
    ///
    /// The first fatal error (decode failure, transform failure, collector
    /// failure, or cancellation) aborts the whole run; the collector's output
    /// is only produced when every record was folded.
    pub fn run<R, P, C>(
        &self,
        reader: &mut R,
        processor: &P,
        collector: C,
    ) -> Result<(C::Output, ProcessingStats)>
    where
        R: SequenceReader + ?Sized,
        P: SequenceProcessor,
        C: Collector<Item = P::Output>,
    {
        let start = Instant::now();
        let signal = RunSignal::new(&self.cancel);
        let signal = &signal;
        let capacity = self.channel_capacity;

        let (source_result, worker_panic, collected) = thread::scope(|s| {
            let (in_tx, in_rx) = bounded::<Tagged<Sequence>>(capacity);

            let mut handles = Vec::with_capacity(self.workers);
            let mut outputs = Vec::with_capacity(self.workers);
            for id in 0..self.workers {
                let (out_tx, out_rx) = bounded(capacity);
                let in_rx = in_rx.clone();
                handles.push(s.spawn(move || run_worker(id, in_rx, out_tx, processor, signal)));
                outputs.push(out_rx);
            }
            drop(in_rx);

            let merged = merge(s, outputs, capacity);
            let keep_order = self.keep_order;
            let aggregator = s.spawn(move || aggregate(merged, collector, keep_order, signal));

            let source_result = feed(reader, &in_tx, signal, self.progress.as_ref());
            drop(in_tx);

            let mut worker_panic = None;
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && worker_panic.is_none() {
                    signal.abort();
                    worker_panic = Some(id);
                }
            }
            (source_result, worker_panic, aggregator.join())
        });

        let records = source_result?;
        if let Some(id) = worker_panic {
            return Err(PipelineError::Panicked(format!("worker {}", id)));
        }
        let collector =
            collected.map_err(|_| PipelineError::Panicked("collector".to_string()))??;
        let output = collector.finish()?;

        let stats = ProcessingStats {
            records,
            workers: self.workers,
            elapsed: start.elapsed(),
        };
        if let Some(progress) = &self.progress {
            progress.set_position(records);
            progress.finish_and_clear();
        }
        info!(
            "Processed {} records with {} workers in {:.2?} ({:.0} records/s)",
            stats.records,
            stats.workers,
            stats.elapsed,
            stats.records_per_second()
        );
        Ok((output, stats))
    }
}

/// Pulls records from the reader into the shared input queue.
fn feed<R: SequenceReader + ?Sized>(
    reader: &mut R,
    tx: &Sender<Tagged<Sequence>>,
    signal: &RunSignal<'_>,
    progress: Option<&ProgressBar>,
) -> Result<u64> {
    let mut index = 0u64;
    while !signal.is_stopped() {
        let sequence = match reader.next_sequence() {
            None => break,
            Some(Ok(sequence)) => sequence,
            Some(Err(e)) => {
                signal.abort();
                return Err(e);
            }
        };
        // Every worker is gone, which only happens once the run is aborting
        if tx.send(Tagged { index, item: sequence }).is_err() {
            break;
        }
        index += 1;
        if index % PROGRESS_INTERVAL == 0 {
            if let Some(progress) = progress {
                progress.set_position(index);
            }
        }
    }
    Ok(index)
}

fn run_worker<P: SequenceProcessor>(
    id: usize,
    input: Receiver<Tagged<Sequence>>,
    output: Sender<WorkerMessage<P::Output>>,
    processor: &P,
    signal: &RunSignal<'_>,
) {
    let start = Instant::now();
    let mut processed = 0u64;

    for Tagged { index, item } in input.iter() {
        if signal.is_stopped() {
            break;
        }
        let message = processor
            .process(item)
            .map(|item| Tagged { index, item });
        let failed = message.is_err();
        if failed {
            signal.abort();
        }
        if output.send(message).is_err() || failed {
            break;
        }
        processed += 1;
    }

    let secs = start.elapsed().as_secs_f64();
    debug!(
        "Worker {} finished: {} records processed ({:.0} records/s)",
        id,
        processed,
        if secs > 0.0 { processed as f64 / secs } else { 0.0 }
    );
}

/// Merges several channels into one.
///
/// Each input gets a forwarder thread holding a clone of the merged sender.
/// The merged channel disconnects only once every forwarder has dropped its
/// sender, i.e. after all inputs have closed and been fully forwarded.
pub fn merge<'scope, T: Send + 'scope>(
    scope: &'scope Scope<'scope, '_>,
    inputs: Vec<Receiver<T>>,
    capacity: usize,
) -> Receiver<T> {
    let (tx, rx) = bounded(capacity);
    for input in inputs {
        let tx = tx.clone();
        scope.spawn(move || {
            for item in input {
                if tx.send(item).is_err() {
                    break;
                }
            }
        });
    }
    rx
}

/// Drains the merged stream into `collector`.
///
/// After the first error, or once cancelled, results are still drained so
/// upstream threads never block, but nothing more is folded.
fn aggregate<C: Collector>(
    merged: Receiver<WorkerMessage<C::Item>>,
    mut collector: C,
    keep_order: bool,
    signal: &RunSignal<'_>,
) -> Result<C> {
    let mut first_error: Option<PipelineError> = None;
    let mut reorder = keep_order.then(ReorderBuffer::new);

    for message in merged {
        match message {
            Err(e) => {
                signal.abort();
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Ok(_) if first_error.is_some() || signal.is_stopped() => {}
            Ok(Tagged { index, item }) => {
                let folded = match reorder.as_mut() {
                    Some(buffer) => {
                        buffer.insert(index, item);
                        release_ready(buffer, &mut collector)
                    }
                    None => collector.collect(item),
                };
                if let Err(e) = folded {
                    signal.abort();
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None if signal.is_stopped() => Err(PipelineError::Cancelled),
        None => {
            debug_assert!(reorder.map_or(true, |buffer| buffer.is_empty()));
            Ok(collector)
        }
    }
}

fn release_ready<C: Collector>(
    buffer: &mut ReorderBuffer<C::Item>,
    collector: &mut C,
) -> Result<()> {
    while let Some(item) = buffer.pop_next() {
        collector.collect(item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::collectors::{SinkCollector, SummaryCollector};
    use crate::sequence_processor::core::Verdict;
    use crate::sequence_processor::processors::MetricsProcessor;
    use std::io;

    fn records(n: usize) -> Vec<Result<Sequence>> {
        (0..n)
            .map(|i| Ok(Sequence::new(format!("r{}", i), "ACGT".repeat(i % 7 + 1))))
            .collect()
    }

    /// Keeps every record; lets tests observe merge behaviour
    struct PassThrough;

    impl SequenceProcessor for PassThrough {
        type Output = Verdict;

        fn process(&self, sequence: Sequence) -> Result<Verdict> {
            Ok(Verdict::Kept(sequence))
        }
    }

    #[test]
    fn test_every_record_processed_once() {
        for workers in [1, 3, 8] {
            let mut reader = records(500).into_iter();
            let (out, stats) = Pipeline::new(workers)
                .run(&mut reader, &PassThrough, SinkCollector::new(Vec::new()))
                .unwrap();
            let (written, counts) = out;
            assert_eq!(stats.records, 500);
            assert_eq!(counts.kept, 500);

            let mut ids: Vec<usize> = written
                .iter()
                .map(|s| s.id[1..].parse().unwrap())
                .collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..500).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_keep_order() {
        let mut reader = records(1000).into_iter();
        let ((written, _), _) = Pipeline::new(6)
            .keep_order(true)
            .run(&mut reader, &PassThrough, SinkCollector::new(Vec::new()))
            .unwrap();
        let ids: Vec<String> = written.into_iter().map(|s| s.id).collect();
        let expected: Vec<String> = (0..1000).map(|i| format!("r{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_decode_error_aborts() {
        let mut input = records(100);
        input.insert(50, Err(PipelineError::decode(50, anyhow::anyhow!("truncated"))));
        let mut reader = input.into_iter();

        let result = Pipeline::new(4).run(
            &mut reader,
            &MetricsProcessor,
            SummaryCollector::<io::Sink>::new(&[50]).unwrap(),
        );
        assert!(matches!(result, Err(PipelineError::Decode { record: 50, .. })));
    }

    #[test]
    fn test_quality_error_aborts() {
        let mut input = records(200);
        input[120] = Ok(Sequence::new("broken", "ACGT").with_quality(vec![b'I', b'I', 0x01, b'I']));
        let mut reader = input.into_iter();

        let result = Pipeline::new(4).run(
            &mut reader,
            &MetricsProcessor,
            SummaryCollector::<io::Sink>::new(&[50]).unwrap(),
        );
        match result {
            Err(PipelineError::Quality { record, .. }) => assert_eq!(record, "broken"),
            other => panic!("expected quality error, got {:?}", other.map(|(r, _)| r)),
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let mut reader = records(10).into_iter();
        let result = Pipeline::new(2)
            .with_cancellation(token)
            .run(&mut reader, &PassThrough, SinkCollector::new(Vec::new()));
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[test]
    fn test_cancel_mid_stream() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let mut reader = records(10_000).into_iter().enumerate().map(move |(i, r)| {
            if i == 100 {
                trigger.cancel();
            }
            r
        });
        let result = Pipeline::new(4)
            .with_cancellation(token)
            .run(&mut reader, &MetricsProcessor, SummaryCollector::<io::Sink>::new(&[50]).unwrap());
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[test]
    fn test_collector_error_aborts() {
        struct FailingWriter;

        impl crate::sequence_processor::writers::SequenceWriter for FailingWriter {
            fn write_sequence(&mut self, _: &Sequence) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let mut reader = records(1000).into_iter();
        let result = Pipeline::new(3).run(&mut reader, &PassThrough, SinkCollector::new(FailingWriter));
        assert!(matches!(result, Err(PipelineError::Sink(_))));
    }

    #[test]
    fn test_pipeline_reusable_after_failed_run() {
        let token = CancellationToken::new();
        let pipeline = Pipeline::new(3).with_cancellation(token.clone());

        let mut input = records(50);
        input[10] = Ok(Sequence::new("bad", "AC").with_quality(vec![0x01, b'I']));
        let mut reader = input.into_iter();
        let result = pipeline.run(
            &mut reader,
            &MetricsProcessor,
            SummaryCollector::<io::Sink>::new(&[50]).unwrap(),
        );
        assert!(matches!(result, Err(PipelineError::Quality { .. })));
        assert!(!token.is_cancelled());

        let valid: Vec<Result<Sequence>> = vec![Ok(Sequence::new("ok", "ACGT"))];
        let mut reader = valid.into_iter();
        let (report, stats) = pipeline
            .run(
                &mut reader,
                &MetricsProcessor,
                SummaryCollector::<io::Sink>::new(&[50]).unwrap(),
            )
            .unwrap();
        assert_eq!(stats.records, 1);
        assert_eq!(report.total_bases, 4);
    }

    #[test]
    fn test_merge_closes_after_all_inputs() {
        let merged: Vec<u32> = thread::scope(|s| {
            let mut inputs = Vec::new();
            for w in 0..5u32 {
                let (tx, rx) = bounded(2);
                inputs.push(rx);
                s.spawn(move || {
                    for i in 0..100 {
                        tx.send(w * 1000 + i).unwrap();
                    }
                });
            }
            merge(s, inputs, 4).iter().collect()
        });
        assert_eq!(merged.len(), 500);
        let mut sorted = merged.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 500);
    }

    #[test]
    fn test_zero_workers_uses_available_cores() {
        assert_eq!(Pipeline::new(0).workers(), num_cpus::get());
        assert_eq!(Pipeline::new(3).workers(), 3);
    }
}
