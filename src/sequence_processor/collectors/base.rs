use crate::error::Result;

/// Single-threaded consumer of the merged worker output.
///
/// A collector is only ever driven by one thread, so it needs no locking.
pub trait Collector: Send {
    type Item: Send;
    type Output;

    /// Folds one result into the collector
    fn collect(&mut self, item: Self::Item) -> Result<()>;

    /// Called once after the stream has been fully drained without error
    fn finish(self) -> Result<Self::Output>;
}
