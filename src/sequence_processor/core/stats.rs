use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessingStats {
    pub records: u64,
    pub workers: usize,
    pub elapsed: Duration,
}

impl ProcessingStats {
    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}
