/// Progress of the extraction of a single run, sent from the processing thread
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub run_number: u32,
    pub records_done: usize,
}

impl WorkerStatus {
    pub fn new(progress: f32, run_number: u32, records_done: usize) -> Self {
        Self {
            progress,
            run_number,
            records_done,
        }
    }
}
