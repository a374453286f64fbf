//! Common test utilities

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use urlpoll::prober::Prober;
use urlpoll::queue::WorkQueue;
use urlpoll::scheduler::Scheduler;
use urlpoll::sink::LogSink;

/// Build a scheduler whose sink writes into `dir`
pub fn build_scheduler(urls: Vec<String>, workers: usize, dir: &TempDir) -> Scheduler {
    let sink = Arc::new(LogSink::new(dir.path().join("log.json")));
    Scheduler::new(
        WorkQueue::new(urls),
        Arc::new(Prober::new().expect("client should build")),
        sink,
        workers,
    )
}

/// Poll the sink until it holds at least `count` records or `timeout` passes
#[allow(dead_code)]
pub async fn wait_for_records(sink: &LogSink, count: usize, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if sink.len().await >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
