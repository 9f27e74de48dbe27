use crate::geom::Geometry;
use crate::wkt;
use crossbeam_utils::atomic::AtomicCell;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::{thread, time};

const PROGRESS_EVERY: u64 = 100_000;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
  #[error("a worker thread panicked")]
  WorkerPanicked,
}

/// One output line. Exactly one of `geometry` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
  pub line: usize,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub geometry: Option<Geometry>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
  pub converted: u64,
  pub rejected: u64,
}

struct WorkJob {
  seq: u64,
  line: usize,
  text: String,
}

pub fn default_workers() -> usize {
  std::cmp::max(num_cpus::get().saturating_sub(2), 2)
}

pub fn convert_line(line: usize, text: &str) -> GeometryRecord {
  let (geometry, error) = match wkt::decode_geometry(text) {
    Ok(Some(geometry)) => {
      debug!(
        "line {}: {} with {} coordinates",
        line,
        geometry.kind(),
        geometry.coordinates().len()
      );
      (Some(geometry), None)
    }
    Ok(None) => (
      None,
      Some("not a POINT, MULTIPOINT or POLYGON".to_string()),
    ),
    Err(e) => (None, Some(e.to_string())),
  };
  GeometryRecord {
    line,
    geometry,
    error,
  }
}

fn initialize_processors(
  workers: usize,
  process_queue_rx: crossbeam_channel::Receiver<WorkJob>,
  output_queue_tx: crossbeam_channel::Sender<(u64, GeometryRecord)>,
  rejected: Arc<AtomicCell<u64>>,
) -> Vec<thread::JoinHandle<()>> {
  let mut processor_thread_handles = Vec::with_capacity(workers);

  for worker_id in 0..workers {
    let thread_process_queue_rx = process_queue_rx.clone();
    let thread_output_queue_tx = output_queue_tx.clone();
    let thread_rejected = Arc::clone(&rejected);
    processor_thread_handles.push(thread::spawn(move || {
      while let Ok(job) = thread_process_queue_rx.recv() {
        let record = convert_line(job.line, &job.text);
        if record.error.is_some() {
          thread_rejected.fetch_add(1);
        }
        // the writer only goes away on an IO error, which it reports itself
        if thread_output_queue_tx.send((job.seq, record)).is_err() {
          break;
        }
      }
      debug!("Worker {} finished.", worker_id);
    }));
  }
  processor_thread_handles
}

// Records arrive in any order; they are written in input order.
fn initialize_writer(
  output: PathBuf,
  queue: crossbeam_channel::Receiver<(u64, GeometryRecord)>,
) -> thread::JoinHandle<io::Result<u64>> {
  thread::spawn(move || {
    let mut last_ts = time::Instant::now();
    let mut out = BufWriter::new(File::create(output)?);
    let mut pending: BTreeMap<u64, GeometryRecord> = BTreeMap::new();
    let mut next_seq = 0;

    while let Ok((seq, record)) = queue.recv() {
      pending.insert(seq, record);
      while let Some(record) = pending.remove(&next_seq) {
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
        next_seq += 1;

        if next_seq % PROGRESS_EVERY == 0 {
          let ts = time::Instant::now();
          let elapsed = ts.duration_since(last_ts);
          info!(
            "[output] {} records in {}ms ({:.4}ms/record)",
            next_seq,
            elapsed.as_millis(),
            elapsed.as_millis() as f64 / (PROGRESS_EVERY as f64),
          );
          last_ts = ts;
        }
      }
    }
    out.flush()?;
    Ok(next_seq)
  })
}

/// Decodes every non-blank line of `input` as WKT and writes one JSON
/// [`GeometryRecord`] per line to `output`, in input order.
pub fn convert(input: PathBuf, output: PathBuf, workers: usize) -> Result<BatchSummary, BatchError> {
  info!(
    "Converting {} to {} with {} workers",
    input.display(),
    output.display(),
    workers
  );
  let reader = BufReader::new(File::open(&input)?);

  let rejected = Arc::new(AtomicCell::new(0u64));
  let (process_queue_tx, process_queue_rx) = crossbeam_channel::unbounded::<WorkJob>();
  let (record_queue_tx, record_queue_rx) = crossbeam_channel::unbounded();
  let writer_handle = initialize_writer(output, record_queue_rx);
  let processor_handles = initialize_processors(
    workers.max(1),
    process_queue_rx,
    record_queue_tx,
    Arc::clone(&rejected),
  );

  let mut seq = 0;
  let mut read_result = Ok(());
  for (idx, line) in reader.lines().enumerate() {
    let text = match line {
      Ok(text) => text,
      Err(e) => {
        read_result = Err(e);
        break;
      }
    };
    if text.trim().is_empty() {
      continue;
    }
    let job = WorkJob {
      seq,
      line: idx + 1,
      text,
    };
    if process_queue_tx.send(job).is_err() {
      break;
    }
    seq += 1;
  }
  drop(process_queue_tx);

  for handle in processor_handles {
    handle.join().map_err(|_| BatchError::WorkerPanicked)?;
  }
  let written = writer_handle
    .join()
    .map_err(|_| BatchError::WorkerPanicked)??;
  read_result?;

  let rejected = rejected.load();
  info!("Done, {} records ({} rejected)", written, rejected);
  Ok(BatchSummary {
    converted: written - rejected,
    rejected,
  })
}
