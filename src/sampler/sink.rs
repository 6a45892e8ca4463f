use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::record::ResultRecord;
use crate::config::SinkConfig;

/// Ordered, append-only destination for result records.
pub trait OutputSink {
    fn append(&mut self, record: &ResultRecord) -> io::Result<()>;

    /// Flush every appended record to durable storage and release the
    /// backing handle. Appends after a close must fail.
    fn close(&mut self) -> io::Result<()>;
}

/// Line-oriented CSV log opened in append mode.
///
/// The file is created when absent, so consecutive runs can keep appending to
/// the same log.
pub struct CsvLogSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    flush_each_record: bool,
    sync_on_close: bool,
}

impl CsvLogSink {
    pub fn open(path: impl AsRef<Path>, config: &SinkConfig) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(CsvLogSink {
            path,
            writer: Some(BufWriter::new(file)),
            flush_each_record: config.flush_each_record,
            sync_on_close: config.sync_on_close,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl OutputSink for CsvLogSink {
    fn append(&mut self, record: &ResultRecord) -> io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(io::Error::other(format!(
                "log {} is already closed",
                self.path.display()
            )));
        };
        writeln!(writer, "{record}")?;
        if self.flush_each_record {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.sync_on_close {
            file.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: u64, cores: Vec<f64>) -> ResultRecord {
        ResultRecord {
            timestamp,
            aggregate_percent: 12.5,
            free_memory_mb: 100.0,
            total_memory_mb: 200.0,
            per_core_percent: cores,
        }
    }

    fn temp_log(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("perfrig_{name}_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn appends_lines_in_order_and_closes() {
        let path = temp_log("sink_order");
        let mut sink = CsvLogSink::open(&path, &SinkConfig::default()).unwrap();
        sink.append(&record(1, vec![1.0])).unwrap();
        sink.append(&record(2, vec![2.0])).unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "1,12.50,100.00,200.00,1.00\n2,12.50,100.00,200.00,2.00\n"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let path = temp_log("sink_resume");
        for ts in [10, 20] {
            let mut sink = CsvLogSink::open(&path, &SinkConfig::default()).unwrap();
            sink.append(&record(ts, Vec::new())).unwrap();
            sink.close().unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("10,"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn append_after_close_fails() {
        let path = temp_log("sink_closed");
        let mut sink = CsvLogSink::open(&path, &SinkConfig::default()).unwrap();
        sink.close().unwrap();
        assert!(sink.append(&record(1, vec![])).is_err());
        // closing twice is harmless
        assert!(sink.close().is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn buffered_records_reach_disk_on_close() {
        let path = temp_log("sink_buffered");
        let config = SinkConfig {
            flush_each_record: false,
            sync_on_close: true,
        };
        let mut sink = CsvLogSink::open(&path, &config).unwrap();
        sink.append(&record(7, vec![50.0, 25.0])).unwrap();
        sink.close().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "7,12.50,100.00,200.00,50.00,25.00\n");
        let _ = std::fs::remove_file(&path);
    }
}
