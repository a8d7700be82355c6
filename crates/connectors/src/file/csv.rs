use async_trait::async_trait;
use csv::{Reader, StringRecord, Writer};
use engine_core::{
    error::{PullError, PushError},
    puller::Puller,
    pusher::Pusher,
};
use model::{
    core::value::{FieldValue, Value},
    records::record::Record,
};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

fn entity_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("csv")
        .to_string()
}

/// Streaming CSV puller.
///
/// The file is opened on the first `pull`, and rows are decoded chunk by
/// chunk; the whole file is never held in memory. CSV carries no type
/// information, so every field becomes a `Value::String` (absent trailing
/// fields become `Value::Null`).
pub struct CsvPuller {
    path: PathBuf,
    entity: String,
    delimiter: u8,
    reader: Option<CsvReadState>,
    exhausted: bool,
}

struct CsvReadState {
    headers: Vec<String>,
    reader: Reader<File>,
}

impl CsvPuller {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entity = entity_from_path(&path);
        CsvPuller {
            path,
            entity,
            delimiter: b',',
            reader: None,
            exhausted: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_entity(mut self, entity: &str) -> Self {
        self.entity = entity.to_string();
        self
    }

    fn open(&self) -> Result<CsvReadState, PullError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|err| PullError::Unavailable(format!("{}: {err}", self.path.display())))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|err| PullError::Malformed(format!("invalid header row: {err}")))?
            .iter()
            .map(str::to_string)
            .collect();

        debug!(
            path = %self.path.display(),
            columns = headers.len(),
            "Opened CSV source"
        );
        Ok(CsvReadState { headers, reader })
    }
}

#[async_trait]
impl Puller for CsvPuller {
    /// Counting rows would mean scanning the whole file, so the count is
    /// reported as unknown rather than paid for up front.
    async fn count(&self) -> Result<Option<u64>, PullError> {
        Ok(None)
    }

    async fn pull(&mut self, max_records: usize) -> Result<Option<Vec<Record>>, PullError> {
        if self.exhausted {
            return Ok(None);
        }

        if self.reader.is_none() {
            let opened = self.open()?;
            self.reader = Some(opened);
        }
        let Some(state) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut rows = Vec::new();
        let mut raw = StringRecord::new();
        while rows.len() < max_records {
            match state.reader.read_record(&mut raw) {
                Ok(true) => {
                    let fields = state
                        .headers
                        .iter()
                        .enumerate()
                        .map(|(idx, name)| {
                            let value = raw
                                .get(idx)
                                .map(|field| Value::String(field.to_string()))
                                .unwrap_or(Value::Null);
                            FieldValue::new(name, value)
                        })
                        .collect();
                    rows.push(Record::new(&self.entity, fields));
                }
                Ok(false) => {
                    self.exhausted = true;
                    break;
                }
                Err(err) => {
                    return Err(PullError::Malformed(format!(
                        "{}: {err}",
                        self.path.display()
                    )));
                }
            }
        }

        if rows.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        Ok(Some(rows))
    }
}

/// CSV pusher: creates the destination file on the first batch and writes a
/// header row taken from the first record's field names. Later records are
/// projected onto those headers; fields they lack are written empty.
pub struct CsvPusher {
    path: PathBuf,
    delimiter: u8,
    writer: Option<CsvWriteState>,
}

struct CsvWriteState {
    headers: Vec<String>,
    writer: Writer<File>,
}

impl CsvPusher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvPusher {
            path: path.into(),
            delimiter: b',',
            writer: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[async_trait]
impl Pusher for CsvPusher {
    async fn push(&mut self, records: Vec<Record>) -> Result<u64, PushError> {
        if records.is_empty() {
            return Ok(0);
        }

        if self.writer.is_none() {
            let headers = records[0].field_names();
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .from_path(&self.path)
                .map_err(|err| {
                    PushError::Unavailable(format!("{}: {err}", self.path.display()))
                })?;
            writer
                .write_record(&headers)
                .map_err(|err| PushError::Rejected(format!("header row: {err}")))?;
            debug!(
                path = %self.path.display(),
                columns = headers.len(),
                "Created CSV destination"
            );
            self.writer = Some(CsvWriteState { headers, writer });
        }
        let Some(state) = self.writer.as_mut() else {
            return Ok(0);
        };

        let mut written = 0u64;
        for record in &records {
            let row: Vec<String> = state
                .headers
                .iter()
                .map(|name| record.get_value(name).as_string().unwrap_or_default())
                .collect();
            state
                .writer
                .write_record(&row)
                .map_err(|err| PushError::Rejected(err.to_string()))?;
            written += 1;
        }
        state.writer.flush()?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const USERS_CSV: &str = "id,email\n1,a@b.c\n2,b@c.d\n3,c@d.e\n";

    fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[tokio::test]
    async fn count_is_unknown_without_a_scan() {
        let dir = tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "users.csv", USERS_CSV);

        let puller = CsvPuller::new(&path);
        assert_eq!(puller.count().await.expect("count"), None);
    }

    #[tokio::test]
    async fn pull_streams_rows_in_chunks() {
        let dir = tempdir().expect("tempdir");
        let path = write_fixture(dir.path(), "users.csv", USERS_CSV);

        let mut puller = CsvPuller::new(&path);
        let first = puller.pull(2).await.expect("pull").expect("chunk");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].entity, "users");
        assert_eq!(first[0].get_value("id"), Value::String("1".into()));

        let second = puller.pull(2).await.expect("pull").expect("chunk");
        assert_eq!(second.len(), 1);
        assert!(puller.pull(2).await.expect("pull").is_none());
    }

    #[tokio::test]
    async fn missing_file_surfaces_as_unavailable() {
        let dir = tempdir().expect("tempdir");
        let mut puller = CsvPuller::new(dir.path().join("absent.csv"));

        let err = puller.pull(10).await.expect_err("pull fails");
        assert!(matches!(err, PullError::Unavailable(_)));
    }

    #[tokio::test]
    async fn pushed_rows_round_trip_through_a_fresh_puller() {
        let dir = tempdir().expect("tempdir");
        let source = write_fixture(dir.path(), "users.csv", USERS_CSV);
        let dest = dir.path().join("out.csv");

        let mut puller = CsvPuller::new(&source);
        let mut pusher = CsvPusher::new(&dest);

        while let Some(batch) = puller.pull(2).await.expect("pull") {
            pusher.push(batch).await.expect("push");
        }

        let mut check = CsvPuller::new(&dest);
        let rows = check.pull(100).await.expect("pull").expect("rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].get_value("email"), Value::String("c@d.e".into()));
    }
}
