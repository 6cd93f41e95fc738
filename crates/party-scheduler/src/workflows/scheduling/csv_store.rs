use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::domain::{parse_iso_date, ParticipantResponse, PreferenceLevel, Role};
use super::repository::{RepositoryError, ResponseRepository};

const FILE_PREFIX: &str = "response_";
const FILE_SUFFIX: &str = ".csv";
const ROLE_HEADER: &str = "role";
/// Role column header used by Japanese-language response files.
const LOCALIZED_ROLE_HEADER: &str = "役職";

/// Directory of `response_<n>.csv` files, one submission per file. Each file
/// has a `role` column followed by one column per date.
///
/// All calls do blocking file I/O under a mutex; async callers should run
/// them off the runtime threads.
pub struct CsvResponseStore {
    root: PathBuf,
    next_sequence: Mutex<u64>,
}

impl CsvResponseStore {
    /// Open (creating if needed) a response directory and continue its numbering.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, RepositoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let last = sequenced_files(&root)?
            .last()
            .map(|(sequence, _)| *sequence)
            .unwrap_or(0);

        Ok(Self {
            root,
            next_sequence: Mutex::new(last + 1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, sequence: u64) -> PathBuf {
        self.root.join(format!("{FILE_PREFIX}{sequence}{FILE_SUFFIX}"))
    }
}

impl ResponseRepository for CsvResponseStore {
    fn append(&self, response: ParticipantResponse) -> Result<u64, RepositoryError> {
        let mut next = self
            .next_sequence
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sequence lock poisoned".to_string()))?;

        // Another writer may already own the next number; skip past it.
        let (sequence, path, file) = loop {
            let sequence = *next;
            let path = self.path_for(sequence);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (sequence, path, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => *next += 1,
                Err(err) => return Err(err.into()),
            }
        };
        *next += 1;

        write_or_discard(file, &path, &response)?;

        debug!(
            sequence,
            path = %path.display(),
            role = response.role.key(),
            "stored response"
        );
        Ok(sequence)
    }

    fn list_all(&self) -> Result<Vec<ParticipantResponse>, RepositoryError> {
        // Holding the lock keeps a half-written file out of the snapshot.
        let _guard = self
            .next_sequence
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sequence lock poisoned".to_string()))?;

        let mut responses = Vec::new();
        for (_, path) in sequenced_files(&self.root)? {
            let file = fs::File::open(&path)?;
            let parsed = parse_responses(file).map_err(|err| match err {
                ParseFailure::Csv(err) => RepositoryError::Csv(err),
                ParseFailure::Invalid(detail) => RepositoryError::Corrupt {
                    file: path.display().to_string(),
                    detail,
                },
            })?;
            responses.extend(parsed);
        }

        Ok(responses)
    }
}

fn sequenced_files(root: &Path) -> Result<Vec<(u64, PathBuf)>, RepositoryError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let sequence = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(FILE_PREFIX))
            .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
            .and_then(|digits| digits.parse::<u64>().ok());

        if let Some(sequence) = sequence {
            files.push((sequence, path));
        }
    }

    files.sort_by_key(|(sequence, _)| *sequence);
    Ok(files)
}

/// Write `response` to the freshly created file at `path`, removing the file
/// again if the write fails so no torn file is left for `list_all`.
fn write_or_discard<W: std::io::Write>(
    writer: W,
    path: &Path,
    response: &ParticipantResponse,
) -> Result<(), RepositoryError> {
    let outcome = write_response(writer, response);
    if outcome.is_err() {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(
                path = %path.display(),
                error = %cleanup,
                "failed to remove partial response file"
            );
        }
    }
    outcome
}

pub(crate) fn write_response<W: std::io::Write>(
    writer: W,
    response: &ParticipantResponse,
) -> Result<(), RepositoryError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![ROLE_HEADER.to_string()];
    header.extend(response.preferences.keys().map(|date| date.to_string()));
    csv_writer.write_record(&header)?;

    let mut row = vec![response.role.key().to_string()];
    row.extend(response.preferences.values().map(|level| level.key().to_string()));
    csv_writer.write_record(&row)?;

    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug)]
pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Invalid(String),
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Parse every row of a stored response file. Columns that are neither the
/// role column nor a date are skipped; blank cells read as unanswered.
pub(crate) fn parse_responses<R: Read>(
    reader: R,
) -> Result<Vec<ParticipantResponse>, ParseFailure> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let role_index = headers
        .iter()
        .position(|header| {
            header.eq_ignore_ascii_case(ROLE_HEADER) || header == LOCALIZED_ROLE_HEADER
        })
        .ok_or_else(|| ParseFailure::Invalid("missing role column".to_string()))?;

    let mut date_columns: Vec<(usize, NaiveDate)> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if index == role_index {
            continue;
        }
        match parse_iso_date(header) {
            Some(date) => date_columns.push((index, date)),
            None => warn!(column = header, "ignoring non-date column in stored response"),
        }
    }

    let mut responses = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let role_cell = record.get(role_index).unwrap_or_default();
        let role = Role::from_label(role_cell)
            .ok_or_else(|| ParseFailure::Invalid(format!("unknown role '{role_cell}'")))?;

        let mut preferences = BTreeMap::new();
        for (index, date) in &date_columns {
            let cell = record.get(*index).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            let level = PreferenceLevel::from_label(cell).ok_or_else(|| {
                ParseFailure::Invalid(format!("unknown preference '{cell}' for {date}"))
            })?;
            preferences.insert(*date, level);
        }

        responses.push(ParticipantResponse { role, preferences });
    }

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).expect("valid date")
    }

    #[test]
    fn written_rows_parse_back() {
        let response = ParticipantResponse::new(Role::Manager)
            .with_preference(day(1), PreferenceLevel::ProbablyCan)
            .with_preference(day(2), PreferenceLevel::DefinitelyCannot);

        let mut buffer = Vec::new();
        write_response(&mut buffer, &response).expect("write succeeds");
        let text = String::from_utf8(buffer.clone()).expect("utf8");
        assert!(text.starts_with("role,2025-10-01,2025-10-02"));

        let parsed = parse_responses(Cursor::new(buffer)).expect("parse succeeds");
        assert_eq!(parsed, vec![response]);
    }

    #[test]
    fn reads_files_from_the_japanese_form() {
        let csv = "役職,2025-10-01,2025-10-02\n本部長クラス,絶対行ける,たぶん行ける\n";
        let parsed = parse_responses(csv.as_bytes()).expect("parse succeeds");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].role, Role::Director);
        assert_eq!(parsed[0].preference(day(1)), PreferenceLevel::DefinitelyCan);
        assert_eq!(parsed[0].preference(day(2)), PreferenceLevel::ProbablyCan);
    }

    #[test]
    fn blank_cells_and_extra_columns_are_tolerated() {
        let csv = "note,role,2025-10-01,2025-10-02\nlate,staff,,probably_can\n";
        let parsed = parse_responses(csv.as_bytes()).expect("parse succeeds");

        assert_eq!(parsed[0].preferences.len(), 1);
        assert_eq!(parsed[0].preference(day(1)), PreferenceLevel::Undecided);
    }

    #[test]
    fn missing_role_column_is_invalid() {
        let csv = "2025-10-01\ndefinitely_can\n";
        match parse_responses(csv.as_bytes()) {
            Err(ParseFailure::Invalid(detail)) => assert!(detail.contains("role")),
            other => panic!("expected invalid file, got {other:?}"),
        }
    }

    #[test]
    fn unknown_preference_is_invalid() {
        let csv = "role,2025-10-01\nstaff,sometimes\n";
        assert!(matches!(
            parse_responses(csv.as_bytes()),
            Err(ParseFailure::Invalid(_))
        ));
    }

    struct BrokenDisk;

    impl std::io::Write for BrokenDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_writes_leave_no_partial_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("response_1.csv");
        fs::write(&path, "role,2025-10-01
sta").expect("torn file");

        let response = ParticipantResponse::new(Role::Staff)
            .with_preference(day(1), PreferenceLevel::DefinitelyCan);
        let err = write_or_discard(BrokenDisk, &path, &response).expect_err("write fails");

        assert!(matches!(err, RepositoryError::Io(_) | RepositoryError::Csv(_)));
        assert!(!path.exists());
    }
}
