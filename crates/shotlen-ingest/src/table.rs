use crate::error::IngestError;
use crate::model::ShotRow;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Writes the table in one go so a failed stage never leaves a partial file.
pub fn write_rows(path: &Path, rows: &[ShotRow]) -> Result<(), IngestError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ShotRow::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| IngestError::Io(std::io::Error::other(err.to_string())))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_rows(path: &Path) -> Result<Vec<ShotRow>, IngestError> {
    if !path.exists() {
        return Err(IngestError::MissingInput(path.to_path_buf()));
    }
    let file = fs::File::open(path)?;
    read_rows_from(file)
}

/// Undecodable rows and rows with a negative or non-finite duration are skipped.
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<ShotRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<ShotRow>().enumerate() {
        match result {
            Ok(row) if row.duration_seconds.is_finite() && row.duration_seconds >= 0.0 => {
                rows.push(row)
            }
            Ok(row) => debug!(index, duration = row.duration_seconds, "dropped table row"),
            Err(err) => debug!(index, %err, "skipped undecodable table row"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_aliased_columns() {
        let src = "movie_id,duration\n1037_Heat,2.5\n1037_Heat,-1\n1037_Heat,oops\n";
        let rows = read_rows_from(src.as_bytes()).expect("read rows");
        assert_eq!(rows, vec![ShotRow::new("1037_Heat", 2.5)]);
    }

    #[test]
    fn reads_log_parser_columns() {
        let src = "movie_title,shot_number,start_time,shot_length_sec\nHeat,1,00:00.0,2.5\n";
        let rows = read_rows_from(src.as_bytes()).expect("read rows");
        assert_eq!(rows[0].shot_number, Some(1));
        assert_eq!(rows[0].start_timestamp.as_deref(), Some("00:00.0"));
        assert_eq!(rows[0].duration_seconds, 2.5);
    }

    #[test]
    fn write_then_read_keeps_optional_columns() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested/shots.csv");
        let rows = vec![
            ShotRow {
                movie_title: "Heat".to_string(),
                shot_number: Some(1),
                start_timestamp: Some("00:00.0".to_string()),
                duration_seconds: 2.5,
            },
            ShotRow::new("Ronin", 4.0),
        ];
        write_rows(&path, &rows).expect("write rows");
        assert_eq!(read_rows(&path).expect("read rows"), rows);
    }

    #[test]
    fn empty_table_still_has_header() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("empty.csv");
        write_rows(&path, &[]).expect("write rows");
        let text = fs::read_to_string(&path).expect("read table");
        assert_eq!(text.trim(), "movie_title,shot_number,start_timestamp,duration_seconds");
        assert!(read_rows(&path).expect("read rows").is_empty());
    }

    #[test]
    fn missing_table_is_reported() {
        let err = read_rows(Path::new("/nonexistent/shots.csv")).unwrap_err();
        assert!(matches!(err, IngestError::MissingInput(_)));
    }
}
