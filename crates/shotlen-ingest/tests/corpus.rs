use shotlen_ingest::corpus::{embedded_duration, parse_document};
use shotlen_ingest::{CorpusNormalizer, RecordRejection};

const SCENE_MAP_DOCUMENT: &str = r#"{
  "1037_The_Curious_Case_Of_Benjamin_Button": {
    "A man sits on a bench": [
      "1037_shot_0001_00.00.10.000-00.00.12.500",
      "1037_shot_0002_00.00.12.500-00.00.12.500",
      "1037_shot_0003_00.01.30.000-00.01.45.500"
    ],
    "metadata": {"fps": 24},
    "Night falls": ["1037_shot_0004_00.02.00.000-00.02.03.000", 17]
  },
  "2001_Heat": {
    "scene": [
      {"shots": [{"shot_duration": 4.0}, {"shot_start_frame": 0, "shot_end_frame": 12}]},
      {"description": "no shots here"}
    ]
  },
  "3003_Ronin": {
    "shots": [{"duration": 1.0}, {"start": 3.0, "end": 2.0}]
  },
  "broken": "not a movie"
}"#;

#[test]
fn normalizes_every_layout_in_source_order() {
    let document = parse_document(SCENE_MAP_DOCUMENT).expect("document parses");
    let outcome = CorpusNormalizer::new(24.0).normalize_document(&document);

    let durations: Vec<f64> = outcome
        .records
        .iter()
        .map(|record| record.duration_seconds)
        .collect();
    assert_eq!(durations, vec![2.5, 15.5, 3.0, 4.0, 0.5, 1.0]);
    assert_eq!(
        outcome.records[0].movie_id,
        "1037_The_Curious_Case_Of_Benjamin_Button"
    );
    assert_eq!(outcome.records[3].movie_id, "2001_Heat");
    assert_eq!(outcome.movies, 3);
    assert_eq!(outcome.rejections.non_positive_duration, 2);
    assert_eq!(outcome.rejections.unrecognized_shape, 1);
    assert!(outcome.records.iter().all(|record| record.duration_seconds > 0.0));
}

#[test]
fn timecode_pair_duration() {
    assert_eq!(embedded_duration("x_00.01.30.000-00.01.45.500"), Ok(15.5));
    assert_eq!(
        embedded_duration("x_00.01.45.500-00.01.30.000"),
        Err(RecordRejection::NonPositiveDuration)
    );
    assert_eq!(
        embedded_duration("x_00.01.30.000-00.01.45.500_suffix"),
        Err(RecordRejection::MissingDuration)
    );
}

#[test]
fn tabular_corpus_drops_non_positive_rows() {
    let rows = shotlen_ingest::table::read_rows_from(
        "movie_title,duration\n1_A,1.0\n1_A,0\n2_B,3.0\n".as_bytes(),
    )
    .expect("read rows");
    let outcome = CorpusNormalizer::default().normalize_rows(rows);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.movies, 2);
    assert_eq!(outcome.rejections.non_positive_duration, 1);
}
