use shotlen_ingest::log_parser::{tokenize, LogParser};
use shotlen_ingest::parse_log;

const SNAPSHOT: &str = r#"
- generic [ref=e3200]:
  - button "Back" [ref=e3201]
  - generic [ref=e3202]: Back
  - generic [ref=e3203]: "NoS"
  - generic [ref=e3204]: "1290"
  - generic [ref=e3205]: ASL
  - generic [ref=e3206]: "3.2"
  - generic [ref=e3207]: Show raw data
- generic [ref=e3223]:
  - generic [ref=e3224]:
    - generic [ref=e3225]: "1"
    - generic [ref=e3226]: 00:00.0
    - generic [ref=e3227]: "15.7"
  - generic [ref=e3228]:
    - generic [ref=e3229]: "2"
    - generic [ref=e3230]: 00:15.7
    - generic [ref=e3231]: "19.4"
  - generic [ref=e3232]:
    - generic [ref=e3233]: "3"
    - generic [ref=e3234]: "00:35.1"
    - generic [ref=e3235]: "2"
  - generic [ref=e3236]: Close
"#;

#[test]
fn extracts_one_record_per_triple_in_source_order() {
    let shots = parse_log(SNAPSHOT, "The Bourne Ultimatum");
    assert_eq!(shots.len(), 3);
    let numbers: Vec<u32> = shots.iter().map(|shot| shot.shot_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(shots[1].start_timestamp, "00:15.7");
    assert_eq!(shots[1].duration_seconds, 19.4);
    assert_eq!(shots[2].duration_seconds, 2.0);
    assert_eq!(shots[2].start_seconds(), Some(35.1));
    assert!(shots
        .iter()
        .all(|shot| shot.movie_title == "The Bourne Ultimatum"));
}

#[test]
fn summary_header_values_do_not_become_shots() {
    let tokens = tokenize(SNAPSHOT);
    assert_eq!(tokens[0], "1290");
    assert_eq!(tokens[1], "3.2");
    assert!(!tokens.iter().any(|token| token == "Back" || token == "Close"));
}

#[test]
fn log_without_triples_yields_empty_sequence() {
    let content = "- generic [ref=e1]: Close\n- generic [ref=e2]: \"12\"\nplain text\n";
    assert!(parse_log(content, "Nothing").is_empty());
    assert!(parse_log("", "Nothing").is_empty());
}

#[test]
fn out_of_range_shot_number_is_never_emitted() {
    let content = r#"
- generic [ref=e1]: "15000"
- generic [ref=e2]: 01:02.3
- generic [ref=e3]: "5.0"
"#;
    assert!(parse_log(content, "Ceiling").is_empty());
}

#[test]
fn malformed_timestamp_rejects_window() {
    let content = r#"
- generic [ref=e1]: "4"
- generic [ref=e2]: 1:02.3
- generic [ref=e3]: "5.0"
- generic [ref=e4]: "5"
- generic [ref=e5]: 01:07.3
- generic [ref=e6]: "1.5"
"#;
    let parse = LogParser::default().parse("Timestamps", content);
    assert_eq!(parse.shots.len(), 1);
    assert_eq!(parse.shots[0].shot_number, 5);
    assert_eq!(parse.skipped_tokens, 3);
}
