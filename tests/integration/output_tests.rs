//! Output files across runs and the clean pass

use paste_trawler::output::{clean_json_lines, with_extension, CsvSink, JsonLinesSink, ResultSink};
use paste_trawler::{ContentType, Entry};
use tempfile::TempDir;

fn folder(link: &str) -> Entry {
    let mut entry = Entry::new("Cyberdrop", link, "https://paste.test/abcde/raw");
    entry.content_type = Some(ContentType::Folder);
    entry.title = Some("holiday, 2021".to_string());
    entry.file_count = Some(12);
    entry
}

#[test]
fn test_csv_header_written_once_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = with_extension(dir.path().join("results"), "csv");

    for link in ["https://cyberdrop.me/a/AAAAAAAA", "https://cyberdrop.me/a/BBBBBBBB"] {
        let sink = CsvSink::open(&path).unwrap();
        assert_eq!(sink.deliver(&[folder(link)]), 1);
        sink.finish().unwrap();
    }

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), Entry::FIELDS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "https://cyberdrop.me/a/AAAAAAAA");
    assert_eq!(&rows[1][1], "https://cyberdrop.me/a/BBBBBBBB");
    // Quoted because of the comma
    assert_eq!(&rows[0][3], "holiday, 2021");
    assert_eq!(&rows[0][6], "Folder");
}

#[test]
fn test_json_lines_then_clean() {
    let dir = TempDir::new().unwrap();
    let path = with_extension(dir.path().join("results"), "json");

    // Two runs appending the same link produce a duplicate line
    for _ in 0..2 {
        let sink = JsonLinesSink::open(&path).unwrap();
        sink.deliver(&[folder("https://cyberdrop.me/a/AAAAAAAA")]);
        sink.finish().unwrap();
    }
    let sink = JsonLinesSink::open(&path).unwrap();
    sink.deliver(&[folder("https://cyberdrop.me/a/CCCCCCCC")]);
    sink.finish().unwrap();

    let report = clean_json_lines(&path).unwrap();
    assert_eq!(report.kept, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.output, dir.path().join("clean-results.json"));

    let cleaned: Vec<Entry> =
        serde_json::from_str(&std::fs::read_to_string(&report.output).unwrap()).unwrap();
    assert_eq!(cleaned[0], folder("https://cyberdrop.me/a/AAAAAAAA"));
    assert_eq!(cleaned[1].link, "https://cyberdrop.me/a/CCCCCCCC");

    // The source file is left untouched
    let lines = std::fs::read_to_string(&path).unwrap().lines().count();
    assert_eq!(lines, 3);
}
