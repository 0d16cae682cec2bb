use std::fs;
use std::path::PathBuf;

use flatbed::{inspect, ColumnType, ImportError, TextLayout};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn names(schema: &flatbed::InferredSchema) -> Vec<&str> {
    schema.column_names().collect()
}

const COMMA_WITH_HEADER: &str = "Name,WebSite,Created\n\
Google,http://www.google.com,9/4/98\n\
Apple,http://www.apple.com,4/1/1976\n\
Microsoft,http://www.microsoft.com,4/4/1975\n";

#[test]
fn comma_delimited_with_header() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "companies.csv", COMMA_WITH_HEADER);

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(schema.layout, TextLayout::Delimited { delimiter: b',' });
    assert!(schema.has_header);
    assert_eq!(names(&schema), vec!["Name", "WebSite", "Created"]);
    assert_eq!(schema.columns[0].ty, ColumnType::String);
    assert_eq!(schema.columns[2].ty, ColumnType::Date);
    // "Microsoft" is the longest sampled Name.
    assert_eq!(schema.columns[0].max_length, 9);
}

#[test]
fn pipe_delimited_with_header() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.txt",
        "Name|WebSite|Created\n\
         Google|http://www.google.com|9/4/98\n\
         Apple|http://www.apple.com|4/1/1976\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(schema.layout, TextLayout::Delimited { delimiter: b'|' });
    assert_eq!(names(&schema), vec!["Name", "WebSite", "Created"]);
}

#[test]
fn tab_delimited_with_header() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.txt",
        "Name\tWebSite\tCreated\n\
         Google\thttp://www.google.com\t9/4/98\n\
         Apple\thttp://www.apple.com\t4/1/1976\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(schema.layout, TextLayout::Delimited { delimiter: b'\t' });
    assert_eq!(names(&schema), vec!["Name", "WebSite", "Created"]);
}

#[test]
fn headerless_input_gets_default_letter_names() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.txt",
        "Google,http://www.google.com,9/4/98\n\
         Apple,http://www.apple.com,4/1/1976\n\
         Microsoft,http://www.microsoft.com,4/4/1975\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert!(!schema.has_header);
    assert_eq!(names(&schema), vec!["A", "B", "C"]);
    assert_eq!(schema.columns[2].ty, ColumnType::Date);
}

#[test]
fn quoted_fields_do_not_split_on_the_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.csv",
        "Name,WebSite,Created\n\
         \"Google\",http://www.google.com,9/4/98\n\
         Apple,http://www.apple.com,\"April, 1 1976\"\n\
         \"Nike, Inc.\",http://www.nike.com,1/25/1964\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(schema.layout, TextLayout::Delimited { delimiter: b',' });
    assert_eq!(schema.columns.len(), 3);
    // "Nike, Inc." is one 10-character field, not two.
    assert_eq!(schema.columns[0].max_length, 10);
    assert_eq!(schema.columns[2].ty, ColumnType::Date);
}

#[test]
fn blank_header_cells_get_positional_default_names() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.csv",
        ",,\"Created\"\n\
         \"Google\",http://www.google.com,9/4/98\n\
         Apple,http://www.apple.com,4/1/1976\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert!(schema.has_header);
    assert_eq!(names(&schema), vec!["A", "B", "Created"]);
}

#[test]
fn quoted_header_names_are_stripped() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.csv",
        "\"Name\",\"WebSite\",\"Created\"\n\
         Google,http://www.google.com,9/4/98\n\
         Apple,http://www.apple.com,4/1/1976\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(names(&schema), vec!["Name", "WebSite", "Created"]);
}

#[test]
fn fixed_width_layout_is_inferred_from_aligned_gaps() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "companies.txt",
        "Name      WebSite                   Created\n\
         Google    http://www.google.com     9/4/98\n\
         Apple     http://www.apple.com      4/1/1976\n\
         Microsoft http://www.microsoft.com  4/4/1975\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert!(matches!(
        &schema.layout,
        TextLayout::FixedWidth { bounds } if bounds.len() == 3
    ));
    assert!(schema.has_header);
    assert_eq!(names(&schema), vec!["Name", "WebSite", "Created"]);
    assert_eq!(schema.columns[2].ty, ColumnType::Date);
}

#[test]
fn numeric_columns_are_typed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "metrics.csv",
        "id,score,active\n1,98.5,true\n2,87.25,false\n3,7,true\n",
    );

    let schema = inspect(&path, &[], 100).unwrap();
    assert_eq!(schema.columns[0].ty, ColumnType::Integer);
    assert_eq!(schema.columns[1].ty, ColumnType::Decimal);
    assert_eq!(schema.columns[2].ty, ColumnType::Boolean);
}

#[test]
fn explicit_type_overrides_take_positional_precedence() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "companies.csv", COMMA_WITH_HEADER);

    let overrides = [ColumnType::String, ColumnType::String, ColumnType::String];
    let schema = inspect(&path, &overrides, 100).unwrap();
    assert_eq!(schema.columns[2].ty, ColumnType::String);
}

#[test]
fn inspection_only_reads_the_sample_window() {
    let dir = TempDir::new().unwrap();
    let mut content = String::from("id,created\n");
    for i in 0..50 {
        content.push_str(&format!("{i},1/1/2020\n"));
    }
    // Garbage far past the sample window must not affect inferred types.
    content.push_str("oops,not a date\n");
    let path = write_file(&dir, "long.csv", &content);

    let schema = inspect(&path, &[], 10).unwrap();
    assert_eq!(schema.columns[0].ty, ColumnType::Integer);
    assert_eq!(schema.columns[1].ty, ColumnType::Date);
}

#[test]
fn missing_file_is_source_unreadable() {
    let err = inspect(std::path::Path::new("no/such/file.csv"), &[], 100).unwrap_err();
    assert!(matches!(err, ImportError::SourceUnreadable { .. }));
}

#[test]
fn blank_file_is_empty_source() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "blank.csv", "\n  \n");
    let err = inspect(&path, &[], 100).unwrap_err();
    assert!(matches!(err, ImportError::EmptySource { .. }));
}
