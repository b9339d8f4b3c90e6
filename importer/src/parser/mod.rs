//! CSV input reader with encoding and delimiter auto-detection.
//!
//! Turns the post table into an ordered list of [`Row`]s. Cells are looked up
//! by header name, so column order in the file does not matter and extra
//! columns are ignored.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{CsvError, CsvResult};
use crate::models::Row;

/// Header names of the input table.
pub mod columns {
    pub const TITLE: &str = "Post title";
    pub const BODY: &str = "Post body";
    pub const FEATURED_IMAGE: &str = "Featured image URL";
    pub const STATUS: &str = "Status";
    pub const TAGS: &str = "Tags";
    pub const EXCERPT: &str = "Meta description";
    pub const SLUG: &str = "Post URL";
    pub const PUBLISH_DATE: &str = "Publish date";
    pub const SEO_TITLE: &str = "Post SEO title";
    pub const LANGUAGE: &str = "Post language";
    pub const ARCHIVED: &str = "Archived";
}

/// Columns every input file must declare in its header.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    columns::TITLE,
    columns::BODY,
    columns::FEATURED_IMAGE,
    columns::STATUS,
    columns::TAGS,
    columns::EXCERPT,
    columns::SLUG,
    columns::PUBLISH_DATE,
    columns::SEO_TITLE,
    columns::LANGUAGE,
    columns::ARCHIVED,
];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Rows in file order
    pub rows: Vec<Row>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; chardet only guesses for everything else.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A leading UTF-8 byte order mark is dropped so the first header matches.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read and parse a CSV file.
///
/// A missing file is reported as [`CsvError::FileNotFound`]; every other
/// failure is a read error.
pub fn read_rows<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CsvError::FileNotFound(path.to_path_buf()),
        _ => CsvError::IoError(e),
    })?;

    parse_bytes(&bytes, delimiter)
}

/// Parse CSV bytes, detecting encoding and (unless given) the delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    let (headers, rows) = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse decoded CSV text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<Row>)> {
    if !delimiter.is_ascii() {
        return Err(CsvError::InvalidDelimiter(delimiter));
    }
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let index = ColumnIndex::new(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(index.row(rows.len() + 1, &record));
    }

    Ok((headers, rows))
}

/// Header name to position lookup for the required columns.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn new(headers: &[String]) -> CsvResult<Self> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();

        for column in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h == column) {
                Some(i) => {
                    positions.insert(column, i);
                }
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(CsvError::MissingColumns(missing));
        }

        Ok(Self { positions })
    }

    /// Cell value for a column; blank or out-of-range cells are absent.
    fn cell(&self, record: &StringRecord, column: &str) -> Option<String> {
        let value = record.get(*self.positions.get(column)?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn row(&self, number: usize, record: &StringRecord) -> Row {
        Row {
            number,
            title: self.cell(record, columns::TITLE),
            body: self.cell(record, columns::BODY),
            excerpt: self.cell(record, columns::EXCERPT),
            slug: self.cell(record, columns::SLUG),
            status: self.cell(record, columns::STATUS),
            tags: self.cell(record, columns::TAGS),
            publish_date: self.cell(record, columns::PUBLISH_DATE),
            seo_title: self.cell(record, columns::SEO_TITLE),
            language: self.cell(record, columns::LANGUAGE),
            archived: self.cell(record, columns::ARCHIVED),
            featured_image: self.cell(record, columns::FEATURED_IMAGE),
        }
    }
}
