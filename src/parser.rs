use chrono::NaiveDate;
use thiserror::Error;

use crate::{settings::StorageFormat, workout::Workout};

pub type Result<T> = std::result::Result<T, ParseError>;

pub const CSV_HEADER: [&str; 4] = ["Date", "Exercise Type", "Duration (min)", "Calories Burned"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Also accepted on load: the short US forms a date picker writes, such as
/// `1/15/25`. Records are always written back as [`DATE_FORMAT`].
const LEGACY_DATE_FORMATS: [&str; 2] = ["%m/%d/%y", "%m/%d/%Y"];

const FIELD_COUNT: usize = CSV_HEADER.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected one of {expected:?}, found {found:?}")]
    ExpectedChars { expected: Vec<char>, found: char },
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("expected header '{}', found '{found}'", CSV_HEADER.join(","))]
    InvalidHeader { found: String },
    #[error("unterminated quoted field")]
    UnterminatedQuote,
}

/// Reads a whole data file into workouts.
///
/// Records are separated by line breaks and fields by commas. Quoted fields
/// are only recognised in the CSV format; the plain text format splits on
/// every comma.
#[derive(Debug, Clone)]
pub struct Parser {
    source: Vec<char>,
    format: StorageFormat,

    start: usize,
    current: usize,

    line: usize,
    column: usize,
}

impl Parser {
    pub fn new(source: Vec<char>, format: StorageFormat) -> Self {
        Self {
            source,
            format,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn parse_file(&mut self) -> Result<Vec<Workout>> {
        self.skip_blank_lines();
        if self.format == StorageFormat::Csv && self.peek().is_some() {
            self.parse_header()?;
            self.skip_blank_lines();
        }

        let mut records = Vec::new();
        while self.peek().is_some() {
            records.push(self.parse_record()?);
            self.skip_blank_lines();
        }

        Ok(records)
    }

    fn parse_header(&mut self) -> Result<()> {
        let (line, column) = (self.line, self.column);
        let fields = self.parse_fields()?;

        if fields.iter().map(String::as_str).ne(CSV_HEADER) {
            return Err(ParseError::new(
                ParseErrorKind::InvalidHeader {
                    found: fields.join(","),
                },
                line,
                column,
            ));
        }

        Ok(())
    }

    fn parse_record(&mut self) -> Result<Workout> {
        let (line, column) = (self.line, self.column);
        let fields = self.parse_fields()?;

        let [date, exercise_type, duration, calories_burned]: [String; FIELD_COUNT] =
            fields.try_into().map_err(|fields: Vec<String>| {
                ParseError::new(
                    ParseErrorKind::FieldCount {
                        expected: FIELD_COUNT,
                        found: fields.len(),
                    },
                    line,
                    column,
                )
            })?;

        let Some(date) = parse_date(date.trim()) else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidDate(date),
                line,
                column,
            ));
        };

        let duration_minutes = parse_number("duration", duration, line, column)?;
        let calories_burned = parse_number("calories burned", calories_burned, line, column)?;

        Ok(Workout {
            date,
            exercise_type,
            duration_minutes,
            calories_burned,
        })
    }

    fn parse_fields(&mut self) -> Result<Vec<String>> {
        let mut fields = Vec::new();

        loop {
            let field = if self.format == StorageFormat::Csv && self.peek() == Some('"') {
                self.parse_quoted()?
            } else {
                self.extract_until_any(&[',', '\n', '\r']);
                self.collect().unwrap_or_default()
            };
            fields.push(field);

            match self.peek() {
                Some(',') => {
                    self.advance();
                    self.clear();
                }
                Some('\r') => {
                    self.advance();
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    self.clear();
                    break;
                }
                Some('\n') => {
                    self.advance();
                    self.clear();
                    break;
                }
                None => break,
                Some(found) => {
                    return Err(self.make_error(ParseErrorKind::ExpectedChars {
                        expected: vec![',', '\n'],
                        found,
                    }))
                }
            }
        }

        Ok(fields)
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let (line, column) = (self.line, self.column);
        self.expect_char('"')?;

        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                    value.push('"');
                }
                Some('"') => break,
                Some(c) => value.push(c),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedQuote,
                        line,
                        column,
                    ))
                }
            }
        }

        self.clear();
        Ok(value)
    }

    #[must_use]
    fn make_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.line, self.column)
    }

    fn expect_char(&mut self, c: char) -> Result<()> {
        match self.peek() {
            Some(found) if found == c => {
                self.advance();
                Ok(())
            }
            Some(found) => Err(self.make_error(ParseErrorKind::ExpectedChars {
                expected: vec![c],
                found,
            })),
            None => Err(self.make_error(ParseErrorKind::UnexpectedEof)),
        }
    }

    fn skip_blank_lines(&mut self) {
        while matches!(self.peek(), Some('\n' | '\r')) {
            self.advance();
        }

        self.clear();
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.source.get(self.current);
        self.current += 1;

        if let Some(c) = c {
            if *c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        c.cloned()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).cloned()
    }

    fn extract_until_any(&mut self, stops: &[char]) {
        while let Some(current) = self.peek() {
            if stops.contains(&current) {
                break;
            }
            self.advance();
        }
    }

    fn collect(&mut self) -> Option<String> {
        let result = self
            .source
            .get(self.start..self.current)?
            .iter()
            .collect::<String>()
            .into();

        self.clear();

        result
    }

    fn clear(&mut self) {
        self.start = self.current;
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    std::iter::once(DATE_FORMAT)
        .chain(LEGACY_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_number(field: &'static str, value: String, line: usize, column: usize) -> Result<u32> {
    match value.trim().parse() {
        Ok(num) => Ok(num),
        Err(_) => Err(ParseError::new(
            ParseErrorKind::InvalidNumber { field, value },
            line,
            column,
        )),
    }
}
