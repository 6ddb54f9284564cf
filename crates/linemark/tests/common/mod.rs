#![allow(dead_code)]

use std::io::Cursor;

use linemark::{encoding, encoding::Encoding, DetailedLine, LineReader, ReaderOptions};

pub type FixtureReader = LineReader<Cursor<Vec<u8>>>;

pub fn reader_with(
    bytes: &[u8],
    encoding: &'static dyn Encoding,
    options: ReaderOptions,
) -> FixtureReader {
    LineReader::with_options(Cursor::new(bytes.to_vec()), encoding, options)
        .expect("supported encoding")
}

pub fn utf8_reader(bytes: &[u8]) -> FixtureReader {
    reader_with(bytes, &encoding::UTF_8, ReaderOptions::default())
}

pub fn utf8_reader_sized(bytes: &[u8], buffer_size: usize) -> FixtureReader {
    reader_with(
        bytes,
        &encoding::UTF_8,
        ReaderOptions {
            buffer_size,
            ..ReaderOptions::default()
        },
    )
}

pub fn read_all(reader: &mut FixtureReader) -> Vec<DetailedLine> {
    let mut lines = Vec::new();
    while let Some(line) = reader.read_detailed_line().expect("read failed") {
        lines.push(line);
    }
    lines
}
