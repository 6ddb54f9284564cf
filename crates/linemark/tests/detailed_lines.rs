//! Line-by-line reads with exact position metadata.

mod common;

use common::{read_all, reader_with, utf8_reader, utf8_reader_sized};
use linemark::{encoding, LineBookmark, LineEnding, ReaderOptions};

#[test]
fn three_lines_crlf_lf_none() {
    let bytes = b"abcdef\r\nxyzzy\nfoobar";
    let mut reader = utf8_reader(bytes);

    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "abcdef");
    assert_eq!(first.line_ending(), LineEnding::CrLf);
    assert_eq!(first.start_position(), 0);
    assert_eq!(first.last_line_ending_position(), 7);
    assert_eq!(first.last_text_position(), 5);
    assert_eq!(first.position_after_line_ending(), 8);
    assert_eq!(first.reread_bookmark(), LineBookmark::Start);
    assert_eq!(first.read_next_bookmark().to_wire(), (8, 8));

    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.text_without_line_ending(), "xyzzy");
    assert_eq!(second.line_ending(), LineEnding::Lf);
    assert_eq!(second.start_position(), 8);
    assert_eq!(second.last_line_ending_position(), 13);
    assert_eq!(second.read_next_bookmark().to_wire(), (14, 14));

    let third = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(third.text_without_line_ending(), "foobar");
    assert_eq!(third.line_ending(), LineEnding::None);
    assert_eq!(third.start_position(), 14);
    assert_eq!(third.last_line_ending_position(), 19);
    assert_eq!(third.last_text_position(), 19);

    assert!(reader.read_detailed_line().unwrap().is_none());
}

#[test]
fn exhausted_reader_stays_exhausted() {
    let mut reader = utf8_reader(b"only");
    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.line_ending(), LineEnding::None);
    for _ in 0..3 {
        assert!(reader.read_detailed_line().unwrap().is_none());
    }
}

#[test]
fn preamble_counts_bytes_but_not_chars() {
    let bytes = [0xEF, 0xBB, 0xBF, 0x5A, 0x0A];
    let mut reader = reader_with(
        &bytes,
        &encoding::UTF_8,
        ReaderOptions {
            detect_preamble: true,
            ..ReaderOptions::default()
        },
    );

    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "Z");
    assert_eq!(line.line_ending(), LineEnding::Lf);
    assert_eq!(line.start_position(), 3);
    assert_eq!(line.last_line_ending_position(), 4);
    assert_eq!(line.last_seen_char_index(), 1);
    assert_eq!(line.reread_bookmark().to_wire(), (-1, -1));
    assert_eq!(line.read_next_bookmark().to_wire(), (5, 2));
}

#[test]
fn preamble_then_unterminated_line() {
    let bytes = [0xEF, 0xBB, 0xBF, 0x5A];
    let mut reader = reader_with(
        &bytes,
        &encoding::UTF_8,
        ReaderOptions {
            detect_preamble: true,
            ..ReaderOptions::default()
        },
    );

    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "Z");
    assert_eq!(line.line_ending(), LineEnding::None);
    assert_eq!(line.start_position(), 3);
    assert_eq!(line.last_line_ending_position(), 3);
    assert_eq!(line.last_seen_char_index(), 0);
    assert_eq!(line.read_next_bookmark().to_wire(), (4, 1));
}

#[test]
fn undetected_preamble_is_text() {
    let bytes = [0xEF, 0xBB, 0xBF, 0x5A];
    let mut reader = utf8_reader(&bytes);
    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "\u{FEFF}Z");
    assert_eq!(line.start_position(), 0);
    assert_eq!(line.last_seen_char_index(), 1);
}

#[test]
fn lone_cr_terminates_a_line() {
    let mut reader = utf8_reader(b"a\rb");

    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "a");
    assert_eq!(first.line_ending(), LineEnding::Cr);
    assert_eq!(first.last_line_ending_position(), 1);

    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.text_without_line_ending(), "b");
    assert_eq!(second.start_position(), 2);
    assert_eq!(second.line_ending(), LineEnding::None);
}

#[test]
fn cr_at_end_of_stream() {
    let mut reader = utf8_reader(b"x\r");
    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "x");
    assert_eq!(line.line_ending(), LineEnding::Cr);
    assert_eq!(line.last_line_ending_position(), 1);
    assert!(reader.read_detailed_line().unwrap().is_none());
}

#[test]
fn empty_lines() {
    let mut reader = utf8_reader(b"\n\n");
    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "");
    assert_eq!(first.start_position(), 0);
    assert_eq!(first.last_line_ending_position(), 0);
    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.start_position(), 1);
    assert_eq!(second.last_line_ending_position(), 1);
    assert!(reader.read_detailed_line().unwrap().is_none());
}

#[test]
fn empty_stream_has_no_lines() {
    let mut reader = utf8_reader(b"");
    assert!(reader.read_detailed_line().unwrap().is_none());
}

#[test]
fn crlf_split_across_refills_is_one_terminator() {
    // A 16-byte buffer puts the CR at the end of the first refill and the
    // LF at the start of the second.
    let bytes = b"aaaaaaaaaaaaaaa\r\ntail";
    let mut reader = utf8_reader_sized(bytes, 16);

    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "aaaaaaaaaaaaaaa");
    assert_eq!(first.line_ending(), LineEnding::CrLf);
    assert_eq!(first.last_line_ending_position(), 16);

    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.text_without_line_ending(), "tail");
    assert_eq!(second.start_position(), 17);
    assert_eq!(second.last_line_ending_position(), 20);
}

#[test]
fn scalar_split_across_refills() {
    // First refill ends with the lead byte of the emoji; the line that
    // starts there still gets an exact bookmark.
    let mut bytes = b"aaaaaaaaaaaaaa\n".to_vec();
    bytes.extend_from_slice("\u{1F600}\n".as_bytes());
    let mut reader = utf8_reader_sized(&bytes, 16);

    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "aaaaaaaaaaaaaa");
    assert_eq!(first.last_line_ending_position(), 14);

    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.text_without_line_ending(), "\u{1F600}");
    assert_eq!(second.line_ending(), LineEnding::Lf);
    assert_eq!(second.start_position(), 15);
    assert_eq!(second.last_line_ending_position(), 19);
    // The emoji is a surrogate pair: indices 15-16, the terminator at 17.
    assert_eq!(second.last_seen_char_index(), 17);
    assert_eq!(second.reread_bookmark().to_wire(), (15, 15));

    let mut resumed = utf8_reader_sized(&bytes, 16);
    resumed
        .resume_from_bookmark(second.reread_bookmark())
        .unwrap();
    assert_eq!(resumed.read_detailed_line().unwrap().unwrap(), second);
}

#[test]
fn line_sequences_agree_across_buffer_sizes() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice("alpha\r\nb\u{E8}ta\n\u{3B3}\r".as_bytes());
    bytes.extend_from_slice("\u{1F600} mixed \u{1F600}\u{1F600}\r\n\nlast".as_bytes());

    let baseline = read_all(&mut utf8_reader(&bytes));
    assert!(!baseline.is_empty());
    for buffer_size in [8, 16, 77, 128, 1024, 8192] {
        let lines = read_all(&mut utf8_reader_sized(&bytes, buffer_size));
        assert_eq!(lines, baseline, "buffer_size={buffer_size}");
    }
}

#[test]
fn concatenated_lines_reproduce_the_text() {
    let text = "one\r\ntwo\nthree\r\rfive \u{1F600}\nsix";
    let lines = read_all(&mut utf8_reader(text.as_bytes()));
    let joined: String = lines.iter().map(|l| l.text_with_line_ending()).collect();
    assert_eq!(joined, text);
}

#[test]
fn utf16le_lines_with_preamble() {
    let bytes = [
        0xFF, 0xFE, // preamble
        0x41, 0x00, // A
        0x0D, 0x00, // CR
        0x0A, 0x00, // LF
        0x42, 0x00, // B
    ];
    let mut reader = reader_with(
        &bytes,
        &encoding::UTF_16LE,
        ReaderOptions {
            detect_preamble: true,
            ..ReaderOptions::default()
        },
    );

    let first = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(first.text_without_line_ending(), "A");
    assert_eq!(first.line_ending(), LineEnding::CrLf);
    assert_eq!(first.start_position(), 2);
    assert_eq!(first.last_line_ending_position(), 7);
    assert_eq!(first.last_seen_char_index(), 2);
    assert_eq!(first.read_next_bookmark().to_wire(), (8, 3));

    let second = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(second.text_without_line_ending(), "B");
    assert_eq!(second.line_ending(), LineEnding::None);
    assert_eq!(second.start_position(), 8);
    assert_eq!(second.last_line_ending_position(), 9);
    assert_eq!(second.last_seen_char_index(), 3);
}

#[test]
fn utf16be_without_terminator() {
    let bytes = [0x00, 0x41, 0x00, 0x5A];
    let mut reader = reader_with(&bytes, &encoding::UTF_16BE, ReaderOptions::default());

    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "AZ");
    assert_eq!(line.line_ending(), LineEnding::None);
    assert_eq!(line.last_seen_char_index(), 1);
    assert_eq!(line.read_next_bookmark().to_wire(), (4, 2));
}

#[test]
fn eof_inside_a_scalar_discards_the_tail() {
    // "ok" then the first two bytes of an emoji; the truncated character is
    // discarded text, not an error.
    let mut bytes = b"ok".to_vec();
    bytes.extend_from_slice(&"\u{1F600}".as_bytes()[..2]);
    let mut reader = utf8_reader(&bytes);

    let line = reader.read_detailed_line().unwrap().unwrap();
    assert_eq!(line.text_without_line_ending(), "ok");
    assert_eq!(line.line_ending(), LineEnding::None);
    assert_eq!(line.last_line_ending_position(), 1);
    assert!(reader.read_detailed_line().unwrap().is_none());
}

#[test]
fn debug_hook_observes_progress() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    let mut reader = utf8_reader(b"a\nb");
    reader.set_debug_hook(move |message| sink.borrow_mut().push(message.to_string()));
    read_all(&mut reader);
    let messages = messages.borrow();
    assert!(messages.iter().any(|m| m.contains("refill")));
    assert!(messages.iter().any(|m| m.contains("end of stream")));
}
