use git_tracker::terminal::read_answer;
use std::io::Cursor;

#[test]
fn multiline_answer_stops_at_empty_line() {
    let mut input = Cursor::new("Fixed the parser\r\nReviewed PRs\n\nignored\n");
    let answer = read_answer(&mut input, true).unwrap();
    assert_eq!(answer.as_deref(), Some("Fixed the parser\nReviewed PRs"));
}

#[test]
fn multiline_answer_stops_at_eof() {
    let mut input = Cursor::new("only line");
    assert_eq!(
        read_answer(&mut input, true).unwrap().as_deref(),
        Some("only line")
    );
}

#[test]
fn single_line_answer_takes_first_line() {
    let mut input = Cursor::new("one\ntwo\n");
    assert_eq!(read_answer(&mut input, false).unwrap().as_deref(), Some("one"));
}

#[test]
fn eof_without_input_is_a_dismissal() {
    let mut input = Cursor::new("");
    assert_eq!(read_answer(&mut input, true).unwrap(), None);
}

#[test]
fn immediate_empty_line_is_an_empty_answer() {
    let mut input = Cursor::new("\n");
    assert_eq!(read_answer(&mut input, true).unwrap().as_deref(), Some(""));
}
