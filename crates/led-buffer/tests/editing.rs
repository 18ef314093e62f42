//! End-to-end editing sequences against the public buffer API.
//!
//! The inline unit tests pin individual operations; these walk the table
//! through the kind of edit streams the editor produces — typing, deleting,
//! and navigating by line — and check the document after every step.

use led_buffer::table::PieceTable;

/// Typing a word letter-by-letter at a moving cursor, the way the editor's
/// insert path drives the table.
#[test]
fn typing_at_a_moving_cursor() {
    let mut table = PieceTable::new(b"fn main() {}");
    let mut cursor = 11; // just inside the braces

    for &byte in b" println!(\"hi\"); " {
        table.insert(cursor, &[byte]).unwrap();
        cursor += 1;
    }

    assert_eq!(table.text(), b"fn main() { println!(\"hi\"); }");
    assert_eq!(table.len(), table.text().len());
}

/// Backspacing over freshly typed text lands back on the original document.
#[test]
fn backspace_undoes_typing() {
    let original = b"abcdef";
    let mut table = PieceTable::new(original);

    table.insert(3, b"XYZ").unwrap();
    assert_eq!(table.text(), b"abcXYZdef");

    // Backspace three times from just after the insertion.
    for _ in 0..3 {
        table.remove(3, 1).unwrap();
    }

    assert_eq!(table.text(), original);
}

/// Line queries track edits that add and remove newlines.
#[test]
fn line_queries_follow_edits() {
    let mut table = PieceTable::new(b"alpha\nbeta");
    assert_eq!(table.line_start(1).unwrap(), 6);

    // Splitting "beta" adds a line.
    table.insert(8, b"\n").unwrap(); // alpha\nbe\nta
    assert_eq!(table.line_start(2).unwrap(), 9);
    assert_eq!(table.line_length(1).unwrap(), 2);

    // Joining lines removes one.
    table.remove(5, 1).unwrap(); // alphabe\nta
    assert_eq!(table.line_start(1).unwrap(), 8);
    assert!(table.line_start(2).is_err());
}

/// A long randomized-feeling edit stream, mirrored against a plain Vec.
#[test]
fn edit_stream_matches_reference_vec() {
    let mut table = PieceTable::new(b"The quick brown fox jumps over the lazy dog");
    let mut reference = table.text();

    let inserts: &[(usize, &[u8])] = &[
        (0, b">> "),
        (16, b"red "),
        (47, b"sleeping "),
        (4, b"very "),
    ];
    for &(index, data) in inserts {
        table.insert(index, data).unwrap();
        reference.splice(index..index, data.iter().copied());
        assert_eq!(table.text(), reference);
    }

    let removes: &[(usize, usize)] = &[(0, 3), (13, 5), (30, 4)];
    for &(index, count) in removes {
        table.remove(index, count).unwrap();
        reference.drain(index..index + count);
        assert_eq!(table.text(), reference);
    }

    assert_eq!(table.len(), reference.len());
}

/// The table keeps working after its span sequence fragments heavily.
#[test]
fn heavy_fragmentation() {
    let mut table = PieceTable::new(b"0123456789");

    // Interleave an insert between every original byte.
    for i in (1..=9).rev() {
        table.insert(i, b".").unwrap();
    }
    assert_eq!(table.text(), b"0.1.2.3.4.5.6.7.8.9");

    // Then strip the dots back out.
    for i in (1..=9).rev() {
        table.remove(2 * i - 1, 1).unwrap();
    }
    assert_eq!(table.text(), b"0123456789");
}
