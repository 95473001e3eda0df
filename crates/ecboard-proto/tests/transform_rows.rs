mod common;

use common::row;
use ecboard_proto::protocol::{leading_set, remaining_set};
use ecboard_proto::transform::{transform, Cell};

fn names(rows: &[Vec<Cell>]) -> Vec<String> {
    transform(rows).into_iter().map(|c| c.name).collect()
}

#[test]
fn ranks_by_total_value_descending() {
    let rows = vec![row("A", "5", "10.0"), row("B", "3", "20.0")];
    let out = transform(&rows);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].name, "B");
    assert_eq!(out[0].rank, 1);
    assert_eq!(out[0].total_value, 20.0);
    assert_eq!(out[0].total_count, 3);
    assert_eq!(out[1].name, "A");
    assert_eq!(out[1].rank, 2);
    assert_eq!(out[1].total_value, 10.0);

    // ids follow source order, not rank
    assert_eq!(out[0].id, 2);
    assert_eq!(out[1].id, 1);
}

#[test]
fn ties_keep_source_order() {
    let rows = vec![
        row("FIRST", "1", "7.5"),
        row("TOP", "1", "9"),
        row("SECOND", "1", "7.5"),
        row("THIRD", "1", "7.50"),
        row("LAST", "1", "0"),
    ];
    assert_eq!(names(&rows), vec!["TOP", "FIRST", "SECOND", "THIRD", "LAST"]);
}

#[test]
fn ranks_are_dense_permutation() {
    let values = ["3", "1", "4", "1", "5", "9", "2", "6", "5", "3", "5", "8", "9", "7"];
    let rows: Vec<Vec<Cell>> = values
        .iter()
        .enumerate()
        .map(|(i, v)| row(&format!("C{}", i), "1", v))
        .collect();
    let out = transform(&rows);

    let mut ranks: Vec<usize> = out.iter().map(|c| c.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=values.len()).collect::<Vec<_>>());
    assert!(out
        .windows(2)
        .all(|w| w[0].total_value >= w[1].total_value));
}

#[test]
fn header_row_is_skipped() {
    let header: Vec<Cell> = [
        "S.No",
        "Candidate Name",
        "Tower",
        "Flat#",
        "920",
        "1005",
        "1165",
        "1285",
        "1670",
        "Total Vote Count",
        "Total Vote Value",
    ]
    .iter()
    .map(|s| Cell::from(*s))
    .collect();
    let rows = vec![header, row("A", "5", "10.0")];
    let out = transform(&rows);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "A");
    assert_eq!(out[0].id, 1);

    let upper = vec![vec![Cell::Blank, Cell::from("CANDIDATE NAME")], row("B", "1", "1")];
    assert_eq!(names(&upper), vec!["B"]);
}

#[test]
fn structural_junk_is_dropped() {
    let rows = vec![
        vec![],
        vec![Cell::from("only one cell")],
        vec![Cell::from("3"), Cell::from("")],
        vec![Cell::from("4"), Cell::Blank, Cell::from("T"), Cell::from("101")],
        row("KEPT", "2", "2"),
    ];
    let out = transform(&rows);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "KEPT");
    assert_eq!(out[0].id, 1);
    assert!(transform(&[]).is_empty());
}

#[test]
fn bad_numeric_cells_default_to_zero() {
    let rows = vec![vec![
        Cell::from("1"),
        Cell::from("MESSY"),
        Cell::from("Tower 3"),
        Cell::Blank,
        Cell::from("four"),
        Cell::from("2"),
        Cell::Number(3.0),
        Cell::from("-1"),
        Cell::from(""),
        Cell::from("n/a"),
        Cell::from("twenty"),
    ]];
    let out = transform(&rows);
    assert_eq!(out.len(), 1);

    let c = &out[0];
    assert_eq!(c.flat, "N/A");
    assert_eq!(
        c.votes.entries().map(|(_, n)| n),
        [0, 2, 3, 0, 0]
    );
    assert_eq!(c.total_count, 0);
    assert_eq!(c.total_value, 0.0);
}

#[test]
fn short_rows_default_missing_columns() {
    // Sheets drops trailing empty cells from each row.
    let rows = vec![vec![Cell::from("1"), Cell::from("SHORT"), Cell::Blank, Cell::from("1725")]];
    let out = transform(&rows);
    assert_eq!(out[0].flat, "1725");
    assert_eq!(out[0].total_count, 0);
    assert_eq!(out[0].total_value, 0.0);
}

#[test]
fn leading_and_remaining_sets_split_at_ten() {
    let rows: Vec<Vec<Cell>> = (0..15)
        .map(|i| row(&format!("C{}", i), "1", &format!("{}", 100 - i)))
        .collect();
    let out = transform(&rows);

    let leaders = leading_set(&out);
    assert_eq!(leaders.len(), 10);
    assert_eq!(
        leaders.iter().map(|c| c.rank).collect::<Vec<_>>(),
        (1..=10).collect::<Vec<_>>()
    );

    let rest = remaining_set(&out);
    assert_eq!(rest.len(), 5);
    assert_eq!(
        rest.iter().map(|c| c.rank).collect::<Vec<_>>(),
        (11..=15).collect::<Vec<_>>()
    );
}
