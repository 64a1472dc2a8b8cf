//! Shared `prettytable` styling for the `Display` impls of memory and of the VM.

use std::fmt::Display;

use lazy_static::lazy_static;
use prettytable::{format as TableFormat, Table, cell, row};

lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/**
  Builds a two column `Address | Contents` table. The row whose index equals `highlight` is
  marked with an arrow.
*/
pub(crate) fn make_register_table<L, T, I>(rows: I, highlight: Option<usize>) -> Table
  where L: Display,
        T: Display,
        I: IntoIterator<Item = (L, T)>
{
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Address", ubl->"Contents"]);

  for (i, (label, contents)) in rows.into_iter().enumerate() {
    match Some(i) == highlight {

      true  => {
        table.add_row(
          row![r->format!("* --> {} =", label), format!("{}", contents)]
        );
      }

      false => {
        table.add_row(
          row![r->format!("{} =", label), format!("{}", contents)]
        );
      }

    } // end match on highlight
  } // end for
  table
}
