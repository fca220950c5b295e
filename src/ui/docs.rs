// src/ui/docs.rs

use crate::model::Column;
use gtk4::prelude::*;
use gtk4::{glib, Align, Box as GtkBox, Expander, Label, Orientation};

const OVERVIEW: &str = "\
<b>Overview</b>
Open an xyz file (File > Open, Ctrl+O). The structure is drawn on the left and the \
selected quantity is plotted on the right; the table below lists the per-atom data.

<b>Structure panel</b>
<i>Data</i> picks the quantity mapped on the atoms; with none selected atoms take their \
element color. <i>Colormap</i> entries ending in <tt>_r</tt> are reversed. <i>Range</i> \
overrides the data bounds used for the colors. <i>NaN color</i> is used for atoms where the \
quantity is undefined (hex, e.g. #ff00ff). Drag to rotate, scroll to zoom, click an atom to \
print its data in the console.

<b>Distribution panel</b>
<i>histogram</i> shows the probability of the selected quantity with a box plot on top; \
the slider sets the number of bins. Picking another quantity instead plots the selected \
one against it with a quadratic trend line. Summary statistics are listed below the plot.

<b>Data table</b>
Tick the columns to show. Only <tt>custom</tt> cells are editable: type a value and press \
Enter; the views update at once. File > Export table (Ctrl+E) writes the visible columns \
as CSV. Opening a new file after editing asks to reset the session first.

<b>Input files</b>
Standard xyz: atom count, a title line, then one <tt>element x y z</tt> line per atom. \
Coordinates must be in angstrom for the bond detection to be meaningful.";

/// One-line meaning and unit of every table column.
pub fn describe(column: Column) -> &'static str {
  match column {
    Column::AtomIdx => "index of the atom, starting from 0",
    Column::Species => "chemical element as given in the file",
    Column::AtomA => "cartesian coordinates of atom A (angstrom)",
    Column::StarA => "coordinates of the atoms bonded to A (angstrom)",
    Column::PyrA => "pyramidalization angle (degrees)",
    Column::AngularDefect => "angular defect, 360 minus the sum of bond angles (degrees)",
    Column::NStarA => "number of atoms bonded to A",
    Column::SphericalCurvature => "inverse radius of the sphere through A and its neighbours (1/angstrom)",
    Column::Improper => "improper angle (degrees)",
    Column::PyrDistance => "distance of A from the plane of its neighbours (angstrom)",
    Column::Hybridization => "Haddon n tilde, p character moved into the sigma system",
    Column::M => "m = c_pi^2 / lambda_pi^2",
    Column::N => "n = 3m + 2",
    Column::CPi2 => "squared weight of the s orbital in the pi hybrid",
    Column::LambdaPi2 => "squared weight of the p orbital in the pi hybrid",
    Column::AveNeighbDist => "mean distance to the bonded atoms (angstrom)",
    Column::Custom => "user values, edited in the table",
  }
}

fn units_markup() -> String {
  let mut out = String::from("<b>Quantities</b>");
  for column in Column::ALL {
    out.push_str(&format!(
      "\n<tt>{}</tt>: {}",
      glib::markup_escape_text(column.name()),
      glib::markup_escape_text(describe(column))
    ));
  }
  out
}

pub fn build() -> Expander {
  let content = GtkBox::new(Orientation::Vertical, 12);
  content.set_margin_start(10);
  content.set_margin_end(10);
  content.set_margin_bottom(10);

  for markup in [OVERVIEW.to_string(), units_markup()] {
    let label = Label::new(None);
    label.set_markup(&markup);
    label.set_wrap(true);
    label.set_xalign(0.0);
    label.set_halign(Align::Start);
    label.set_selectable(true);
    content.append(&label);
  }

  let expander = Expander::new(Some("Documentation"));
  expander.set_child(Some(&content));
  expander
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_column_is_documented() {
    for column in Column::ALL {
      assert!(!describe(column).is_empty(), "{}", column);
    }
  }
}
