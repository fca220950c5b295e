// src/io/xyz.rs

use crate::error::{DashboardError, Result};
use crate::model::{Atom, Molecule};

/// Parses an XYZ document:
///   line 1: number of atoms
///   line 2: title (free text, may carry extended-XYZ key=value pairs)
///   then one `symbol x y z` line per atom, coordinates in Angstrom.
pub fn parse(contents: &str) -> Result<Molecule> {
    let mut lines = contents.lines().enumerate();

    // 1. Number of Atoms
    let (_, count_line) = lines
        .next()
        .ok_or_else(|| DashboardError::parse(1, "empty XYZ file"))?;
    let n_atoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| DashboardError::parse(1, format!("invalid atom count '{}'", count_line.trim())))?;
    if n_atoms == 0 {
        return Err(DashboardError::EmptyStructure);
    }

    // 2. Title line
    let title = lines
        .next()
        .map(|(_, l)| l.trim().to_string())
        .ok_or_else(|| DashboardError::parse(2, "missing title line"))?;

    // 3. Atoms
    let mut atoms = Vec::with_capacity(n_atoms);
    for (i, line) in lines {
        let line_no = i + 1;
        if atoms.len() == n_atoms {
            if line.trim().is_empty() {
                continue;
            }
            return Err(DashboardError::parse(
                line_no,
                format!("more atom lines than the declared {}", n_atoms),
            ));
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(DashboardError::parse(
                line_no,
                "expected 'element x y z'",
            ));
        }

        let coord = |s: &str, axis: &str| -> Result<f64> {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DashboardError::parse(line_no, format!("invalid {} coordinate '{}'", axis, s)))
        };

        atoms.push(Atom {
            element: parts[0].to_string(),
            position: [coord(parts[1], "x")?, coord(parts[2], "y")?, coord(parts[3], "z")?],
        });
    }

    if atoms.len() != n_atoms {
        return Err(DashboardError::parse(
            atoms.len() + 3,
            format!("declared {} atoms but found {}", n_atoms, atoms.len()),
        ));
    }

    Ok(Molecule { title, atoms })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "3
H2O molecule
O   -0.111056  0.033897  0.043165
H    0.966057  0.959148 -1.089095
H    0.796629 -1.497157  0.403985
";

    #[test]
    fn parses_documentation_water() {
        let mol = parse(WATER).unwrap();
        assert_eq!(mol.title, "H2O molecule");
        assert_eq!(mol.len(), 3);
        assert_eq!(mol.atoms[0].element, "O");
        assert_eq!(mol.atoms[2].position, [0.796629, -1.497157, 0.403985]);
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let text = format!("{}\n\n", WATER);
        assert_eq!(parse(&text).unwrap().len(), 3);
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let text = "1\nLattice=\"10 0 0 0 10 0 0 0 10\"\nC 0.0 0.0 0.0 0.1 0.2\n";
        let mol = parse(text).unwrap();
        assert_eq!(mol.atoms[0].element, "C");
    }

    #[test]
    fn bad_count_is_rejected() {
        let err = parse("three\ntitle\nO 0 0 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { line: 1, .. }));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = parse("4\ntitle\nO 0 0 0\nH 1 0 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));

        let err = parse("1\ntitle\nO 0 0 0\nH 1 0 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { line: 4, .. }));
    }

    #[test]
    fn non_numeric_coordinate_reports_line() {
        let err = parse("2\ntitle\nO 0 0 0\nH 1 zero 0\n").unwrap_err();
        match err {
            DashboardError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("y coordinate"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn infinite_coordinate_is_rejected() {
        let err = parse("2\ntitle\nO 0 0 0\nH inf 0 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { line: 4, .. }));
    }

    #[test]
    fn zero_atoms_is_empty_structure() {
        assert!(matches!(parse("0\nnothing\n"), Err(DashboardError::EmptyStructure)));
    }
}
