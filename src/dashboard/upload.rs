// src/dashboard/upload.rs

use super::plots::PlotMode;
use super::table::{apply_table_edit, TablePayload};
use crate::error::Result;
use crate::io;
use crate::model::{Column, Molecule};
use crate::physics::{Analysis, StructureAnalyzer};
use crate::state::Session;
use std::path::Path;

/// What triggered an ingestion cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
  /// Window start-up: analyse the default structure.
  Startup,
  Upload { file_name: String, contents: Vec<u8> },
  TableEdited(TablePayload),
}

/// Session-independent inputs of the ingestion handler.
#[derive(Debug, Clone, Copy)]
pub struct IngestDefaults<'a> {
  /// Replaces the bundled default structure when set.
  pub structure_path: Option<&'a Path>,
  pub table_columns: &'a [Column],
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
  Loaded { atoms: usize },
  Edited,
  /// The event was rejected; the session kept its previous records.
  Kept(String),
  /// The event was rejected and there was nothing to keep.
  FellBack(String),
}

/// Options pushed to the dropdowns after each ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutput {
  pub data_options: Vec<Column>,
  pub table_options: Vec<Column>,
  pub table_selection: Vec<Column>,
  pub plot_options: Vec<PlotMode>,
  pub outcome: IngestOutcome,
}

impl Default for IngestOutput {
  fn default() -> Self {
    Self {
      data_options: Column::scalar_columns(),
      table_options: Column::ALL.to_vec(),
      table_selection: Vec::new(),
      plot_options: PlotMode::options(),
      outcome: IngestOutcome::Kept(String::new()),
    }
  }
}

fn analyse_default(analyzer: &dyn StructureAnalyzer, defaults: &IngestDefaults) -> Result<(Molecule, Analysis)> {
  let molecule = match io::default_structure(defaults.structure_path) {
    Ok(m) => m,
    Err(e) => {
      log::warn!("Default structure unavailable ({}), using the bundled one", e);
      io::default_structure(None)?
    }
  };
  let analysis = analyzer.analyze(&molecule)?;
  Ok((molecule, analysis))
}

fn analyse_upload(
  analyzer: &dyn StructureAnalyzer,
  file_name: &str,
  contents: &[u8],
) -> Result<(Molecule, Analysis)> {
  let molecule = io::read_upload(file_name, contents)?;
  let analysis = analyzer.analyze(&molecule)?;
  Ok((molecule, analysis))
}

fn install(session: &mut Session, file_name: Option<String>, molecule: &Molecule, analysis: Analysis, defaults: &IngestDefaults) -> IngestOutcome {
  log::info!(
    "Loaded {} ({}): {} atoms, {} bonds",
    file_name.as_deref().unwrap_or("default structure"),
    molecule.formula(),
    molecule.len(),
    analysis.model.bonds.len()
  );
  session.pristine = Some(analysis.records.clone());
  session.records = Some(analysis.records);
  session.model = analysis.model;
  session.file_name = file_name;
  session.table_edited = false;
  session.table_selection = defaults.table_columns.to_vec();
  IngestOutcome::Loaded {
    atoms: molecule.len(),
  }
}

/// Falls back to the default structure when the session holds nothing yet.
fn keep_or_fall_back(
  session: &mut Session,
  reason: String,
  analyzer: &dyn StructureAnalyzer,
  defaults: &IngestDefaults,
) -> IngestOutcome {
  if session.records.is_some() {
    return IngestOutcome::Kept(reason);
  }
  match analyse_default(analyzer, defaults) {
    Ok((molecule, analysis)) => {
      install(session, None, &molecule, analysis, defaults);
    }
    Err(e) => log::error!("Default structure could not be analysed: {}", e),
  }
  IngestOutcome::FellBack(reason)
}

/// Applies an ingestion event to the session store.
///
/// Never fails: rejected uploads and edits are logged and the store keeps its
/// last valid record set.
pub fn ingest(
  session: &mut Session,
  event: IngestEvent,
  analyzer: &dyn StructureAnalyzer,
  defaults: &IngestDefaults,
) -> IngestOutput {
  let outcome = match event {
    IngestEvent::Startup => match analyse_default(analyzer, defaults) {
      Ok((molecule, analysis)) => install(session, None, &molecule, analysis, defaults),
      Err(e) => {
        log::error!("Default structure could not be analysed: {}", e);
        IngestOutcome::Kept(e.to_string())
      }
    },

    IngestEvent::Upload { file_name, contents } => {
      match analyse_upload(analyzer, &file_name, &contents) {
        Ok((molecule, analysis)) => install(session, Some(file_name), &molecule, analysis, defaults),
        Err(e) => {
          log::warn!("Could not load '{}': {}", file_name, e);
          keep_or_fall_back(session, e.to_string(), analyzer, defaults)
        }
      }
    }

    IngestEvent::TableEdited(payload) => match session.records.as_ref() {
      None => {
        log::warn!("Table edit ignored: no structure loaded");
        keep_or_fall_back(session, "no records".to_string(), analyzer, defaults)
      }
      Some(records) => match apply_table_edit(records, &payload) {
        Ok(edited) => {
          if !edited.same_values(records) {
            session.table_edited = true;
          }
          session.records = Some(edited);
          IngestOutcome::Edited
        }
        Err(e) => {
          log::warn!("Table edit skipped: {}", e);
          IngestOutcome::Kept(e.to_string())
        }
      },
    },
  };

  IngestOutput {
    table_selection: session.table_selection.clone(),
    outcome,
    ..IngestOutput::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DEFAULT_TABLE_COLUMNS;
  use crate::dashboard::table::select_columns;
  use crate::physics::CurvatureAnalyzer;

  const WATER: &str = "3
H2O molecule
O   -0.111056  0.033897  0.043165
H    0.966057  0.959148 -1.089095
H    0.796629 -1.497157  0.403985
";

  fn defaults() -> IngestDefaults<'static> {
    IngestDefaults {
      structure_path: None,
      table_columns: &DEFAULT_TABLE_COLUMNS,
    }
  }

  fn upload(name: &str, text: &str) -> IngestEvent {
    IngestEvent::Upload {
      file_name: name.to_string(),
      contents: text.as_bytes().to_vec(),
    }
  }

  fn water_session() -> Session {
    let mut session = Session::default();
    ingest(&mut session, upload("water.xyz", WATER), &CurvatureAnalyzer::default(), &defaults());
    session
  }

  #[test]
  fn water_upload_produces_three_rows() {
    let mut session = Session::default();
    let out = ingest(&mut session, upload("water.xyz", WATER), &CurvatureAnalyzer::default(), &defaults());

    assert_eq!(out.outcome, IngestOutcome::Loaded { atoms: 3 });
    let records = session.records.as_ref().unwrap();
    assert_eq!(records.rows().iter().map(|r| r.species.as_str()).collect::<Vec<_>>(), vec!["O", "H", "H"]);
    assert_eq!(
      records.rows().iter().map(|r| r.atom_idx).collect::<Vec<_>>(),
      vec![0, 1, 2]
    );
    assert_eq!(records.column_values(Column::Custom).unwrap(), vec![0.0; 3]);
    assert_eq!(session.model.atoms.len(), 3);
    assert_eq!(session.file_name.as_deref(), Some("water.xyz"));
  }

  #[test]
  fn output_lists_the_dropdown_options() {
    let mut session = Session::default();
    let out = ingest(&mut session, IngestEvent::Startup, &CurvatureAnalyzer::default(), &defaults());

    assert_eq!(out.table_selection, DEFAULT_TABLE_COLUMNS.to_vec());
    assert_eq!(out.data_options.len(), 13);
    assert!(!out.data_options.contains(&Column::Species));
    assert_eq!(out.table_options.len(), 17);
    assert_eq!(out.plot_options[0], PlotMode::Histogram);
    assert_eq!(out.plot_options.len(), 14);
  }

  #[test]
  fn upload_resets_table_selection() {
    let mut session = water_session();
    session.table_selection = vec![Column::Custom];
    let out = ingest(&mut session, upload("water.xyz", WATER), &CurvatureAnalyzer::default(), &defaults());
    assert_eq!(out.table_selection, DEFAULT_TABLE_COLUMNS.to_vec());
  }

  #[test]
  fn malformed_upload_keeps_previous_records() {
    let mut session = water_session();
    let before = session.records.clone();

    let out = ingest(&mut session, upload("broken.xyz", "5\ntitle\nO 0 0 0\n"), &CurvatureAnalyzer::default(), &defaults());
    assert!(matches!(out.outcome, IngestOutcome::Kept(_)));
    assert!(session.records.unwrap().same_values(&before.unwrap()));
    assert_eq!(session.file_name.as_deref(), Some("water.xyz"));
  }

  #[test]
  fn unknown_format_without_records_falls_back_to_default() {
    let mut session = Session::default();
    let out = ingest(&mut session, upload("water.pdb", WATER), &CurvatureAnalyzer::default(), &defaults());
    assert!(matches!(out.outcome, IngestOutcome::FellBack(_)));
    assert_eq!(session.records.as_ref().map(|r| r.len()), Some(20));
  }

  #[test]
  fn table_edit_overlays_custom_values() {
    let mut session = water_session();
    let table = select_columns(session.records.as_ref(), &[Column::AtomIdx, Column::Species, Column::Custom]);
    let mut payload = table.payload();
    payload.set(0, Column::Custom, "1.5");
    payload.set(1, Column::Species, "Xe");

    let out = ingest(&mut session, IngestEvent::TableEdited(payload.clone()), &CurvatureAnalyzer::default(), &defaults());
    assert_eq!(out.outcome, IngestOutcome::Edited);
    assert!(session.table_edited);
    let records = session.records.as_ref().unwrap();
    assert_eq!(records.rows()[0].custom, 1.5);
    assert_eq!(records.rows()[1].species, "H");

    // Replaying the same payload changes nothing.
    let snapshot = select_columns(session.records.as_ref(), &Column::ALL);
    ingest(&mut session, IngestEvent::TableEdited(payload), &CurvatureAnalyzer::default(), &defaults());
    assert_eq!(select_columns(session.records.as_ref(), &Column::ALL).payload(), snapshot.payload());
  }

  #[test]
  fn bad_table_edit_is_skipped() {
    let mut session = water_session();
    let before = session.records.clone();
    let mut payload = select_columns(session.records.as_ref(), &[Column::Custom]).payload();
    payload.set(2, Column::Custom, "abc");

    let out = ingest(&mut session, IngestEvent::TableEdited(payload), &CurvatureAnalyzer::default(), &defaults());
    assert!(matches!(out.outcome, IngestOutcome::Kept(_)));
    assert!(session.records.unwrap().same_values(&before.unwrap()));
    assert!(!session.table_edited);
  }

  #[test]
  fn unchanged_payload_does_not_mark_session_edited() {
    let mut session = water_session();
    let payload = select_columns(session.records.as_ref(), &[Column::Custom]).payload();
    ingest(&mut session, IngestEvent::TableEdited(payload), &CurvatureAnalyzer::default(), &defaults());
    assert!(!session.table_edited);
  }
}
