// src/state.rs

use crate::config::Config;
use crate::dashboard::plots::{self, PlotFigure, PlotMode, PlotRequest, StatsTable};
use crate::dashboard::styling::{self, ColorRequest, ColorbarFigure, StyleMap};
use crate::dashboard::table::{self, TableView};
use crate::dashboard::upload::{self, IngestDefaults, IngestEvent, IngestOutput};
use crate::model::{element_colors, Column, MolecularModel, RecordSet};
use crate::physics::StructureAnalyzer;

/// The per-window store. Everything the handlers read and write lives here.
#[derive(Debug, Clone, Default)]
pub struct Session {
  pub records: Option<RecordSet>,
  /// Records as produced by the last successful analysis, before any edit.
  pub pristine: Option<RecordSet>,
  pub model: MolecularModel,
  pub file_name: Option<String>,
  pub table_edited: bool,
  pub table_selection: Vec<Column>,
}

impl Session {
  /// Uploading over manual edits would discard them.
  pub fn needs_reset_confirmation(&self) -> bool {
    self.table_edited
  }

  /// Drops table edits, going back to the analysed records.
  pub fn reset(&mut self) {
    if self.table_edited {
      log::info!("Session reset: table edits discarded");
    }
    self.records = self.pristine.clone();
    self.table_edited = false;
  }
}

/// Current values of the dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
  pub selected_data: Option<Column>,
  pub colormap: String,
  pub cm_min: Option<f64>,
  pub cm_max: Option<f64>,
  pub nan_color: Option<String>,
  pub plot_mode: PlotMode,
  pub nbins: usize,
}

impl Controls {
  pub fn from_config(config: &Config) -> Self {
    Self {
      selected_data: None,
      colormap: config.default_colormap.clone(),
      cm_min: None,
      cm_max: None,
      nan_color: None,
      plot_mode: PlotMode::Histogram,
      nbins: config.default_bins,
    }
  }

  pub fn color_request(&self) -> ColorRequest {
    ColorRequest {
      column: self.selected_data,
      colormap: self.colormap.clone(),
      min: self.cm_min,
      max: self.cm_max,
      nan_color: self.nan_color.clone(),
    }
  }

  pub fn plot_request(&self) -> PlotRequest {
    PlotRequest {
      primary: self.selected_data,
      mode: self.plot_mode,
      nbins: self.nbins,
    }
  }
}

/// Camera of the structure viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
  pub rot_x: f64,
  pub rot_y: f64,
  pub zoom: f64,
}

impl Default for ViewState {
  fn default() -> Self {
    Self {
      rot_x: 0.0,
      rot_y: 0.0,
      zoom: 1.0,
    }
  }
}

pub struct AppState {
  pub config: Config,
  pub session: Session,
  pub controls: Controls,
  pub view: ViewState,
  pub options: IngestOutput,

  // Derived views
  pub styles: StyleMap,
  pub colorbar: ColorbarFigure,
  pub figure: PlotFigure,
  pub stats: StatsTable,
  pub table: TableView,
}

impl AppState {
  pub fn new(config: Config) -> Self {
    let controls = Controls::from_config(&config);
    Self {
      config,
      session: Session::default(),
      controls,
      view: ViewState::default(),
      options: IngestOutput::default(),
      styles: StyleMap::new(),
      colorbar: ColorbarFigure::Empty,
      figure: PlotFigure::Empty,
      stats: StatsTable::default(),
      table: TableView::default(),
    }
  }

  /// Runs the ingestion handler and refreshes every derived view.
  pub fn ingest(&mut self, event: IngestEvent, analyzer: &dyn StructureAnalyzer) {
    let defaults = IngestDefaults {
      structure_path: self.config.default_structure_path.as_deref(),
      table_columns: &self.config.default_table_columns,
    };
    self.options = upload::ingest(&mut self.session, event, analyzer, &defaults);
    self.refresh_all();
  }

  pub fn refresh_all(&mut self) {
    self.refresh_table();
    self.refresh_styles();
    self.refresh_plot();
  }

  pub fn refresh_table(&mut self) {
    self.table = table::select_columns(self.session.records.as_ref(), &self.session.table_selection);
  }

  /// Structure colors and the colorbar share the same inputs.
  pub fn refresh_styles(&mut self) {
    let request = self.controls.color_request();
    let records = self.session.records.as_ref();
    self.styles = styling::style_atoms(records, &request, element_colors());
    self.colorbar = styling::build_colorbar(records, &request);
  }

  pub fn refresh_plot(&mut self) {
    let (figure, stats) = plots::build_plot(self.session.records.as_ref(), &self.controls.plot_request());
    self.figure = figure;
    self.stats = stats;
  }

  pub fn set_table_selection(&mut self, columns: Vec<Column>) {
    self.session.table_selection = columns;
    self.refresh_table();
  }

  pub fn reset_session(&mut self) {
    self.session.reset();
    self.refresh_all();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dashboard::table::TablePayload;
  use crate::physics::CurvatureAnalyzer;

  fn started() -> AppState {
    let mut st = AppState::new(Config::default());
    st.ingest(IngestEvent::Startup, &CurvatureAnalyzer::default());
    st
  }

  #[test]
  fn startup_fills_every_view() {
    let st = started();
    assert_eq!(st.session.records.as_ref().map(|r| r.len()), Some(20));
    assert_eq!(st.table.columns.len(), 5);
    assert_eq!(st.table.rows.len(), 20);
    assert_eq!(st.styles.len(), 20);
    assert_eq!(st.colorbar, ColorbarFigure::Empty);
    assert_eq!(st.figure, PlotFigure::Empty);
  }

  #[test]
  fn selecting_data_updates_colors_and_plot() {
    let mut st = started();
    st.controls.selected_data = Some(Column::PyrA);
    st.refresh_styles();
    st.refresh_plot();
    assert!(matches!(st.colorbar, ColorbarFigure::Gradient { .. }));
    assert!(matches!(st.figure, PlotFigure::Histogram { .. }));
    assert_eq!(st.stats.rows.len(), 1);
  }

  #[test]
  fn reset_restores_analysed_records() {
    let mut st = started();
    let mut payload = TablePayload {
      columns: vec![Column::Custom],
      rows: vec![vec!["0".to_string()]; 20],
    };
    payload.set(3, Column::Custom, "9");
    st.ingest(IngestEvent::TableEdited(payload), &CurvatureAnalyzer::default());
    assert!(st.session.needs_reset_confirmation());

    st.reset_session();
    assert!(!st.session.needs_reset_confirmation());
    let custom = st.session.records.as_ref().unwrap().column_values(Column::Custom).unwrap();
    assert!(custom.iter().all(|v| *v == 0.0));
  }
}
