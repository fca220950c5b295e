// src/utils/logger.rs

use gtk4::prelude::*;
use gtk4::{glib, TextView};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::sync::OnceLock;

static CONSOLE: OnceLock<glib::SendWeakRef<TextView>> = OnceLock::new();
static LOGGER: GtkLogger = GtkLogger;

/// Forwards log records to the console pane and mirrors them on stderr.
struct GtkLogger;

const LEVEL_TAGS: [(&str, &str, Option<i32>); 4] = [
  ("error", "#ff4444", Some(700)),
  ("warn", "#ffbb33", None),
  ("info", "#33b5e5", None),
  ("debug", "#aaaaaa", None),
];

pub fn init(view: &TextView) -> Result<(), SetLoggerError> {
  let tag_table = view.buffer().tag_table();
  for (name, color, weight) in LEVEL_TAGS {
    if tag_table.lookup(name).is_some() {
      continue;
    }
    let tag = gtk4::TextTag::new(Some(name));
    tag.set_property("foreground", color);
    if let Some(w) = weight {
      tag.set_property("weight", w);
    }
    tag_table.add(&tag);
  }

  let _ = CONSOLE.set(view.downgrade().into());
  log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug))
}

fn tag_for(level: Level) -> &'static str {
  match level {
    Level::Error => "error",
    Level::Warn => "warn",
    Level::Info => "info",
    Level::Debug | Level::Trace => "debug",
  }
}

impl log::Log for GtkLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= Level::Debug
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }
    eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());

    let tag = tag_for(record.level());
    let msg = format!("{:<5}  {}\n", record.level(), record.args());

    // Records may come from rayon workers; the buffer is touched on the main loop only.
    glib::MainContext::default().invoke(move || {
      let Some(view) = CONSOLE.get().and_then(|w| w.upgrade()) else {
        return;
      };
      let buffer = view.buffer();
      let mut end = buffer.end_iter();
      buffer.insert_with_tags_by_name(&mut end, &msg, &[tag]);

      let mark = buffer.create_mark(None, &buffer.end_iter(), false);
      view.scroll_to_mark(&mark, 0.0, true, 0.0, 1.0);
      buffer.delete_mark(&mark);
    });
  }

  fn flush(&self) {}
}
