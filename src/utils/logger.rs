// src/utils/logger.rs

//! `log` backend that writes into the notification console at the bottom of the window.
//! Lines are also mirrored to stderr so terminal launches keep a trace.

use gtk4::prelude::*;
use gtk4::{glib, TextView};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::sync::OnceLock;

static LOG_VIEW: OnceLock<glib::SendWeakRef<TextView>> = OnceLock::new();
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Older lines are dropped past this point
const MAX_LINES: i32 = 500;

struct ConsoleLogger;

/// (tag, foreground, bold)
const TAGS: [(&str, &str, bool); 4] = [
  ("error", "#e74c3c", true),
  ("warn", "#f39c12", false),
  ("info", "#3498db", false),
  ("debug", "#95a5a6", false),
];

pub fn init(view: &TextView) -> Result<(), SetLoggerError> {
  let buffer = view.buffer();
  let tag_table = buffer.tag_table();

  for (name, color, bold) in TAGS {
    if tag_table.lookup(name).is_none() {
      let tag = gtk4::TextTag::new(Some(name));
      tag.set_property("foreground", color);
      if bold {
        tag.set_property("weight", 700);
      }
      tag_table.add(&tag);
    }
  }

  let _ = LOG_VIEW.set(view.downgrade().into());
  log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug))
}

fn level_style(level: Level) -> (&'static str, &'static str) {
  match level {
    Level::Error => ("✖", "error"),
    Level::Warn => ("⚠", "warn"),
    Level::Info => ("ℹ", "info"),
    Level::Debug | Level::Trace => ("·", "debug"),
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    // Library chatter only from warnings up
    if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
      metadata.level() <= Level::Debug
    } else {
      metadata.level() <= Level::Warn
    }
  }

  fn log(&self, record: &Record) {
    if !self.enabled(record.metadata()) {
      return;
    }
    let (icon, tag_name) = level_style(record.level());
    let stamp = chrono::Local::now().format("%H:%M:%S");
    eprintln!("[{}] {:<5} {}", stamp, record.level(), record.args());

    // Debug lines stay on stderr
    if record.level() > Level::Info {
      return;
    }
    let msg = format!("{} {}  {}\n", stamp, icon, record.args());

    glib::MainContext::default().spawn_local(async move {
      let Some(view) = LOG_VIEW.get().and_then(|weak| weak.upgrade()) else {
        return;
      };
      let buffer = view.buffer();
      let mut end = buffer.end_iter();
      buffer.insert_with_tags_by_name(&mut end, &msg, &[tag_name]);

      let overflow = buffer.line_count() - MAX_LINES;
      if overflow > 0 {
        let mut start = buffer.start_iter();
        if let Some(mut cut) = buffer.iter_at_line(overflow) {
          buffer.delete(&mut start, &mut cut);
        }
      }

      let mark = buffer.create_mark(None, &buffer.end_iter(), false);
      view.scroll_to_mark(&mark, 0.0, true, 0.0, 1.0);
      buffer.delete_mark(&mark);
    });
  }

  fn flush(&self) {}
}
