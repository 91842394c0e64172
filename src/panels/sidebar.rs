// src/panels/sidebar.rs

use gtk4::prelude::*;
use gtk4::{
  Align, Box as GtkBox, Button, DrawingArea, DropDown, Expander, Label, ListBox, Orientation,
  PolicyType, ScrolledWindow, SearchEntry, SelectionMode,
};

use crate::analysis::trends::TrendKey;
use crate::analysis::SearchOutcome;
use crate::model::{Block, Category};
use crate::rendering::painter::{self, Palette};
use crate::state::AppState;
use crate::ui::{element_dialog, Views};
use std::cell::RefCell;
use std::rc::Rc;

/// Widgets of the left panel. Built first, wired once `Views` exists.
#[derive(Clone)]
pub struct Sidebar {
  pub root: ScrolledWindow,
  pub search: SearchEntry,
  category: DropDown,
  block: DropDown,
  trend: DropDown,
  trend_info: Label,
  legend: DrawingArea,
  favorites: ListBox,
  favorites_empty: Label,
  quiz_records: Label,
  reset: Button,
}

fn section(title: &str, expanded: bool) -> (Expander, GtkBox) {
  let expander = Expander::new(Some(title));
  expander.set_expanded(expanded);
  let inner = GtkBox::new(Orientation::Vertical, 8);
  inner.set_margin_top(8);
  inner.set_margin_bottom(8);
  inner.set_margin_start(5);
  expander.set_child(Some(&inner));
  (expander, inner)
}

fn caption(text: &str) -> Label {
  Label::builder().label(text).halign(Align::Start).build()
}

/// Dropdown index 0 is always "all" / "none"
fn category_index(category: Option<Category>) -> u32 {
  category
    .and_then(|c| Category::ALL.iter().position(|x| *x == c))
    .map_or(0, |i| i as u32 + 1)
}

fn block_index(block: Option<Block>) -> u32 {
  block
    .and_then(|b| Block::ALL.iter().position(|x| *x == b))
    .map_or(0, |i| i as u32 + 1)
}

fn trend_index(key: Option<TrendKey>) -> u32 {
  key
    .and_then(|k| TrendKey::ALL.iter().position(|x| *x == k))
    .map_or(0, |i| i as u32 + 1)
}

pub fn build(state: &Rc<RefCell<AppState>>) -> Sidebar {
  let scroll = ScrolledWindow::builder()
    .hscrollbar_policy(PolicyType::Never)
    .vscrollbar_policy(PolicyType::Automatic)
    .min_content_width(260)
    .build();

  let root_vbox = GtkBox::new(Orientation::Vertical, 10);
  root_vbox.set_margin_start(10);
  root_vbox.set_margin_end(10);
  root_vbox.set_margin_top(10);
  root_vbox.set_margin_bottom(10);
  scroll.set_child(Some(&root_vbox));

  // ============================================================
  // SECTION 1: SEARCH & FILTERS
  // ============================================================
  let (filters_exp, filters_box) = section("Search & Filters", true);

  let search = SearchEntry::new();
  search.set_placeholder_text(Some("Name, symbol or number"));
  filters_box.append(&search);

  let mut category_labels = vec!["All categories"];
  category_labels.extend(Category::ALL.iter().map(|c| c.label()));
  let category = DropDown::from_strings(&category_labels);
  filters_box.append(&caption("Category"));
  filters_box.append(&category);

  let mut block_labels = vec!["All blocks"];
  block_labels.extend(Block::ALL.iter().map(|b| b.label()));
  let block = DropDown::from_strings(&block_labels);
  filters_box.append(&caption("Block"));
  filters_box.append(&block);

  let reset = Button::with_label("Reset Filters");
  filters_box.append(&reset);
  root_vbox.append(&filters_exp);

  // ============================================================
  // SECTION 2: PERIODIC TRENDS
  // ============================================================
  let (trend_exp, trend_box) = section("Periodic Trends", true);

  let mut trend_labels = vec!["None"];
  trend_labels.extend(TrendKey::ALL.iter().map(|k| k.definition().name));
  let trend = DropDown::from_strings(&trend_labels);
  trend_box.append(&trend);

  let trend_info = Label::builder()
    .halign(Align::Start)
    .wrap(true)
    .max_width_chars(32)
    .build();
  trend_box.append(&trend_info);

  let legend = DrawingArea::new();
  legend.set_content_height(90);
  legend.set_visible(false);
  let s_legend = state.clone();
  legend.set_draw_func(move |_, cr, w, h| {
    let st = s_legend.borrow();
    let palette = Palette::from_state(&st);
    let _ = painter::draw_background(cr, &palette);
    if let Some(view) = &st.trend {
      if let Err(e) = painter::draw_legend(cr, view.definition(), 4.0, 4.0, w as f64 - 8.0, h as f64 - 8.0, &palette) {
        log::error!("Legend drawing failed: {}", e);
      }
    }
  });
  trend_box.append(&legend);
  root_vbox.append(&trend_exp);

  // ============================================================
  // SECTION 3: FAVORITES
  // ============================================================
  let (fav_exp, fav_box) = section("Favorites", true);
  let favorites_empty = caption("No favorites yet. Open an element and press ☆.");
  favorites_empty.set_wrap(true);
  fav_box.append(&favorites_empty);

  let favorites = ListBox::new();
  favorites.set_selection_mode(SelectionMode::None);
  favorites.set_activate_on_single_click(true);
  fav_box.append(&favorites);
  root_vbox.append(&fav_exp);

  // ============================================================
  // SECTION 4: QUIZ RECORDS
  // ============================================================
  let (quiz_exp, quiz_box) = section("Quiz", false);
  let quiz_records = caption("");
  quiz_box.append(&quiz_records);
  root_vbox.append(&quiz_exp);

  let sidebar = Sidebar {
    root: scroll,
    search,
    category,
    block,
    trend,
    trend_info,
    legend,
    favorites,
    favorites_empty,
    quiz_records,
    reset,
  };
  sidebar.sync(state);
  sidebar
}

impl Sidebar {
  /// Signal handlers; each one runs a state command and refreshes every view
  pub fn connect(&self, state: &Rc<RefCell<AppState>>, views: &Views) {
    let (s, v) = (state.clone(), views.clone());
    self.search.connect_search_changed(move |entry| {
      let outcome = s.borrow_mut().set_search(&entry.text());
      if let SearchOutcome::Single(z) = outcome {
        let st = s.borrow();
        if let Some(e) = st.element(z) {
          st.announce(&format!("Found {}", e.display_label()));
        }
      }
      v.refresh(&s);
    });

    let (s, v) = (state.clone(), views.clone());
    self.category.connect_selected_notify(move |d| {
      let category = (d.selected() as usize).checked_sub(1).and_then(|i| Category::ALL.get(i).copied());
      if s.borrow().filters.category == category {
        return;
      }
      s.borrow_mut().set_category_filter(category);
      v.refresh(&s);
    });

    let (s, v) = (state.clone(), views.clone());
    self.block.connect_selected_notify(move |d| {
      let block = (d.selected() as usize).checked_sub(1).and_then(|i| Block::ALL.get(i).copied());
      if s.borrow().filters.block == block {
        return;
      }
      s.borrow_mut().set_block_filter(block);
      v.refresh(&s);
    });

    let (s, v) = (state.clone(), views.clone());
    self.reset.connect_clicked(move |_| {
      s.borrow_mut().reset_filters();
      log::info!("Filters reset");
      v.refresh(&s);
    });

    let (s, v) = (state.clone(), views.clone());
    self.trend.connect_selected_notify(move |d| {
      let key = match (d.selected() as usize).checked_sub(1) {
        Some(i) => TrendKey::ALL.get(i).map(|k| k.id()).unwrap_or("none"),
        None => "none",
      };
      let current = s.borrow().active_trend().map(|k| k.id()).unwrap_or("none");
      if current == key {
        return;
      }
      // On failure the refresh puts the dropdown back
      v.select_trend(&s, key);
    });

    let (s, v) = (state.clone(), views.clone());
    self.favorites.connect_row_activated(move |_, row| {
      let z = s.borrow().favorites().get(row.index() as usize).copied();
      if let Some(z) = z {
        element_dialog::show(&v, s.clone(), z);
      }
    });
  }

  /// Copies the state into the widgets. Handlers ignore values that already match.
  pub fn sync(&self, state: &Rc<RefCell<AppState>>) {
    let (query, filters, trend, info, favorites, records) = {
      let st = state.borrow();
      let info = st.trend.as_ref().map(|view| {
        let def = view.definition();
        format!(
          "{}\n\n→ Left to right: {}\n↓ Top to bottom: {}\n\n{} of {} elements have data.",
          def.description,
          def.left_to_right(),
          def.top_to_bottom(),
          view.count_known(),
          st.elements.len()
        )
      });
      let favorites: Vec<String> = st
        .favorites()
        .iter()
        .filter_map(|z| st.element(*z))
        .map(|e| format!("★ {} · {}", e.atomic_number, e.display_label()))
        .collect();
      let records = format!(
        "Best score: {}\nLongest streak: {}",
        st.config.quiz.best_score, st.config.quiz.max_streak
      );
      (st.search_query.clone(), st.filters, st.active_trend(), info, favorites, records)
    };

    if self.search.text() != query {
      self.search.set_text(&query);
    }
    if self.category.selected() != category_index(filters.category) {
      self.category.set_selected(category_index(filters.category));
    }
    if self.block.selected() != block_index(filters.block) {
      self.block.set_selected(block_index(filters.block));
    }
    if self.trend.selected() != trend_index(trend) {
      self.trend.set_selected(trend_index(trend));
    }

    self.trend_info.set_visible(info.is_some());
    self.trend_info.set_text(info.as_deref().unwrap_or(""));
    self.legend.set_visible(trend.is_some());
    self.legend.queue_draw();

    while let Some(child) = self.favorites.first_child() {
      self.favorites.remove(&child);
    }
    for text in &favorites {
      self.favorites.append(&caption(text));
    }
    self.favorites_empty.set_visible(favorites.is_empty());
    self.quiz_records.set_text(&records);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_dropdown_indices() {
    assert_eq!(category_index(None), 0);
    assert_eq!(category_index(Some(Category::ALL[0])), 1);
    assert_eq!(block_index(Some(Block::F)), 4);
    assert_eq!(trend_index(Some(TrendKey::ALL[4])), 5);
    assert_eq!(trend_index(None), 0);
  }
}
