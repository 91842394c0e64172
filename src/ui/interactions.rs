// src/ui/interactions.rs

use crate::analysis::comparison::PickStep;
use crate::rendering::{self, Slot};
use crate::state::AppState;
use crate::ui::{comparison_window, element_dialog, show_error, Views};
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, EventControllerMotion, GestureClick};
use std::cell::RefCell;
use std::rc::Rc;

fn arrow_delta(key: gdk::Key) -> Option<(i32, i32)> {
  match key {
    gdk::Key::Left => Some((-1, 0)),
    gdk::Key::Right => Some((1, 0)),
    gdk::Key::Up => Some((0, -1)),
    gdk::Key::Down => Some((0, 1)),
    _ => None,
  }
}

/// Same entry point for clicks and Enter: comparison pick or detail dialog
fn activate_element(views: &Views, state: &Rc<RefCell<AppState>>, z: u32) {
  if !state.borrow().is_interactive(z) {
    return;
  }

  let awaiting = state.borrow().comparison.is_awaiting();
  if awaiting {
    let step = state.borrow_mut().pick_for_comparison(z);
    match step {
      Ok(PickStep::Ready(a, b)) => {
        log::info!("Comparing elements {} and {}", a, b);
        comparison_window::open(views, state.clone());
      }
      Ok(PickStep::FirstChosen) => comparison_window::open(views, state.clone()),
      Err(e) => show_error(&views.window, "Comparison failed", &e.to_string()),
    }
    views.refresh(state);
    return;
  }

  state.borrow_mut().focused = Some(z);
  views.refresh(state);
  element_dialog::show(views, state.clone(), z);
}

pub fn setup_interactions(views: &Views, state: Rc<RefCell<AppState>>) {
  let table = views.table.clone();
  table.set_focusable(true);

  // 1. CLICK
  let click = GestureClick::new();
  let (s, v) = (state.clone(), views.clone());
  click.connect_pressed(move |_, _, x, y| {
    v.table.grab_focus();
    let slot = {
      let st = s.borrow();
      rendering::widget_layout(&v.table, &st).hit_test(x, y)
    };
    match slot {
      Some(Slot::Marker(series)) => {
        s.borrow_mut().toggle_series_highlight(series);
        v.refresh(&s);
      }
      Some(Slot::Element(z)) => activate_element(&v, &s, z),
      None => {}
    }
  });
  table.add_controller(click);

  // 2. HOVER + TOOLTIP
  let motion = EventControllerMotion::new();
  let (s, da) = (state.clone(), table.clone());
  motion.connect_motion(move |_, x, y| {
    let (hovered, tooltip) = {
      let st = s.borrow();
      let hovered = rendering::widget_layout(&da, &st)
        .hit_test(x, y)
        .and_then(|slot| slot.atomic_number());
      if hovered == st.hovered {
        return;
      }
      let tooltip = hovered.and_then(|z| {
        let trend_text = st.trend.as_ref().and_then(|t| t.tooltip_of(z)).map(str::to_string);
        trend_text.or_else(|| st.element(z).map(|e| e.display_label()))
      });
      (hovered, tooltip)
    };
    s.borrow_mut().hovered = hovered;
    da.set_tooltip_text(tooltip.as_deref());
    da.queue_draw();
  });

  let (s, da) = (state.clone(), table.clone());
  motion.connect_leave(move |_| {
    if s.borrow_mut().hovered.take().is_some() {
      da.set_tooltip_text(None);
      da.queue_draw();
    }
  });
  table.add_controller(motion);

  // 3. KEYBOARD
  let keys = EventControllerKey::new();
  let (s, v) = (state.clone(), views.clone());
  keys.connect_key_pressed(move |_, keyval, _keycode, _mods| {
    // A. Arrows move the focus ring
    if let Some((dx, dy)) = arrow_delta(keyval) {
      let next = {
        let st = s.borrow();
        if !st.config.accessibility.keyboard_navigation {
          return glib::Propagation::Proceed;
        }
        let from = st.focused.unwrap_or(1);
        if st.focused.is_none() {
          Some(from)
        } else {
          rendering::widget_layout(&v.table, &st).step(from, dx, dy)
        }
      };
      if let Some(z) = next {
        s.borrow_mut().focused = Some(z);
        let st = s.borrow();
        if let Some(e) = st.element(z) {
          st.announce(&format!("{}, atomic number {}", e.display_label(), z));
        }
      }
      v.table.queue_draw();
      return glib::Propagation::Stop;
    }

    // B. Enter / Space opens the focused element
    if matches!(keyval, gdk::Key::Return | gdk::Key::KP_Enter | gdk::Key::space) {
      let focused = s.borrow().focused;
      if let Some(z) = focused {
        activate_element(&v, &s, z);
        return glib::Propagation::Stop;
      }
      return glib::Propagation::Proceed;
    }

    // C. Escape clears search and focus
    if keyval == gdk::Key::Escape {
      {
        let mut st = s.borrow_mut();
        st.set_search("");
        st.focused = None;
        st.highlighted_series = None;
      }
      v.refresh(&s);
      return glib::Propagation::Stop;
    }

    glib::Propagation::Proceed
  });
  table.add_controller(keys);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_arrow_delta() {
    assert_eq!(arrow_delta(gdk::Key::Left), Some((-1, 0)));
    assert_eq!(arrow_delta(gdk::Key::Down), Some((0, 1)));
    assert_eq!(arrow_delta(gdk::Key::a), None);
  }
}
