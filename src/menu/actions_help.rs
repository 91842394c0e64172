use gtk4::prelude::*;
use gtk4::{AboutDialog, Application, ApplicationWindow, ButtonsType, License, MessageDialog, MessageType};

const SHORTCUTS: &[(&str, &str)] = &[
    ("Click element", "Open details (or pick for comparison)"),
    ("Click La-Lu / Ac-Lr", "Highlight the f-block series"),
    ("Arrow keys", "Move focus (enable in Preferences > Accessibility)"),
    ("Enter / Space", "Open the focused element"),
    ("Escape", "Clear search and focus"),
    ("Ctrl+F", "Find element"),
    ("Ctrl+R", "Reset filters"),
    ("Ctrl+T", "Toggle dark theme"),
    ("Ctrl+E / Ctrl+Shift+E", "Export data / image"),
    ("Ctrl+K", "Quiz"),
    ("Ctrl+M", "Compare elements"),
    ("F9", "Toggle sidebar"),
];

fn shortcuts_text() -> String {
    SHORTCUTS
        .iter()
        .map(|(keys, what)| format!("{:<24} {}", keys, what))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn setup(app: &Application, window: &ApplicationWindow) {

    // --- ABOUT ACTION ---
    let about_action = gtk4::gio::SimpleAction::new("about", None);
    let win_weak = window.downgrade();

    about_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            let dialog = AboutDialog::builder()
                .transient_for(&win)
                .modal(true)
                .program_name("PTView")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("An interactive periodic table with property trends, written in Rust and GTK4.")
                .license_type(License::MitX11)
                .logo_icon_name("applications-science")
                .build();

            dialog.present();
        }
    });
    app.add_action(&about_action);


    // --- CONTROLS ACTION ---
    let controls_action = gtk4::gio::SimpleAction::new("help_controls", None);
    let win_weak = window.downgrade();

    controls_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            let dialog = MessageDialog::builder()
                .transient_for(&win)
                .modal(true)
                .message_type(MessageType::Info)
                .buttons(ButtonsType::Close)
                .text("Controls & Shortcuts")
                .secondary_text(shortcuts_text())
                .build();
            dialog.connect_response(|d, _| d.destroy());
            dialog.present();
        }
    });
    app.add_action(&controls_action);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts_text_has_one_line_per_entry() {
        let text = shortcuts_text();
        assert_eq!(text.lines().count(), SHORTCUTS.len());
        assert!(text.contains("F9"));
    }
}
