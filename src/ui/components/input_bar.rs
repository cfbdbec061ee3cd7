use std::path::PathBuf;

use eframe::egui;

#[derive(Default)]
pub struct InputActions {
    pub send: bool,
    /// Character keystrokes typed into the composer this frame.
    pub keystrokes: usize,
    pub upload: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    input_text: &mut String,
    attachment_path: &mut Option<PathBuf>,
) -> InputActions {
    let mut actions = InputActions::default();

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text).hint_text("Write a message..."),
        );
        if ui.button("Send").clicked() {
            actions.send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.send = true;
            response.request_focus();
        } else if response.has_focus() {
            actions.keystrokes = ui.input(|i| {
                i.events
                    .iter()
                    .filter(|event| matches!(event, egui::Event::Text(_)))
                    .count()
            });
        }
    });

    ui.horizontal(|ui| {
        if ui.button("📎 Attach").clicked() {
            if let Some(path) = rfd::FileDialog::new().set_title("Attach a file").pick_file() {
                *attachment_path = Some(path);
            }
        }

        match attachment_path.as_ref() {
            Some(path) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                ui.label(file_name);
                if ui.small_button("✕").clicked() {
                    *attachment_path = None;
                }
            }
            None => {
                ui.weak("No file selected");
            }
        }

        if ui
            .add_enabled(attachment_path.is_some(), egui::Button::new("Upload"))
            .clicked()
        {
            actions.upload = true;
        }
    });

    actions
}
