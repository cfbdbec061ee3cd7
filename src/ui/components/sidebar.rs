use crate::ui::state::AppState;
use eframe::egui;

#[derive(Default)]
pub struct SidebarActions {
    pub search_changed: bool,
    pub open_chat: Option<String>,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("Chats");
    ui.label(egui::RichText::new(format!("Signed in as {}", state.session.local_user)).weak());
    ui.separator();

    let search = ui.add(egui::TextEdit::singleline(&mut state.search_text).hint_text("Search users"));
    actions.search_changed = search.changed();

    ui.separator();

    let visible = state.visible_users();
    if visible.is_empty() {
        ui.label("No users found");
        return actions;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for user in visible {
            let selected = state.active_partner() == Some(user.username.as_str());
            ui.horizontal(|ui| {
                let initial = user
                    .username
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().to_string())
                    .unwrap_or_default();
                ui.label(egui::RichText::new(initial).strong());

                let row = ui.selectable_label(selected, &user.username);
                if row.clicked() {
                    actions.open_chat = Some(user.username.clone());
                }

                let (dot, color, status) = if user.online {
                    ("●", egui::Color32::GREEN, "Online")
                } else {
                    ("○", egui::Color32::GRAY, "Offline")
                };
                ui.label(egui::RichText::new(status).weak());
                ui.colored_label(color, dot);

                if let Some(count) = state.unread.get(&user.username) {
                    ui.colored_label(egui::Color32::LIGHT_BLUE, format!("({count})"));
                }
            });
        }
    });

    actions
}
