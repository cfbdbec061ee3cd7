use eframe::egui;

use crate::network::api::resolve_url;
use crate::ui::bubble::{Bubble, BubbleBody, Direction};

const SENT_FILL: egui::Color32 = egui::Color32::from_rgb(43, 82, 120);
const RECEIVED_FILL: egui::Color32 = egui::Color32::from_rgb(24, 37, 51);
const SEEN_COLOR: egui::Color32 = egui::Color32::from_rgb(51, 144, 236);
const IMAGE_MAX_WIDTH: f32 = 240.0;

/// Renders all bubbles; consumes the scroll request so the view jumps to the
/// newest message once per append.
pub fn render(ui: &mut egui::Ui, bubbles: &[Bubble], base_url: &str, scroll_to_bottom: &mut bool) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for bubble in bubbles {
                let layout = match bubble.direction {
                    Direction::Sent => egui::Layout::right_to_left(egui::Align::TOP),
                    Direction::Received => egui::Layout::left_to_right(egui::Align::TOP),
                };
                ui.with_layout(layout, |ui| render_bubble(ui, bubble, base_url));
            }

            if std::mem::take(scroll_to_bottom) {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

fn render_bubble(ui: &mut egui::Ui, bubble: &Bubble, base_url: &str) {
    let fill = match bubble.direction {
        Direction::Sent => SENT_FILL,
        Direction::Received => RECEIVED_FILL,
    };

    egui::Frame::new()
        .fill(fill)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                match &bubble.body {
                    BubbleBody::Text(text) => {
                        ui.label(text);
                    }
                    BubbleBody::Image { url } => {
                        let source = resolve_url(base_url, url);
                        ui.add(egui::Image::new(source.clone()).max_width(IMAGE_MAX_WIDTH))
                            .on_hover_text(source);
                    }
                }

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&bubble.time_label).small().weak());
                    if bubble.seen_mark {
                        ui.colored_label(SEEN_COLOR, egui::RichText::new("✔✔").small());
                    }
                });
            });
        });
}
