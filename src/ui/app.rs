use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};
use crate::notify::Notifier;

use super::components::{
    chat_area,
    input_bar::{self, InputActions},
    sidebar::{self, SidebarActions},
};
use super::state::{AppState, KeyInput, Layout};

/// Below this width only one pane is shown at a time.
const NARROW_WIDTH: f32 = 640.0;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChatApp {
    state: AppState,
    base_url: String,
    notifier: Box<dyn Notifier>,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        base_url: String,
        notifier: Box<dyn Notifier>,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let app = Self {
            state,
            base_url,
            notifier,
            command_sender,
            event_receiver,
        };
        app.send_command(app.state.load_users());
        app
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                NetworkEvent::Connected => self.state.connected = true,
                NetworkEvent::Disconnected => self.state.connected = false,
                NetworkEvent::UsersLoaded(users) => self.state.apply_users(users),
                NetworkEvent::HistoryLoaded {
                    partner,
                    generation,
                    messages,
                } => self.state.apply_history(
                    &partner,
                    generation,
                    messages,
                    self.notifier.as_ref(),
                ),
                NetworkEvent::MessageReceived(message) => {
                    self.state.receive_message(message, self.notifier.as_ref())
                }
                NetworkEvent::StatusChanged { user, online } => {
                    let command = self.state.on_status_change(&user, online);
                    self.send_command(command);
                }
                NetworkEvent::Typing { sender, recipient } => {
                    self.state
                        .on_typing(&sender, recipient.as_deref(), Instant::now())
                }
            }
        }
    }

    fn send_command(&self, command: NetworkCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }

    fn send_commands(&self, commands: impl IntoIterator<Item = NetworkCommand>) {
        for command in commands {
            self.send_command(command);
        }
    }

    fn apply_sidebar(&mut self, actions: SidebarActions) {
        if actions.search_changed {
            self.send_command(self.state.search_users());
        }
        if let Some(partner) = actions.open_chat {
            let commands = self.state.start_chat(&partner);
            self.send_commands(commands);
        }
    }

    fn apply_input(&mut self, actions: InputActions) {
        for _ in 0..actions.keystrokes {
            let command = self.state.on_key(KeyInput::Character);
            self.send_commands(command);
        }
        if actions.send {
            let command = self.state.on_key(KeyInput::Enter);
            self.send_commands(command);
        }
        if actions.upload {
            let command = self.state.upload_file();
            self.send_commands(command);
        }
    }

    fn render_conversation(&mut self, ui: &mut egui::Ui) {
        let Some(partner) = self.state.active_partner().map(str::to_string) else {
            ui.centered_and_justified(|ui| {
                ui.label("Select a user to start chatting");
            });
            return;
        };

        ui.horizontal(|ui| {
            if ui.button("⬅").clicked() {
                self.state.close_chat();
            }
            ui.heading(&partner);
            ui.label(egui::RichText::new(self.state.typing_indicator(Instant::now())).italics());
        });
        ui.separator();

        let actions = egui::TopBottomPanel::bottom("composer")
            .show_inside(ui, |ui| {
                input_bar::render(
                    ui,
                    &mut self.state.input_text,
                    &mut self.state.attachment_path,
                )
            })
            .inner;

        chat_area::render(
            ui,
            &self.state.bubbles,
            &self.base_url,
            &mut self.state.scroll_to_bottom,
        );

        self.apply_input(actions);
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        let narrow = ctx.screen_rect().width() < NARROW_WIDTH;
        let show_list = !narrow || self.state.layout == Layout::List;
        let show_conversation = !narrow || self.state.layout == Layout::Conversation;

        if !self.state.connected {
            egui::TopBottomPanel::top("connection").show(ctx, |ui| {
                ui.colored_label(egui::Color32::YELLOW, "Not connected to the chat server");
            });
        }

        if show_list {
            let panel = if narrow {
                egui::SidePanel::left("user_list").exact_width(ctx.screen_rect().width())
            } else {
                egui::SidePanel::left("user_list")
                    .resizable(true)
                    .default_width(220.0)
            };
            panel.show(ctx, |ui| {
                let actions = sidebar::render(ui, &mut self.state);
                self.apply_sidebar(actions);
            });
        }

        if show_conversation {
            egui::CentralPanel::default().show(ctx, |ui| self.render_conversation(ui));
        }

        ctx.request_repaint_after(POLL_INTERVAL);
    }
}
