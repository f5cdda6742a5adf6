use std::path::PathBuf;

use chrono::Local;
use eframe::egui::{self, Context as EguiContext, Event, InputState, Key, TopBottomPanel};
use eframe::{App, Frame};

use crate::action_bar;
use crate::canvas;
use crate::clipboard;
use crate::error::{EditorError, EditorResult};
use crate::flatten;
use crate::help;
use crate::interaction::EditorKey;
use crate::settings::UserSettings;
use crate::state::{EditorState, Tab};
use crate::theme;
use crate::toolbar;
use crate::ui_controls;
use crate::view_panel;

pub struct UmpireTrackApp {
    pub state: EditorState,
    theme: theme::AppTheme,
    copy_feedback_until: Option<f64>,
}

impl UmpireTrackApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: UserSettings) -> Self {
        let app = Self::with_state(EditorState::new(settings));
        theme::apply_theme(&cc.egui_ctx, &app.theme);
        app
    }

    fn with_state(state: EditorState) -> Self {
        Self {
            state,
            theme: theme::athletics_theme(),
            copy_feedback_until: None,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        let typing = ctx.wants_keyboard_input() || self.state.controller.text_edit().is_some();
        let tab = self.state.tab;
        let shortcuts = ctx.input(|input| read_shortcuts(input, tab, typing));

        for shortcut in shortcuts {
            match shortcut {
                Shortcut::CopyReference => self.copy_reference(ctx),
                Shortcut::CopyCanvas => self.copy_canvas(ctx),
                Shortcut::Save => self.save_to_file(),
                Shortcut::Rotate => {
                    self.state
                        .controller
                        .key_down(&mut self.state.board, EditorKey::Rotate);
                }
                Shortcut::Delete => {
                    self.state
                        .controller
                        .key_down(&mut self.state.board, EditorKey::Delete);
                }
            }
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.state.tab == tab {
            return;
        }
        // An open text editor is not drawn on other tabs, so commit it now.
        self.state.controller.finish_editing(&mut self.state.board);
        self.state.controller.pointer_up();
        self.state.tab = tab;
    }

    fn copy_reference(&mut self, ctx: &EguiContext) {
        let Some(image) = self.state.reference.image.as_ref() else {
            return;
        };
        match clipboard::write_image_to_clipboard(&image.dynamic) {
            Ok(()) => {
                self.state.notify("Copied diagram to clipboard");
                self.mark_copied(ctx);
            }
            Err(err) => self.state.report(&err),
        }
    }

    fn copy_canvas(&mut self, ctx: &EguiContext) {
        let result = self
            .flatten_canvas()
            .and_then(|image| clipboard::write_image_to_clipboard(&image));
        match result {
            Ok(()) => {
                self.state.notify("Copied canvas to clipboard");
                self.mark_copied(ctx);
            }
            Err(err) => self.state.report(&err),
        }
    }

    fn flatten_canvas(&self) -> EditorResult<image::DynamicImage> {
        let editing = self
            .state
            .controller
            .text_edit()
            .map(|edit| edit.annotation_id);
        flatten::flatten(
            self.state.background.as_ref().map(|image| &image.dynamic),
            &self.state.board,
            editing,
        )
        .map_err(|err| EditorError::export("clipboard", err))
    }

    fn mark_copied(&mut self, ctx: &EguiContext) {
        self.copy_feedback_until = Some(ctx.input(|input| input.time) + 1.5);
    }

    fn save_to_file(&mut self) {
        let default_name = format!(
            "umpire-track {}.png",
            Local::now().format("%Y-%m-%d %H.%M.%S")
        );
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save Image")
            .set_file_name(&default_name)
            .add_filter("PNG", &["png"]);
        if let Some(dir) = self.state.settings.last_export_dir.as_deref() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            tracing::debug!("save dialog cancelled");
            return;
        };
        let path = with_png_extension(path);

        let editing = self
            .state
            .controller
            .text_edit()
            .map(|edit| edit.annotation_id);
        let result = flatten::export_png(
            self.state.background.as_ref().map(|image| &image.dynamic),
            &self.state.board,
            editing,
            &path,
        );
        match result {
            Ok(()) => {
                self.state.settings.remember_export_dir(&path);
                self.state.notify(format!("Saved {}", path.display()));
            }
            Err(err) => self.state.report(&err),
        }
    }

    fn show_tab_bar(&mut self, ctx: &EguiContext) {
        let mut requested = None;
        TopBottomPanel::top("tabs")
            .frame(ui_controls::tab_bar_frame(&self.theme))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let tabs = [(Tab::Help, "Help"), (Tab::View, "View"), (Tab::Edit, "Edit")];
                    for (tab, label) in tabs {
                        let selected = self.state.tab == tab;
                        if ui_controls::tab_chip(ui, &self.theme, label, selected).clicked() {
                            requested = Some(tab);
                        }
                    }
                });
            });
        if let Some(tab) = requested {
            self.switch_tab(tab);
        }
    }

    fn show_status_line(&self, ctx: &EguiContext) {
        TopBottomPanel::bottom("status")
            .frame(ui_controls::tab_bar_frame(&self.theme))
            .show(ctx, |ui| match self.state.status.as_ref() {
                Some(status) => {
                    ui_controls::status_text(ui, &self.theme, &status.text, status.is_error)
                }
                None => ui_controls::status_text(ui, &self.theme, " ", false),
            });
    }
}

impl App for UmpireTrackApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.handle_shortcuts(ctx);
        self.show_tab_bar(ctx);
        self.show_status_line(ctx);

        let copied_feedback = self
            .copy_feedback_until
            .is_some_and(|deadline| ctx.input(|input| input.time) <= deadline);

        let mut copy_reference = false;
        let mut action_output = None;
        egui::CentralPanel::default()
            .frame(ui_controls::panel_frame(&self.theme))
            .show(ctx, |ui| match self.state.tab {
                Tab::Help => help::show_help(ui),
                Tab::View => {
                    copy_reference = view_panel::show_view_panel(ui, &mut self.state).copy;
                }
                Tab::Edit => {
                    ui.horizontal_top(|ui| {
                        canvas::show_canvas(ui, &mut self.state);
                        ui.add_space(self.theme.layout.space_2);
                        toolbar::show_toolbar(ui, &mut self.state);
                    });
                    ui.add_space(self.theme.layout.space_2);
                    let hints = action_bar::key_hints(&self.state);
                    action_output = Some(action_bar::show_action_bar(ui, hints, copied_feedback));
                }
            });

        if copy_reference {
            self.copy_reference(ctx);
        }
        if let Some(output) = action_output {
            if output.copy {
                self.copy_canvas(ctx);
            }
            if output.save {
                self.save_to_file();
            }
        }

        self.state.controller.forget_missing(&self.state.board);
        if copied_feedback {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    CopyReference,
    CopyCanvas,
    Save,
    Rotate,
    Delete,
}

/// Keyboard commands for `tab` in this frame. While text is being typed only
/// Save stays live.
fn read_shortcuts(input: &InputState, tab: Tab, typing: bool) -> Vec<Shortcut> {
    let cmd = input.modifiers.command || input.modifiers.ctrl;
    // The windowing layer turns Cmd/Ctrl+C into `Event::Copy` and sends no key
    // event for it.
    let copy_requested = input.events.iter().any(|event| matches!(event, Event::Copy))
        || (cmd && input.key_pressed(Key::C));
    let mut shortcuts = Vec::new();

    match tab {
        Tab::Help => {}
        Tab::View => {
            if !typing && (copy_requested || input.key_pressed(Key::C)) {
                shortcuts.push(Shortcut::CopyReference);
            }
        }
        Tab::Edit => {
            if cmd && input.key_pressed(Key::S) {
                shortcuts.push(Shortcut::Save);
            }
            if typing {
                return shortcuts;
            }
            if copy_requested {
                shortcuts.push(Shortcut::CopyCanvas);
            }
            if cmd {
                return shortcuts;
            }
            if input.key_pressed(Key::R) {
                shortcuts.push(Shortcut::Rotate);
            }
            if input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace) {
                shortcuts.push(Shortcut::Delete);
            }
        }
    }

    shortcuts
}

fn with_png_extension(mut path: PathBuf) -> PathBuf {
    let has_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !has_png {
        path.set_extension("png");
    }
    path
}
