//! The egui application shell: team table, quick filter, member modal,
//! and the error banner. All roster data flows in through the event
//! queue; nothing here talks to the network directly.

use std::time::Duration;

use chrono::{DateTime, Local};
use client_core::{
    members_of, project_rows, row_matches_filter, selection_of, sort_rows,
    teams::selected_label, Column, DashboardState, Phase, SortDirection, StateEvent, ViewRow,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Team, TeamId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{reduce, FollowUp};

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    state: DashboardState,
    filter: String,
    sort: Option<(Column, SortDirection)>,
    status: String,
    last_updated: Option<DateTime<Local>>,
}

impl DashboardApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: DashboardState::new(),
            filter: String::new(),
            sort: None,
            status: "Loading teams...".to_string(),
            last_updated: None,
        };
        app.request_fetch();
        app
    }

    fn request_fetch(&mut self) {
        let token = self.state.next_token();
        self.state.apply(StateEvent::FetchStarted { token });
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchRoster { token },
            &mut self.status,
        );
        // A command that never reached the worker will never complete;
        // fail the cycle now so the spinner resolves and a banner shows.
        if !queued {
            self.state.apply(StateEvent::FetchFailed {
                token,
                message: self.status.clone(),
            });
        }
    }

    fn request_selection_toggle(&mut self, team_id: TeamId, is_selected: bool) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SetSelection {
                team_id,
                is_selected,
            },
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if matches!(event, UiEvent::RosterLoaded { .. }) {
                self.last_updated = Some(Local::now());
            }
            if let Some(FollowUp::Refetch) = reduce(&mut self.state, &mut self.status, event) {
                self.request_fetch();
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Team Dashboard");
            ui.separator();
            if ui.button("Refresh").clicked() {
                self.request_fetch();
            }
            ui.label("Filter:");
            ui.add(
                egui::TextEdit::singleline(&mut self.filter)
                    .hint_text("search teams")
                    .desired_width(220.0),
            );
            if !self.filter.is_empty() && ui.button("Clear").clicked() {
                self.filter.clear();
            }
            if self.state.refetching {
                ui.spinner();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(updated) = self.last_updated {
                    ui.label(format!("Updated {}", updated.format("%H:%M:%S")));
                }
                ui.label(&self.status);
            });
        });
    }

    fn error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.state.banner.clone() else {
            return;
        };
        ui.horizontal(|ui| {
            ui.colored_label(egui::Color32::LIGHT_RED, message);
            if ui.button("Dismiss").clicked() {
                self.state.apply(StateEvent::BannerDismissed);
            }
        });
    }

    fn team_table(&mut self, ui: &mut egui::Ui) {
        let rows = visible_rows(&self.state.teams, &self.filter, self.sort);

        egui::ScrollArea::both().auto_shrink(false).show(ui, |ui| {
            egui::Grid::new("team_table")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for column in Column::ALL {
                        if column.sortable() {
                            if ui.button(header_label(column, self.sort)).clicked() {
                                self.sort = toggle_sort(self.sort, column);
                            }
                        } else {
                            ui.label(column.header());
                        }
                    }
                    ui.end_row();

                    for row in &rows {
                        ui.label(row.team_id.0.to_string());
                        ui.label(&row.team_name);
                        ui.label(&row.tracks);
                        ui.label(&row.idea);
                        ui.label(&row.suggestions);
                        if ui.button("View").clicked() {
                            self.state.apply(StateEvent::ModalOpened {
                                team_id: row.team_id,
                            });
                        }
                        // Selection is looked up live so a refetch landing
                        // mid-frame cannot render a stale flag.
                        match selection_of(&self.state.teams, row.team_id) {
                            Ok(is_selected) => {
                                let label = if is_selected {
                                    egui::RichText::new(selected_label(true))
                                        .color(egui::Color32::LIGHT_GREEN)
                                } else {
                                    egui::RichText::new(selected_label(false))
                                        .color(egui::Color32::YELLOW)
                                };
                                if ui.button(label).clicked() {
                                    self.request_selection_toggle(row.team_id, !is_selected);
                                }
                            }
                            Err(err) => {
                                tracing::warn!(
                                    team_id = row.team_id.0,
                                    %err,
                                    "rendered row no longer resolves in the derived team set"
                                );
                                ui.label("-");
                            }
                        }
                        ui.end_row();
                    }
                });

            if rows.is_empty() && self.state.phase == Phase::Ready {
                ui.label(if self.filter.is_empty() {
                    "No teams yet."
                } else {
                    "No teams match the filter."
                });
            }
        });
    }

    fn member_modal(&mut self, ctx: &egui::Context) {
        let Some(team_id) = self.state.active_team else {
            return;
        };
        let Ok(members) = members_of(&self.state.roster, &self.state.teams, team_id) else {
            // The team vanished between opening the modal and rendering it.
            self.state.apply(StateEvent::ModalClosed);
            return;
        };

        let mut open = true;
        egui::Window::new(format!("Members of {}", members.team_name))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                if members.members.is_empty() {
                    ui.label("No members on this team.");
                } else {
                    for user in &members.members {
                        ui.label(&user.name);
                    }
                }
                ui.separator();
                if ui.button("Close").clicked() {
                    self.state.apply(StateEvent::ModalClosed);
                }
            });
        if !open {
            self.state.apply(StateEvent::ModalClosed);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        // Poll the event queue even while the pointer is idle.
        ctx.request_repaint_after(Duration::from_millis(250));

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
            self.error_banner(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.phase == Phase::Loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.spinner();
                    ui.label("Loading teams...");
                });
            } else {
                self.team_table(ui);
            }
        });

        self.member_modal(ctx);
    }
}

fn header_label(column: Column, sort: Option<(Column, SortDirection)>) -> String {
    match sort {
        Some((sorted, SortDirection::Ascending)) if sorted == column => {
            format!("{} ^", column.header())
        }
        Some((sorted, SortDirection::Descending)) if sorted == column => {
            format!("{} v", column.header())
        }
        _ => column.header().to_string(),
    }
}

/// Clicking an unsorted column sorts it ascending; clicking the sorted
/// column flips the direction.
fn toggle_sort(
    sort: Option<(Column, SortDirection)>,
    column: Column,
) -> Option<(Column, SortDirection)> {
    match sort {
        Some((sorted, direction)) if sorted == column => Some((column, direction.toggled())),
        _ => Some((column, SortDirection::Ascending)),
    }
}

/// Rows actually rendered this frame: filtered by the quick filter, then
/// sorted by the active sort column.
fn visible_rows(
    teams: &[Team],
    filter: &str,
    sort: Option<(Column, SortDirection)>,
) -> Vec<ViewRow> {
    let mut rows: Vec<ViewRow> = project_rows(teams)
        .into_iter()
        .filter(|row| row_matches_filter(row, filter))
        .collect();
    if let Some((column, direction)) = sort {
        sort_rows(&mut rows, column, direction);
    }
    rows
}
