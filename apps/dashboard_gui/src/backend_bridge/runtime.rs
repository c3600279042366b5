//! Backend worker thread: owns the tokio runtime and the HTTP client,
//! drains the UI command queue, and reports completions as UI events.

use std::thread;

use client_core::{DashboardClient, RosterApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match DashboardClient::new(&server_url) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build dashboard client: {err}");
                    return;
                }
            };

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchRoster { token } => {
                        match client.fetch_roster().await {
                            Ok(roster) => {
                                let _ = ui_tx.try_send(UiEvent::RosterLoaded { token, roster });
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::RosterFetchFailed {
                                    token,
                                    message: err.to_string(),
                                });
                            }
                        }
                    }
                    BackendCommand::SetSelection {
                        team_id,
                        is_selected,
                    } => {
                        // The roster is never flipped locally; a successful
                        // write is confirmed by a follow-up fetch that the
                        // UI issues on MutationSucceeded.
                        match client.set_selection(team_id, is_selected).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::MutationSucceeded);
                            }
                            Err(err) => {
                                let _ =
                                    ui_tx.try_send(UiEvent::MutationFailed(UiError::from_message(
                                        UiErrorContext::UpdateSelection,
                                        err.to_string(),
                                    )));
                            }
                        }
                    }
                }
            }
        });
    });
}
