//! SARMS CLI - active-work sessions for workers and supervisors.

mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use sarms_core::{
    seed_sessions, Catalog, Clock, Language, Role, Roster, SessionId, SessionStatus, SystemClock,
};
use sarms_monitor::{filter_sessions, MonitorView, SessionFilter};
use sarms_storage::{FileStore, SessionStore, SessionStoreHandle};
use sarms_work::{FlowContext, WorkerFlow};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "sarms")]
#[command(about = "Active work sessions: start, end and monitor", long_about = None)]
struct Cli {
    /// Data directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display language: en or ar
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show active work with live status
    Monitor {
        /// Only sessions with this status (active, delayed, flagged)
        #[arg(long)]
        status: Option<SessionStatus>,
        /// Department id
        #[arg(long)]
        department: Option<String>,
        /// Task type id
        #[arg(long)]
        task_type: Option<String>,
        /// Zone id
        #[arg(long)]
        zone: Option<String>,
        /// Worker name or id substring
        #[arg(long)]
        worker: Option<String>,
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// Show one session
    Show {
        /// Session ID
        id: String,
    },
    /// Flag or unflag a session
    Flag {
        /// Session ID
        id: String,
    },
    /// Add a note to a session
    Note {
        /// Session ID
        id: String,
        /// Note text
        text: String,
    },
    /// Worker flow for one login
    Worker {
        /// Login or employee id
        login: String,
        #[command(subcommand)]
        action: WorkerAction,
    },
    /// Replace all sessions with the demo set and delete drafts
    Reset,
}

#[derive(Subcommand)]
enum WorkerAction {
    /// Show the worker's current task
    Status,
    /// Select and start a task, then sign out
    Start {
        /// Department id
        #[arg(long)]
        department: String,
        /// Task id
        #[arg(long)]
        task: String,
        /// Zone id
        #[arg(long)]
        zone: String,
        /// First line
        #[arg(long)]
        from: String,
        /// Last line
        #[arg(long)]
        to: String,
    },
    /// End the running task
    End,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    let sessions_path = config.sessions_path();
    let sessions = SessionStoreHandle::new(open_sessions(&sessions_path)?);
    let clock = SystemClock;

    match cli.command {
        Commands::Monitor {
            status,
            department,
            task_type,
            zone,
            worker,
            watch,
        } => {
            let monitor = MonitorView::new(sessions.clone(), clock);
            let filter = SessionFilter {
                status,
                department,
                task_type,
                zone,
                worker_query: worker,
            };
            print_monitor(&monitor, &filter);

            if watch {
                let mut ticker = tokio::time::interval(config.monitor.refresh_interval());
                ticker.tick().await;
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            reload_sessions(&sessions, &sessions_path);
                            print_monitor(&monitor, &filter);
                        }
                        _ = &mut ctrl_c => {
                            debug!("Stopping monitor");
                            break;
                        }
                    }
                }
            }
        }
        Commands::Show { id } => {
            let monitor = MonitorView::new(sessions, clock);
            let Some(view) = monitor.session(&SessionId::new(id.as_str()), clock.now()) else {
                bail!("Session {} not found", id);
            };
            print!("{}", render::session_detail(&view));
        }
        Commands::Flag { id } => {
            let monitor = MonitorView::new(sessions.clone(), clock);
            let Some(flagged) = monitor.toggle_flag(&SessionId::new(id.as_str())) else {
                bail!("Session {} not found", id);
            };
            sessions.save(&sessions_path)?;
            println!("Session {} {}", id, if flagged { "flagged" } else { "unflagged" });
        }
        Commands::Note { id, text } => {
            let session_id = SessionId::new(id.as_str());
            let monitor = MonitorView::new(sessions.clone(), clock);
            if !monitor.add_note(&session_id, &text) {
                if sessions.get(&session_id).is_none() {
                    bail!("Session {} not found", id);
                }
                bail!("Note text is empty");
            }
            sessions.save(&sessions_path)?;
            println!("Note added to {}", id);
        }
        Commands::Worker { login, action } => {
            run_worker(&config, &sessions, &sessions_path, &login, action)?;
        }
        Commands::Reset => {
            sessions.replace(SessionStore::with_sessions(seed_sessions(clock.now())));
            sessions.save(&sessions_path)?;
            FileStore::new(config.drafts_dir())?.clear()?;
            info!("Store reset to demo sessions");
            println!("Reset {} sessions; drafts cleared", sessions.len());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the shared snapshot, seeding it on first use.
fn open_sessions(path: &Path) -> Result<SessionStore> {
    if let Some(store) = SessionStore::load(path)? {
        return Ok(store);
    }
    let store = SessionStore::with_sessions(seed_sessions(SystemClock.now()));
    store.save(path)?;
    info!(path = %path.display(), "Seeded session store");
    Ok(store)
}

/// Pick up changes written by other invocations. A snapshot that cannot be
/// read leaves the current sessions in place.
fn reload_sessions(sessions: &SessionStoreHandle, path: &Path) -> bool {
    match SessionStore::load(path) {
        Ok(Some(store)) => {
            sessions.replace(store);
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to reload sessions, keeping previous");
            false
        }
    }
}

fn print_monitor<C: Clock>(monitor: &MonitorView<C>, filter: &SessionFilter) {
    let snapshot = monitor.snapshot();
    let shown = filter_sessions(&snapshot.sessions, filter);
    print!(
        "{}",
        render::monitor_table(snapshot.timestamp, &shown, &snapshot.summary)
    );
}

fn run_worker(
    config: &AppConfig,
    sessions: &SessionStoreHandle,
    sessions_path: &Path,
    login: &str,
    action: WorkerAction,
) -> Result<()> {
    let roster = Roster::default();
    if let Some(role) = roster.role_of(login) {
        if role != Role::Worker {
            bail!("{} is registered as {}; the worker flow is for workers only", login, role);
        }
    }

    let catalog = Catalog::default();
    let mut drafts = FileStore::new(config.drafts_dir())?;
    let clock = SystemClock;
    let mut flow = WorkerFlow::restore_on_load(
        roster.resolve(login),
        FlowContext {
            catalog: &catalog,
            sessions: sessions.clone(),
            drafts: &mut drafts,
            clock: &clock,
            language: config.language,
            config: config.flow.clone(),
        },
    );
    let lang = flow.language();
    let blocked = move |e: sarms_work::FlowError| anyhow!(e.message(lang));

    match action {
        WorkerAction::Status => {
            print!("{}", render::flow_status(&flow, clock.now()));
        }
        WorkerAction::Start {
            department,
            task,
            zone,
            from,
            to,
        } => {
            flow.select_department(&department).map_err(blocked)?;
            flow.select_task(&task).map_err(blocked)?;
            flow.select_zone(&zone).map_err(blocked)?;
            flow.submit_lines(&from, &to).map_err(blocked)?;
            let session = flow.start_task().map_err(blocked)?;
            sessions.save(sessions_path)?;
            println!(
                "Started {}: {} / {} in zone {}, lines {}",
                session.id, session.department, session.task, session.zone, session.lines_area
            );
            println!("Signed out.");
        }
        WorkerAction::End => {
            let snapshot = flow.end_task().map_err(blocked)?;
            sessions.save(sessions_path)?;
            print!("{}", render::completion(&snapshot));
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_picks_up_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        SessionStore::with_sessions(seed_sessions(SystemClock.now()))
            .save(&path)
            .unwrap();

        let sessions = SessionStoreHandle::default();
        assert!(reload_sessions(&sessions, &path));
        assert_eq!(sessions.len(), 6);
    }

    #[test]
    fn test_reload_failure_keeps_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let sessions =
            SessionStoreHandle::new(SessionStore::with_sessions(seed_sessions(SystemClock.now())));

        // a directory cannot be read as a snapshot
        assert!(!reload_sessions(&sessions, dir.path()));
        assert_eq!(sessions.len(), 6);

        assert!(!reload_sessions(&sessions, &dir.path().join("missing.json")));
        assert_eq!(sessions.len(), 6);
    }
}
