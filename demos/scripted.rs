//! # Example: scripted
//!
//! Drives a full run against [`MemoryHost`] with a scripted "user".
//!
//! Shows how to:
//! - Load a [`Config`] from TOML and put it in a [`ConfigStore`].
//! - Attach the built-in [`LogWriter`] and a custom [`Subscribe`]r.
//! - Start a run through a host command id and react to step events.
//!
//! ## Flow
//! ```text
//! dispatch("fixRunner.run") ──► run task
//!     ├─► StepAwaiting(0) ──► user edits the document ──► DocumentChanged
//!     ├─► StepAwaiting(1) ──► user asks for next      ──► Advance
//!     └─► StepAwaiting(2) ──► user does nothing       ──► Timeout ──► stop
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example scripted
//! ```

use std::sync::Arc;

use fixrunner::{
    Command, Config, ConfigStore, Diagnostic, DocumentRef, Event, EventKind, LogWriter,
    MemoryHost, Range, RunController, Severity, Subscribe,
};
use tracing_subscriber::{EnvFilter, fmt};

const CONFIG: &str = r#"
enabled_ids = ["eslint", "ts2304"]
wait_for_secs = 1.5
menu_list_mode = "default"
debug = true
"#;

/// Prints a one-line summary per resolved step.
struct StepPrinter;

#[async_trait::async_trait]
impl Subscribe for StepPrinter {
    async fn on_event(&self, ev: &Event) {
        if ev.kind == EventKind::StepResolved {
            println!(
                "[demo] step {} resolved by {}",
                ev.index.unwrap_or_default(),
                ev.signal.map(|s| s.as_str()).unwrap_or("<none>")
            );
        }
    }

    fn name(&self) -> &'static str {
        "step-printer"
    }
}

fn diagnostics() -> Vec<Diagnostic> {
    vec![
        Diagnostic::new(Range::from_coords(2, 14, 2, 15))
            .with_source("eslint")
            .with_code("semi")
            .with_severity(Severity::Warning)
            .with_message("Missing semicolon."),
        Diagnostic::new(Range::from_coords(7, 4, 7, 10))
            .with_source("ts")
            .with_code("ts2304")
            .with_message("Cannot find name 'render'."),
        Diagnostic::new(Range::from_coords(12, 0, 12, 8))
            .with_source("eslint")
            .with_code("no-unused-vars")
            .with_message("'helpers' is defined but never used."),
        Diagnostic::new(Range::from_coords(15, 0, 15, 3))
            .with_source("stylelint")
            .with_message("Not enabled, never visited."),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let host = Arc::new(MemoryHost::new());
    let doc = DocumentRef::new("file:///src/view.ts", "typescript");
    host.open(doc.clone(), Range::default());
    host.set_diagnostics(&doc, diagnostics());

    let config = ConfigStore::new(Config::from_toml_str(CONFIG)?)?;
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), Arc::new(StepPrinter)];
    let ctrl = RunController::builder(host.clone(), config)
        .with_subscribers(subs)
        .build();

    let mut events = ctrl.events();
    let command = Command::from_id("fixRunner.run").ok_or_else(|| anyhow::anyhow!("unknown command"))?;
    let run = ctrl
        .dispatch(command)?
        .and_then(|admission| admission.into_handle())
        .ok_or_else(|| anyhow::anyhow!("run was not started"))?;

    // The scripted user: fix, skip, then walk away.
    let user = {
        let host = host.clone();
        let ctrl = ctrl.clone();
        let id = doc.id.clone();
        tokio::spawn(async move {
            while let Ok(ev) = events.recv().await {
                match (ev.kind, ev.index) {
                    (EventKind::StepAwaiting, Some(0)) => {
                        host.edit(&id, vec![Range::from_coords(12, 0, 13, 0)]);
                    }
                    (EventKind::StepAwaiting, Some(1)) => ctrl.request_next(),
                    (EventKind::RunFinished, _) => break,
                    _ => {}
                }
            }
        })
    };

    let report = run
        .wait()
        .await
        .ok_or_else(|| anyhow::anyhow!("run task ended without a report"))?;
    user.await?;

    println!(
        "[demo] outcome={} visited={}/{}",
        report.outcome.as_str(),
        report.visited,
        report.total
    );
    println!("[demo] invocations: {:?}", host.invocations());
    println!("[demo] notifications: {:?}", host.notifications());
    println!("[demo] debug output:");
    for line in host.output_lines() {
        println!("    {line}");
    }

    ctrl.shutdown().await;
    Ok(())
}
