//! One invocation: load settings, generate once, optionally keep watching.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::compiler::{CommandCompiler, ContentCompiler, MarkdownCompiler};
use crate::config::Settings;
use crate::generation::Generator;
use crate::logging;
use crate::project::ProjectModel;
use crate::watcher::{Controller, ControllerEvent, FileWatcher, event_channel};
use crate::{debug_event, log_event};

use super::args::Cli;

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(&cli.root, cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(output) = cli.output {
        settings.output_dir = output;
    }
    settings.debug |= cli.debug;
    logging::init_with_config(&settings.logging, settings.debug);

    let layout = settings.layout();
    debug_event!("config", "root", "{}", layout.root.display());

    let mut model = ProjectModel::new(layout.clone())
        .context("failed to load project configuration")?;
    let summary = model.scan();
    if summary.unresolved > 0 {
        log_event!(
            "project",
            "unresolved",
            "{} of {} files could not be resolved",
            summary.unresolved,
            summary.discovered
        );
    }

    let generator = Generator::new(select_compiler(&settings), layout.output.clone());
    let (events, receiver) = event_channel();
    let mut controller = Controller::new(model, generator, receiver);

    let report = controller
        .generate()
        .await
        .context("initial generation failed")?;
    debug_event!(
        "generation",
        "summary",
        "{}",
        report
            .counts
            .iter()
            .map(|(category, count)| format!("{count} {category}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if !cli.watch {
        return Ok(());
    }

    let watcher = FileWatcher::new(&layout, settings.watch.debounce_ms, events.clone())
        .context("failed to start file watcher")?;
    let mut watcher_task = tokio::spawn(watcher.watch());
    let controller_task = tokio::spawn(controller.run());

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            log_event!("watcher", "interrupted");
        }
        result = &mut watcher_task => match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("[watcher] stopped: {e}"),
            Err(e) => tracing::error!("[watcher] task failed: {e}"),
        },
    }

    watcher_task.abort();
    // the controller may already be gone if the watcher failed
    let _ = events.send(ControllerEvent::Shutdown).await;
    controller_task.await.context("controller task failed")?;
    Ok(())
}

fn select_compiler(settings: &Settings) -> Arc<dyn ContentCompiler> {
    match CommandCompiler::new(&settings.compiler.command) {
        Some(command) => {
            debug_event!("compiler", "external", "{}", command.name());
            Arc::new(command)
        }
        None => Arc::new(MarkdownCompiler),
    }
}
