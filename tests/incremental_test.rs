//! Incremental updates: model mutations and the watch-mode controller.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{Fixture, names};
use docgen::compiler::{CompileError, CompileInput, ContentCompiler, MarkdownCompiler};
use docgen::watcher::{
    ChangeEvent, Controller, ControllerEvent, ControllerState, ControllerStatus, FileWatcher,
    event_channel,
};
use pretty_assertions::assert_eq;
use tokio::sync::watch;
use tokio::time::timeout;

const SETTLE: Duration = Duration::from_secs(10);

/// Markdown compiler that takes its time, so events can pile up behind a
/// generation.
struct SlowCompiler {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowCompiler {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentCompiler for SlowCompiler {
    fn name(&self) -> &str {
        "slow"
    }

    async fn compile(&self, input: CompileInput) -> Result<String, CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        MarkdownCompiler.compile(input).await
    }
}

async fn settle(
    status: &mut watch::Receiver<ControllerStatus>,
    predicate: impl FnMut(&ControllerStatus) -> bool,
) -> ControllerStatus {
    timeout(SETTLE, status.wait_for(predicate))
        .await
        .expect("controller did not settle")
        .expect("controller dropped its status")
        .clone()
}

#[tokio::test]
async fn test_add_then_remove_restores_output() {
    let fixture = Fixture::with_button();
    fixture.write("utils/sum.ts", "export function sum(a: number, b: number) { return a + b }\n");
    let generator = fixture.generator();
    let mut model = fixture.model();

    generator.run(model.snapshot()).await.unwrap();
    let baseline = fixture.all_modules();

    let hook = fixture.write(
        "hooks/use-clipboard.ts",
        "import { sum } from '../utils/sum'\n/** Copies text. */\nexport function useClipboard() { return sum(1, 2) }\n",
    );
    model.add_file(&hook);
    generator.run(model.snapshot()).await.unwrap();
    assert_eq!(names(&fixture.data("hooks")), vec!["useClipboard"]);
    assert!(fixture.module("types").contains("hooks/use-clipboard.d.ts"));

    fixture.remove("hooks/use-clipboard.ts");
    assert!(model.remove_file(&hook));
    generator.run(model.snapshot()).await.unwrap();
    assert_eq!(fixture.all_modules(), baseline);
}

#[tokio::test]
async fn test_add_and_remove_within_one_generation_leave_no_trace() {
    let fixture = Fixture::with_button();
    let generator = fixture.generator_with(Arc::new(SlowCompiler::new(Duration::from_millis(150))));

    let (events, receiver) = event_channel();
    let mut controller = Controller::new(fixture.model(), generator, receiver);
    controller.generate().await.unwrap();
    let baseline = fixture.all_modules();

    let mut status = controller.subscribe();
    let task = tokio::spawn(controller.run());

    // both mutations land while the forced generation is still running
    events.send(ControllerEvent::Regenerate).await.unwrap();
    let hook = fixture.write(
        "hooks/use-clipboard.ts",
        "/** Copies text. */\nexport function useClipboard() { return null }\n",
    );
    events.send(ChangeEvent::Add(hook.clone()).into()).await.unwrap();
    fixture.remove("hooks/use-clipboard.ts");
    events.send(ChangeEvent::Unlink(hook).into()).await.unwrap();

    let settled = settle(&mut status, |s| {
        s.generations >= 3 && s.state == ControllerState::Idle
    })
    .await;
    assert_eq!(settled.failures, 0);

    events.send(ControllerEvent::Shutdown).await.unwrap();
    task.await.unwrap();

    assert_eq!(status.borrow().generations, 3);
    assert_eq!(fixture.all_modules(), baseline);
}

#[tokio::test]
async fn test_ignored_paths_stay_out_after_add_events() {
    let fixture = Fixture::with_button();
    let (events, receiver) = event_channel();
    let mut controller = Controller::new(fixture.model(), fixture.generator(), receiver);
    controller.generate().await.unwrap();

    let mut status = controller.subscribe();
    let task = tokio::spawn(controller.run());

    let generated = fixture.write(
        "components/Card.generated.tsx",
        "export function Card() { return null }\n",
    );
    events.send(ChangeEvent::Add(generated.clone()).into()).await.unwrap();
    events.send(ChangeEvent::Change(generated).into()).await.unwrap();
    events.send(ControllerEvent::Regenerate).await.unwrap();
    settle(&mut status, |s| s.generations >= 2 && s.state == ControllerState::Idle).await;

    events.send(ControllerEvent::Shutdown).await.unwrap();
    task.await.unwrap();
    assert_eq!(names(&fixture.data("components")), vec!["Button"]);
}

#[tokio::test]
async fn test_refresh_picks_up_edits_and_keeps_last_good_declaration() {
    let fixture = Fixture::with_button();
    let generator = fixture.generator();
    let mut model = fixture.model();
    generator.run(model.snapshot()).await.unwrap();

    let button = fixture.write(
        "components/Button/Button.tsx",
        &common::BUTTON_TSX.replace("A clickable button.", "A pressable button."),
    );
    model.refresh_file(&button);
    generator.run(model.snapshot()).await.unwrap();
    assert_eq!(
        fixture.data("components")[0]["description"],
        "A pressable button."
    );

    // a broken edit drops the record but keeps the declaration
    fixture.write("components/Button/Button.tsx", "export function Button( {\n");
    model.refresh_file(&button);
    generator.run(model.snapshot()).await.unwrap();
    assert_eq!(fixture.data("components"), serde_json::json!([]));
    assert!(fixture.module("types").contains("A pressable button."));
}

#[tokio::test]
async fn test_events_during_generation_coalesce_into_one_follow_up() {
    let fixture = Fixture::with_button();
    let compiler = Arc::new(SlowCompiler::new(Duration::from_millis(150)));
    let generator = fixture.generator_with(compiler.clone());

    let (events, receiver) = event_channel();
    let controller = Controller::new(fixture.model(), generator, receiver);
    let mut status = controller.subscribe();
    let task = tokio::spawn(controller.run());

    events.send(ControllerEvent::Regenerate).await.unwrap();
    for (file, name) in [("use-a", "useA"), ("use-b", "useB"), ("use-c", "useC")] {
        let path = fixture.write(
            &format!("hooks/{file}.ts"),
            &format!("export function {name}() {{ return null }}\n"),
        );
        events.send(ChangeEvent::Add(path).into()).await.unwrap();
    }

    let settled = settle(&mut status, |s| {
        s.generations >= 2 && s.state == ControllerState::Idle
    })
    .await;
    assert_eq!(settled.failures, 0);

    events.send(ControllerEvent::Shutdown).await.unwrap();
    task.await.unwrap();

    assert_eq!(status.borrow().generations, 2);
    assert_eq!(names(&fixture.data("hooks")), vec!["useA", "useB", "useC"]);
    assert!(compiler.calls.load(Ordering::SeqCst) >= 4);
}

#[tokio::test]
async fn test_error_state_recovers_on_next_event() {
    let fixture = Fixture::with_button();
    let duplicate = fixture.write(
        "components/legacy/button.tsx",
        "export function Button() { return null }\n",
    );

    let (events, receiver) = event_channel();
    let mut controller = Controller::new(fixture.model(), fixture.generator(), receiver);
    assert!(controller.generate().await.is_err());
    assert_eq!(controller.state(), ControllerState::Error);
    assert!(!fixture.output_dir().exists());

    let mut status = controller.subscribe();
    let task = tokio::spawn(controller.run());

    fixture.remove("components/legacy/button.tsx");
    events.send(ChangeEvent::Unlink(duplicate).into()).await.unwrap();
    let settled = settle(&mut status, |s| s.generations >= 2 && s.state != ControllerState::Generating).await;
    assert_eq!(settled.state, ControllerState::Idle);
    assert_eq!(settled.failures, 1);
    assert_eq!(settled.last_error, None);
    assert_eq!(names(&fixture.data("components")), vec!["Button"]);

    drop(events);
    task.await.unwrap();
}

#[tokio::test]
async fn test_unlinked_directory_removes_its_records() {
    let fixture = Fixture::with_button();
    fixture.write("components/Card/Card.tsx", "export function Card() { return null }\n");

    let (events, receiver) = event_channel();
    let mut controller = Controller::new(fixture.model(), fixture.generator(), receiver);
    controller.generate().await.unwrap();
    assert_eq!(names(&fixture.data("components")), vec!["Button", "Card"]);

    let mut status = controller.subscribe();
    let task = tokio::spawn(controller.run());

    std::fs::remove_dir_all(fixture.path("components/Card")).unwrap();
    events
        .send(ChangeEvent::Unlink(fixture.path("components/Card")).into())
        .await
        .unwrap();
    settle(&mut status, |s| s.generations >= 2 && s.state == ControllerState::Idle).await;
    assert_eq!(names(&fixture.data("components")), vec!["Button"]);

    events.send(ControllerEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_file_watcher_drives_regeneration() {
    let fixture = Fixture::with_button();
    fixture.write("hooks/.gitkeep", "");
    let settings = fixture.settings();

    let (events, receiver) = event_channel();
    let mut controller = Controller::new(fixture.model(), fixture.generator(), receiver);
    controller.generate().await.unwrap();

    let mut status = controller.subscribe();
    let watcher = FileWatcher::new(&settings.layout(), 20, events.clone()).unwrap();
    let watcher_task = tokio::spawn(watcher.watch());
    let task = tokio::spawn(controller.run());

    // let the watcher settle before touching the tree
    tokio::time::sleep(Duration::from_millis(100)).await;
    fixture.write(
        "hooks/use-media-query.ts",
        "export function useMediaQuery(query: string) { return false }\n",
    );

    settle(&mut status, |s| s.generations >= 2 && s.state == ControllerState::Idle).await;
    assert_eq!(names(&fixture.data("hooks")), vec!["useMediaQuery"]);

    watcher_task.abort();
    events.send(ControllerEvent::Shutdown).await.unwrap();
    task.await.unwrap();
}
