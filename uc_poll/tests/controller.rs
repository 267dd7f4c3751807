use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::time::{Instant, sleep};
use types::{Collection, NotificationFeed};
use uc_poll::{Fetch, PollController, PollError, RenderError};

/// Fetcher that records when each call starts and replays a script of
/// results (the last entry repeats once the script runs out).
struct ScriptedFetch<T> {
    delay: Duration,
    script: Vec<Result<T, String>>,
    calls: Arc<Mutex<Vec<Instant>>>,
}

impl<T: Clone + Send + Sync + 'static> ScriptedFetch<T> {
    fn new(script: Vec<Result<T, String>>) -> (Self, Arc<Mutex<Vec<Instant>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let fetcher = Self {
            delay: Duration::ZERO,
            script,
            calls: Arc::clone(&calls),
        };
        (fetcher, calls)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Fetch for ScriptedFetch<T> {
    type Output = T;
    type Error = String;

    async fn fetch(&self) -> Result<T, String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            calls.len() - 1
        };

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let step = index.min(self.script.len() - 1);
        self.script[step].clone()
    }
}

/// Renderer that keeps every payload it was given.
fn recording<T: Clone + Send + Sync + 'static>() -> (
    impl Fn(&T) -> Result<(), RenderError> + Send + Sync + 'static,
    Arc<Mutex<Vec<T>>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let render = move |data: &T| -> Result<(), RenderError> {
        sink.lock().unwrap().push(data.clone());
        Ok(())
    };
    (render, seen)
}

fn offsets(calls: &Arc<Mutex<Vec<Instant>>>, origin: Instant) -> Vec<u128> {
    calls
        .lock()
        .unwrap()
        .iter()
        .map(|at| at.duration_since(origin).as_millis())
        .collect()
}

#[test]
fn test_zero_interval_is_rejected() {
    let (fetcher, _) = ScriptedFetch::new(vec![Ok(1_u32)]);
    let (render, _) = recording::<u32>();

    let result = PollController::new("zero", Duration::ZERO, fetcher, render);

    assert_eq!(result.err(), Some(PollError::ZeroInterval));
}

#[tokio::test(start_paused = true)]
async fn test_start_runs_first_cycle_immediately() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(1_u32)]);
    let (render, seen) = recording::<u32>();
    let mut poller =
        PollController::new("notes", Duration::from_secs(5), fetcher, render)
            .unwrap();

    assert!(!poller.is_running());
    poller.start();
    assert!(poller.is_running());

    sleep(Duration::from_millis(1)).await;

    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_keeps_a_single_timer() {
    let origin = Instant::now();
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let (render, _) = recording::<()>();
    let mut poller =
        PollController::new("notes", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    poller.start();

    sleep(Duration::from_millis(2500)).await;

    assert_eq!(offsets(&calls, origin), vec![0, 1000, 2000]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_start_runs_fresh_cycle_without_double_fire() {
    let origin = Instant::now();
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let (render, _) = recording::<()>();
    let mut poller =
        PollController::new("messages", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(500)).await;

    poller.stop();
    assert!(!poller.is_running());
    poller.start();

    sleep(Duration::from_millis(1200)).await;

    // the timer armed at t=0 would have fired at t=1000
    assert_eq!(offsets(&calls, origin), vec![0, 500, 1500]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_still_schedules_next_cycle() {
    let origin = Instant::now();
    let (fetcher, calls) = ScriptedFetch::new(vec![
        Err("connection refused".to_string()),
        Ok(7_u32),
    ]);
    let (render, seen) = recording::<u32>();
    let mut poller = PollController::new(
        "notifications",
        Duration::from_secs(15),
        fetcher,
        render,
    )
    .unwrap();

    poller.start();
    sleep(Duration::from_millis(15_100)).await;

    assert_eq!(offsets(&calls, origin), vec![0, 15_000]);
    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert!(poller.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_fetch_prevents_further_cycles() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(1_u32)]);
    let fetcher = fetcher.with_delay(Duration::from_millis(300));
    let (render, seen) = recording::<u32>();
    let mut poller =
        PollController::new("users", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(100)).await;
    poller.stop();

    sleep(Duration::from_secs(10)).await;

    assert_eq!(calls.lock().unwrap().len(), 1);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_failing_fetch_prevents_further_cycles() {
    let (fetcher, calls) =
        ScriptedFetch::<u32>::new(vec![Err("timeout".to_string())]);
    let fetcher = fetcher.with_delay(Duration::from_millis(300));
    let (render, _) = recording::<u32>();
    let mut poller =
        PollController::new("stats", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(100)).await;
    poller.stop();

    sleep(Duration::from_secs(10)).await;

    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_payload_reaches_renderer_unmodified() {
    let json = r#"{"success":true,"count":2,"items":[{"id":1},{"id":2}]}"#;
    let payload: Collection<serde_json::Value> =
        serde_json::from_str(json).unwrap();
    let (fetcher, _) = ScriptedFetch::new(vec![Ok(payload.clone())]);
    let (render, seen) = recording::<Collection<serde_json::Value>>();
    let mut poller =
        PollController::new("notes", Duration::from_secs(5), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(1)).await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], payload);
    assert_eq!(seen[0].items[0]["id"], 1);
    assert_eq!(seen[0].items[1]["id"], 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_collection_is_still_rendered() {
    let feed: NotificationFeed =
        serde_json::from_str(r#"{"count":0,"notifications":[]}"#).unwrap();
    let (fetcher, _) = ScriptedFetch::new(vec![Ok(feed)]);
    let (render, seen) = recording::<NotificationFeed>();
    let mut poller = PollController::new(
        "notifications",
        Duration::from_secs(15),
        fetcher,
        render,
    )
    .unwrap();

    poller.start();
    sleep(Duration::from_millis(1)).await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].notifications.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interval_is_measured_from_cycle_completion() {
    let origin = Instant::now();
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let fetcher = fetcher.with_delay(Duration::from_millis(200));
    let (render, _) = recording::<()>();
    let mut poller =
        PollController::new("notes", Duration::from_secs(5), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(5300)).await;

    assert_eq!(offsets(&calls, origin), vec![0, 5200]);
}

#[tokio::test(start_paused = true)]
async fn test_render_error_does_not_stop_polling() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let render = |_: &()| -> Result<(), RenderError> {
        Err(RenderError::Payload("missing field".to_string()))
    };
    let mut poller =
        PollController::new("notes", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(2500)).await;

    assert_eq!(calls.lock().unwrap().len(), 3);
    assert!(poller.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_render_panic_does_not_stop_polling() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let render = |_: &()| -> Result<(), RenderError> {
        panic!("template exploded");
    };
    let mut poller =
        PollController::new("users", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(1500)).await;

    assert_eq!(calls.lock().unwrap().len(), 2);
    assert!(poller.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_now_cuts_the_wait_short() {
    let origin = Instant::now();
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let (render, _) = recording::<()>();
    let mut poller =
        PollController::new("notifications", Duration::from_secs(15), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(100)).await;
    poller.refresh_now();
    sleep(Duration::from_millis(100)).await;

    // the timer restarts from the refreshed cycle
    sleep(Duration::from_millis(15_000)).await;

    assert_eq!(offsets(&calls, origin), vec![0, 100, 15_100]);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_now_is_ignored_when_stopped() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let (render, _) = recording::<()>();
    let poller =
        PollController::new("notes", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.refresh_now();
    sleep(Duration::from_secs(3)).await;

    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_controller_stops_polling() {
    let (fetcher, calls) = ScriptedFetch::new(vec![Ok(())]);
    let (render, _) = recording::<()>();
    let mut poller =
        PollController::new("messages", Duration::from_secs(1), fetcher, render)
            .unwrap();

    poller.start();
    sleep(Duration::from_millis(10)).await;
    drop(poller);

    sleep(Duration::from_secs(5)).await;

    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_controllers_run_independently() {
    let origin = Instant::now();
    let (fast_fetch, fast_calls) = ScriptedFetch::new(vec![Ok(())]);
    let (slow_fetch, slow_calls) =
        ScriptedFetch::<()>::new(vec![Err("down".to_string())]);
    let (fast_render, _) = recording::<()>();
    let (slow_render, _) = recording::<()>();

    let mut fast = PollController::new(
        "notes",
        Duration::from_secs(5),
        fast_fetch,
        fast_render,
    )
    .unwrap();
    let mut slow = PollController::new(
        "notifications",
        Duration::from_secs(15),
        slow_fetch.with_delay(Duration::from_secs(1)),
        slow_render,
    )
    .unwrap();

    fast.start();
    slow.start();
    sleep(Duration::from_millis(16_500)).await;

    assert_eq!(offsets(&fast_calls, origin), vec![0, 5000, 10_000, 15_000]);
    assert_eq!(offsets(&slow_calls, origin), vec![0, 16_000]);
}
