use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use actorgroup::{
    ActorError, ActorFn, ActorRef, Context, ContextError, Event, EventKind, Group, IgnoreRule,
    Subscribe,
};

#[derive(Debug, PartialEq, thiserror::Error)]
enum Sentinel {
    #[error("always")]
    Always,
    #[error("server closed")]
    ServerClosed,
}

/// Callback that returns once its context is done.
async fn until_done(ctx: Context) -> Result<(), ActorError> {
    ctx.done().await;
    Err(ActorError::from(ctx.err().unwrap_or_default()))
}

/// Shutdown that waits for the whole grace window.
async fn wait_grace(ctx: Context) {
    ctx.done().await;
}

#[derive(Default)]
struct Counters {
    runs: AtomicUsize,
    stops: AtomicUsize,
}

fn counted(counters: &Arc<Counters>, fail_after: Option<Duration>) -> ActorRef {
    let runs = Arc::clone(counters);
    let stops = Arc::clone(counters);
    ActorFn::arc(
        "counted",
        move |ctx: Context| {
            let c = Arc::clone(&runs);
            async move {
                c.runs.fetch_add(1, Ordering::SeqCst);
                match fail_after {
                    Some(d) => {
                        tokio::time::sleep(d).await;
                        Err(ActorError::failed(Sentinel::Always))
                    }
                    None => until_done(ctx).await,
                }
            }
        },
        move |_ctx: Context| {
            let c = Arc::clone(&stops);
            async move {
                c.stops.fetch_add(1, Ordering::SeqCst);
            }
        },
    )
}

#[tokio::test(start_paused = true)]
async fn empty_group_returns_immediately() {
    let started = Instant::now();
    let res = Group::builder().build().run(Context::background()).await;

    assert!(res.is_ok());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn empty_group_ignores_cancelled_context() {
    let ctx = Context::background();
    ctx.cancel();
    assert!(Group::builder().build().run(ctx).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn errored_actor_is_returned_with_bounded_shutdown() {
    let started = Instant::now();
    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_nanos(1))
        .build();
    group.add(
        |_ctx: Context| async { Err(ActorError::failed(Sentinel::Always)) },
        wait_grace,
    );

    let err = group
        .run(Context::background())
        .await
        .expect_err("actor error surfaces");

    assert!(IgnoreRule::error(Sentinel::Always).matches(&err));
    assert!(started.elapsed() <= Duration::from_millis(5));
}

#[tokio::test(start_paused = true)]
async fn caller_deadline_stops_group_and_is_ignored() {
    let started = Instant::now();
    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(3))
        .build();
    group.add(until_done, wait_grace).add(until_done, wait_grace);

    let ctx = Context::background().with_timeout(Duration::from_millis(3));
    let res = group.run(ctx).await;

    assert!(res.is_ok());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(6), "elapsed {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(10), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn caller_deadline_surfaces_without_default_ignores() {
    let cfg = actorgroup::GroupConfig {
        ignore: actorgroup::IgnoreSet::empty(),
        shutdown_timeout: Duration::from_millis(1),
        ..Default::default()
    };
    let mut group = Group::new(cfg);
    group.add(until_done, wait_grace);

    let ctx = Context::background().with_timeout(Duration::from_millis(3));
    let err = group.run(ctx).await.expect_err("deadline surfaces");
    assert!(matches!(
        err,
        ActorError::Context(ContextError::DeadlineExceeded)
    ));
}

#[tokio::test(start_paused = true)]
async fn actor_cancelling_caller_context_is_ignored() {
    let ctx = Context::background();
    let external = ctx.clone();

    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_nanos(1))
        .build();
    group
        .add(
            move |ctx: Context| {
                let external = external.clone();
                async move {
                    external.cancel();
                    Err(ActorError::from(ctx.err().unwrap_or_default()))
                }
            },
            wait_grace,
        )
        .add(until_done, wait_grace);

    assert!(group.run(ctx).await.is_ok());
}

#[tokio::test]
async fn shutdown_called_for_actor_that_already_returned() {
    let returned = Arc::new(AtomicBool::new(false));
    let shutdown_saw_returned = Arc::new(AtomicUsize::new(0));

    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(50))
        .build();

    // Registered first: fails first and decides the run.
    group.add(
        |_ctx: Context| async { Err(ActorError::failed(Sentinel::Always)) },
        |_ctx: Context| async {},
    );

    let (r_run, r_stop) = (returned.clone(), returned.clone());
    let s = shutdown_saw_returned.clone();
    group.add(
        move |_ctx: Context| {
            let r = r_run.clone();
            async move {
                r.store(true, Ordering::SeqCst);
                Ok(())
            }
        },
        move |_ctx: Context| {
            let (r, s) = (r_stop.clone(), s.clone());
            async move {
                if r.load(Ordering::SeqCst) {
                    s.fetch_add(1, Ordering::SeqCst);
                }
            }
        },
    );

    let err = group
        .run(Context::background())
        .await
        .expect_err("failure decides");
    assert_eq!(err.to_string(), "always");
    assert_eq!(shutdown_saw_returned.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn every_actor_runs_and_stops_exactly_once() {
    let counters = Arc::new(Counters::default());
    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(10))
        .build();

    group.add_actor(counted(&counters, Some(Duration::from_millis(20))));
    for _ in 0..4 {
        group.add_actor(counted(&counters, None));
    }

    let err = group
        .run(Context::background())
        .await
        .expect_err("first failure");
    assert!(IgnoreRule::error(Sentinel::Always).matches(&err));
    assert_eq!(counters.runs.load(Ordering::SeqCst), 5);
    assert_eq!(counters.stops.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn custom_ignored_error_turns_into_ok() {
    let mut group = Group::builder()
        .with_ignore_errors([IgnoreRule::error(Sentinel::ServerClosed)])
        .build();
    group.add(
        |_ctx: Context| async { Err(ActorError::failed(Sentinel::ServerClosed)) },
        |_ctx: Context| async {},
    );
    assert!(group.run(Context::background()).await.is_ok());

    let mut group = Group::builder()
        .with_ignore_errors([IgnoreRule::error(Sentinel::ServerClosed)])
        .build();
    group.add(
        |_ctx: Context| async { Err(ActorError::failed(Sentinel::Always)) },
        |_ctx: Context| async {},
    );
    let err = group
        .run(Context::background())
        .await
        .expect_err("other errors pass through");
    assert_eq!(err.to_string(), "always");
}

#[tokio::test(start_paused = true)]
async fn clean_exit_of_first_actor_returns_ok_and_stops_others() {
    let counters = Arc::new(Counters::default());
    let mut group = Group::builder().build();
    group
        .add(|_ctx: Context| async { Ok(()) }, |_ctx: Context| async {})
        .add_actor(counted(&counters, None));

    assert!(group.run(Context::background()).await.is_ok());
    assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn grace_window_is_independent_of_expired_caller_context() {
    let window = Arc::new(Mutex::new(None));
    let seen = window.clone();

    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(50))
        .build();
    group.add(until_done, move |ctx: Context| {
        let seen = seen.clone();
        async move {
            let live = ctx.err().is_none();
            let left = ctx
                .deadline()
                .map(|at| at.saturating_duration_since(Instant::now()));
            *seen.lock().expect("lock") = Some((live, left));
            ctx.done().await;
        }
    });

    let ctx = Context::background().with_timeout(Duration::ZERO);
    let started = Instant::now();
    assert!(group.run(ctx).await.is_ok());

    let (live, left) = window.lock().expect("lock").expect("shutdown called");
    assert!(live);
    assert_eq!(left, Some(Duration::from_millis(50)));
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(started.elapsed() <= Duration::from_millis(55));
}

#[tokio::test(start_paused = true)]
async fn callbacks_see_work_context_cancelled() {
    let observed = Arc::new(Mutex::new(None));
    let seen = observed.clone();

    let mut group = Group::builder().build();
    group
        .add(
            |_ctx: Context| async { Err(ActorError::failed("boom")) },
            |_ctx: Context| async {},
        )
        .add(
            move |ctx: Context| {
                let seen = seen.clone();
                async move {
                    ctx.done().await;
                    *seen.lock().expect("lock") = ctx.err();
                    Ok(())
                }
            },
            |_ctx: Context| async {},
        );

    let err = group.run(Context::background()).await.expect_err("boom");
    assert_eq!(err.to_string(), "boom");
    assert_eq!(
        *observed.lock().expect("lock"),
        Some(ContextError::Canceled)
    );
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.events.lock().expect("lock").push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[tokio::test]
async fn subscribers_receive_the_whole_lifecycle_before_run_returns() {
    let rec = Arc::new(Recorder::default());
    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(20))
        .with_subscribers(vec![rec.clone()])
        .build();
    group
        .add_named(
            "failing",
            |_ctx: Context| async { Err(ActorError::failed("boom")) },
            |_ctx: Context| async {},
        )
        .add_named("waiting", until_done, |_ctx: Context| async {});

    let _ = group.run(Context::background()).await;

    let events = rec.events.lock().expect("lock").clone();
    let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

    assert_eq!(count(EventKind::ActorStarting), 2);
    assert_eq!(count(EventKind::ActorFailed), 2);
    assert_eq!(count(EventKind::ShutdownStarting), 2);
    assert_eq!(count(EventKind::ShutdownFinished), 2);

    let stop = events
        .iter()
        .find(|e| e.kind == EventKind::StopRequested)
        .expect("stop requested");
    assert_eq!(stop.actor.as_deref(), Some("failing"));
    assert_eq!(stop.reason.as_deref(), Some("boom"));

    let last = events.last().expect("events");
    assert_eq!(last.kind, EventKind::GroupStopped);
    assert_eq!(last.reason.as_deref(), Some("boom"));
}

#[tokio::test(start_paused = true)]
async fn subscribers_get_every_event_past_bus_capacity() {
    let cfg = actorgroup::GroupConfig {
        bus_capacity: 4,
        shutdown_timeout: Duration::from_millis(10),
        ..Default::default()
    };
    let rec = Arc::new(Recorder::default());
    let mut group = actorgroup::GroupBuilder::new(cfg)
        .with_subscribers(vec![rec.clone()])
        .build();

    let actors = 200;
    group.add(
        |_ctx: Context| async { Err(ActorError::failed("boom")) },
        |_ctx: Context| async {},
    );
    for _ in 1..actors {
        group.add(until_done, |_ctx: Context| async {});
    }

    let _ = group.run(Context::background()).await;

    let events = rec.events.lock().expect("lock").clone();
    let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();
    assert_eq!(count(EventKind::ActorStarting), actors);
    assert_eq!(count(EventKind::ShutdownFinished), actors);
    assert_eq!(count(EventKind::SubscriberOverflow), 0);
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::GroupStopped));
}
