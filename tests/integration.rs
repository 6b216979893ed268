// End-to-end behaviour of the runtime around the mood core: conversation
// turns, scheduled greetings, the console loop, config loading and the
// scheduler lifecycle. Model and channel are scripted in-process.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use kaori::atoms::error::{EngineError, EngineResult};
use kaori::config::{AppConfig, Settings};
use kaori::engine::channels::{Channel, Presence};
use kaori::engine::chat::{handle_message, run_console};
use kaori::engine::providers::{ReplyGenerator, ReplyRequest};
use kaori::engine::scheduler::{self, send_greeting, Greeting};
use kaori::engine::state::{KaoriState, SharedSource};
use kaori_core::mood::{DominanceRule, ReactionRng};
use kaori_core::{
    ConversationContext, Dimension, MoodEngine, MoodError, MoodResult, MoodStore, MoodVector,
    SentimentSource,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// ── Fixtures ───────────────────────────────────────────────────────────────

const CONFIG: &str = r#"
[nature]
Affection = 10
Amused = 10
Inspired = 10
Frustrated = 10
Anxious = 10
Curious = 10

[decay]
idle_after_secs = 1800
step = 0.1
interval_secs = 600

[analysis]
timeout_secs = 2

[schedule]
enabled = false
"#;

const FLAT: &str = "Affection:0, Amused:0, Inspired:0, Frustrated:0, Anxious:0, Curious:0";
const LOVING: &str = "Affection:1.0, Amused:0, Inspired:0, Frustrated:0, Anxious:0, Curious:0";

/// Hands out scripted sentiment responses in order, then `FLAT`.
struct ScriptedSource {
    replies: Mutex<VecDeque<MoodResult<String>>>,
}

impl ScriptedSource {
    fn new(replies: Vec<MoodResult<String>>) -> Arc<Self> {
        Arc::new(ScriptedSource { replies: Mutex::new(replies.into()) })
    }

    fn ok(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }
}

#[async_trait]
impl SentimentSource for ScriptedSource {
    async fn sentiment(&self, _previous: &str, _user: &str) -> MoodResult<String> {
        self.replies.lock().pop_front().unwrap_or_else(|| Ok(FLAT.to_string()))
    }
}

/// Echoes the user text back, or fails when told to.
struct EchoReplier {
    fail: bool,
    seen: Mutex<Vec<ReplyRequest>>,
}

impl EchoReplier {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(EchoReplier { fail, seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl ReplyGenerator for EchoReplier {
    fn name(&self) -> &str {
        "echo"
    }

    async fn reply(&self, request: &ReplyRequest) -> EngineResult<String> {
        self.seen.lock().push(request.clone());
        if self.fail {
            return Err(EngineError::provider("echo", "scripted failure"));
        }
        Ok(format!("re: {}", request.user_text))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Sent(String),
    Reacted(String),
    Presence(Presence),
}

#[derive(Default)]
struct RecordingChannel {
    events: Mutex<Vec<Event>>,
}

impl RecordingChannel {
    fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, text: &str) -> EngineResult<()> {
        self.events.lock().push(Event::Sent(text.to_string()));
        Ok(())
    }

    async fn react(&self, symbol: &str) -> EngineResult<()> {
        self.events.lock().push(Event::Reacted(symbol.to_string()));
        Ok(())
    }

    async fn set_presence(&self, presence: Presence) -> EngineResult<()> {
        self.events.lock().push(Event::Presence(presence));
        Ok(())
    }
}

struct First;

impl ReactionRng for First {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

struct Harness {
    state: Arc<KaoriState>,
    channel: Arc<RecordingChannel>,
    replier: Arc<EchoReplier>,
}

fn harness(
    source: SharedSource,
    replier: Arc<EchoReplier>,
    vector: MoodVector,
    context: ConversationContext,
) -> Harness {
    let settings = Settings::from_config(&AppConfig::from_toml(CONFIG).unwrap()).unwrap();
    let channel = Arc::new(RecordingChannel::default());
    let engine = MoodEngine::new(
        Arc::new(MoodStore::with_state(vector, context)),
        Arc::new(settings.mood.clone()),
        source.clone(),
    )
    .with_rng(First);
    let state = KaoriState::new(settings, source, replier.clone(), channel.clone()).with_engine(engine);
    Harness { state: Arc::new(state), channel, replier }
}

fn fresh() -> ConversationContext {
    ConversationContext::fresh(Utc::now())
}

fn assert_2dp(v: &MoodVector) {
    for (dim, value) in v.iter() {
        assert!((0.0..=1.0).contains(&value), "{dim} = {value}");
        assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6, "{dim} = {value}");
    }
}

// ── Conversation turns ─────────────────────────────────────────────────────

#[tokio::test]
async fn strong_turn_reacts_before_replying() {
    let h = harness(
        ScriptedSource::ok(&[LOVING]),
        EchoReplier::new(false),
        MoodVector::neutral().with(Dimension::Affection, 0.65),
        fresh(),
    );

    let outcome = handle_message(&h.state, "I missed you").await.unwrap();

    assert_eq!(outcome.reaction.as_ref().map(|r| r.symbol.as_str()), Some("💖"));
    assert_eq!(
        h.channel.events(),
        vec![Event::Reacted("💖".into()), Event::Sent("re: I missed you".into())]
    );
    assert_eq!(h.state.store().context().last_text, "re: I missed you");

    // The reply sees the mood after the update.
    let seen = h.replier.seen.lock().clone();
    assert!((seen[0].mood.get(Dimension::Affection) - 0.85).abs() < 1e-9);
}

#[tokio::test]
async fn malformed_sentiment_still_gets_a_reply() {
    let start = MoodVector::neutral().with(Dimension::Curious, 0.7);
    let h = harness(
        ScriptedSource::ok(&["I think they are happy"]),
        EchoReplier::new(false),
        start,
        fresh(),
    );

    let outcome = handle_message(&h.state, "guess what").await.unwrap();

    assert_eq!(outcome.reaction, None);
    assert_eq!(h.state.store().read(), start);
    assert_eq!(h.channel.events(), vec![Event::Sent("re: guess what".into())]);
}

#[tokio::test]
async fn source_error_is_absorbed() {
    let h = harness(
        ScriptedSource::new(vec![Err(MoodError::source("quota exhausted"))]),
        EchoReplier::new(false),
        MoodVector::neutral(),
        fresh(),
    );

    let outcome = handle_message(&h.state, "hello").await.unwrap();
    assert_eq!(outcome.reaction, None);
    assert!(h.state.store().read().is_neutral());
}

#[tokio::test]
async fn failed_reply_keeps_old_context() {
    let h = harness(
        ScriptedSource::ok(&[LOVING]),
        EchoReplier::new(true),
        MoodVector::neutral(),
        ConversationContext::new("earlier words", Utc::now()),
    );

    let err = handle_message(&h.state, "hey").await.unwrap_err();

    assert!(matches!(err, EngineError::Provider { .. }));
    assert_eq!(h.state.store().context().last_text, "earlier words");
    assert!(h.channel.events().is_empty());
    // The mood update happened before the reply was attempted.
    assert!((h.state.store().read().get(Dimension::Affection) - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn console_skips_blank_lines_and_survives_failures() {
    let h = harness(
        ScriptedSource::ok(&[FLAT, FLAT]),
        EchoReplier::new(false),
        MoodVector::neutral(),
        fresh(),
    );

    let input: &[u8] = b"first\n\n   \nsecond\n";
    let turns = run_console(&h.state, input).await.unwrap();

    assert_eq!(turns, 2);
    assert_eq!(
        h.channel.events(),
        vec![Event::Sent("re: first".into()), Event::Sent("re: second".into())]
    );

    let failing = harness(ScriptedSource::ok(&[]), EchoReplier::new(true), MoodVector::neutral(), fresh());
    assert_eq!(run_console(&failing.state, &b"one\ntwo\n"[..]).await.unwrap(), 0);
}

#[tokio::test]
async fn concurrent_turns_keep_the_mood_well_formed() {
    let replies: Vec<&str> = (0..24)
        .map(|i| match i % 3 {
            0 => LOVING,
            1 => "Affection:-1, Amused:-0.7, Inspired:0.33, Frustrated:1, Anxious:-0.2, Curious:0.9",
            _ => FLAT,
        })
        .collect();
    let h = harness(ScriptedSource::ok(&replies), EchoReplier::new(false), MoodVector::neutral(), fresh());

    let mut tasks = Vec::new();
    for i in 0..24 {
        let state = h.state.clone();
        tasks.push(tokio::spawn(async move {
            state.engine.analyze(&format!("message {i}")).await;
            assert_2dp(&state.store().read());
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }
    assert_2dp(&h.state.store().read());
}

// ── Greetings ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn morning_greeting_relaxes_then_goes_online() {
    let now = Utc::now();
    let h = harness(
        ScriptedSource::ok(&[]),
        EchoReplier::new(false),
        MoodVector::neutral().with(Dimension::Frustrated, 0.9),
        ConversationContext::new("good night", now - TimeDelta::hours(9)),
    );

    let text = send_greeting(&h.state, Greeting::Morning, now).await.unwrap();

    assert_eq!(text, "re: good morning!");
    assert_eq!(
        h.channel.events(),
        vec![Event::Sent(text.clone()), Event::Presence(Presence::Online)]
    );
    let ctx = h.state.store().context();
    assert_eq!(ctx.last_text, text);
    assert_eq!(ctx.last_interaction, now);

    // Decayed by one step before the reply was generated.
    let seen = h.replier.seen.lock().clone();
    assert!((seen[0].mood.get(Dimension::Frustrated) - 0.8).abs() < 1e-9);
    assert!(seen[0].system_prompt().contains("Good morning!"));
}

#[tokio::test]
async fn evening_greeting_goes_idle_and_skips_decay_when_recent() {
    let now = Utc::now();
    let h = harness(
        ScriptedSource::ok(&[]),
        EchoReplier::new(false),
        MoodVector::neutral().with(Dimension::Amused, 0.9),
        ConversationContext::new("haha", now - TimeDelta::minutes(5)),
    );

    send_greeting(&h.state, Greeting::Evening, now).await.unwrap();

    assert_eq!(h.channel.events().last(), Some(&Event::Presence(Presence::Idle)));
    assert!((h.replier.seen.lock()[0].mood.get(Dimension::Amused) - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn failed_greeting_sends_nothing() {
    let h = harness(
        ScriptedSource::ok(&[]),
        EchoReplier::new(true),
        MoodVector::neutral(),
        ConversationContext::new("before", Utc::now()),
    );

    assert!(send_greeting(&h.state, Greeting::Evening, Utc::now()).await.is_err());
    assert!(h.channel.events().is_empty());
    assert_eq!(h.state.store().context().last_text, "before");
}

// ── Scheduler lifecycle ────────────────────────────────────────────────────

#[tokio::test]
async fn scheduler_stops_on_shutdown() {
    let h = harness(ScriptedSource::ok(&[]), EchoReplier::new(false), MoodVector::neutral(), fresh());
    let (tx, rx) = tokio::sync::watch::channel(false);

    let handles = scheduler::spawn(h.state.clone(), rx);
    assert_eq!(handles.len(), 1, "greetings are disabled in this config");

    tx.send(true).unwrap();
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("task stopped")
            .unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn decay_loop_relaxes_an_idle_mood_once_per_interval() {
    let h = harness(
        ScriptedSource::ok(&[]),
        EchoReplier::new(false),
        MoodVector::neutral()
            .with(Dimension::Frustrated, 0.9)
            .with(Dimension::Anxious, 0.2),
        ConversationContext::new("see you", Utc::now() - TimeDelta::hours(2)),
    );
    let (tx, rx) = tokio::sync::watch::channel(false);
    let handles = scheduler::spawn(h.state.clone(), rx);

    // Nothing moves before the first interval has elapsed.
    tokio::time::sleep(Duration::from_secs(599)).await;
    assert!((h.state.store().read().get(Dimension::Frustrated) - 0.9).abs() < 1e-9);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let mood = h.state.store().read();
    assert!((mood.get(Dimension::Frustrated) - 0.8).abs() < 1e-9, "{mood}");
    assert!((mood.get(Dimension::Anxious) - 0.3).abs() < 1e-9, "{mood}");
    assert_eq!(mood.get(Dimension::Affection), 0.5);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!((h.state.store().read().get(Dimension::Frustrated) - 0.7).abs() < 1e-9);

    tx.send(true).unwrap();
    for handle in handles {
        handle.await.unwrap();
    }
}

// ── Configuration ──────────────────────────────────────────────────────────

#[test]
fn full_config_document_loads() {
    let doc = r#"
[nature]
Affection = 7
Amused = 5
Inspired = 6
Frustrated = 4
Anxious = 3
Curious = 6

[decay]
idle_after_secs = 600
step = 0.02
interval_secs = 60

[reaction]
threshold = 0.75
dominance = "distance"

[reaction.positive]
Curious = ["🔍"]

[analysis]
timeout_secs = 5
neutral_start = "Hi."

[provider]
model = "gemini-2.5-flash"
reply_temperature = 0.9

[schedule]
morning = "06:45"
evening = "21:15"
"#;
    let settings = Settings::from_config(&AppConfig::from_toml(doc).unwrap()).unwrap();

    assert_eq!(settings.mood.policy.threshold, 0.75);
    assert_eq!(settings.mood.policy.dominance, DominanceRule::DistanceFromNeutral);
    assert_eq!(settings.mood.decay.idle_after, Duration::from_secs(600));
    assert_eq!(settings.mood.decay_interval, Duration::from_secs(60));
    assert_eq!(settings.mood.analysis.neutral_start, "Hi.");
    assert_eq!(
        settings.mood.tables.candidates(Dimension::Curious, kaori_core::Polarity::Positive),
        ["🔍".to_string()]
    );
    assert_eq!(settings.provider.model, "gemini-2.5-flash");
    assert_eq!(settings.provider.reply_temperature, 0.9);
    assert_eq!(settings.schedule.morning.format("%H:%M").to_string(), "06:45");
    assert_eq!(settings.schedule.evening.format("%H:%M").to_string(), "21:15");
}

#[test]
fn out_of_range_settings_are_rejected() {
    let nature = "[nature]\nAffection = 1\nAmused = 1\nInspired = 1\nFrustrated = 1\nAnxious = 1\nCurious = 1\n";
    for extra in [
        "[reaction]\nthreshold = 0.4\n",
        "[decay]\nstep = 0.9\n",
        "[provider]\nsentiment_temperature = 3.0\n",
        "[provider]\nmodel = \"  \"\n",
    ] {
        let cfg = AppConfig::from_toml(&format!("{nature}{extra}")).unwrap();
        assert!(Settings::from_config(&cfg).is_err(), "accepted: {extra}");
    }
}
