// Kaori Engine — Scheduler
//
// Background tasks that run beside the conversation:
//   - decay loop     — every `decay.interval_secs`, relax an idle mood
//   - greeting loops — morning / evening messages at fixed local times
//
// Every task watches the same shutdown signal and exits when it flips.
// A failed tick is logged and the task keeps going.

use crate::atoms::constants::*;
use crate::atoms::error::EngineResult;
use crate::engine::channels::Presence;
use crate::engine::providers::ReplyRequest;
use crate::engine::state::KaoriState;
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};
use kaori_core::DecayOutcome;
use log::{error, info};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

// ── Greetings ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Morning,
    Evening,
}

impl Greeting {
    pub fn instruction(self) -> &'static str {
        match self {
            Greeting::Morning => MORNING_INSTRUCTION,
            Greeting::Evening => EVENING_INSTRUCTION,
        }
    }

    pub fn opener(self) -> &'static str {
        match self {
            Greeting::Morning => MORNING_OPENER,
            Greeting::Evening => EVENING_OPENER,
        }
    }

    /// Presence after the greeting: awake in the morning, winding down at night.
    pub fn presence(self) -> Presence {
        match self {
            Greeting::Morning => Presence::Online,
            Greeting::Evening => Presence::Idle,
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Greeting::Morning => "morning",
            Greeting::Evening => "evening",
        })
    }
}

/// Decay, generate, deliver, remember, then update presence.
///
/// Returns the greeting text. On error nothing after the failing step runs;
/// a greeting that was never delivered does not become the context.
pub async fn send_greeting(
    state: &KaoriState,
    greeting: Greeting,
    now: DateTime<Utc>,
) -> EngineResult<String> {
    state.store().decay(&state.settings.mood.decay, now);

    let request = ReplyRequest::greeting(greeting.instruction(), greeting.opener(), state.store().read());
    let text = state.replier.reply(&request).await?;

    state.channel.send(&text).await?;
    state.store().set_context(text.as_str(), now);
    state.channel.set_presence(greeting.presence()).await?;

    info!("[scheduler] {} greeting sent", greeting);
    Ok(text)
}

// ── Time helpers ───────────────────────────────────────────────────────────

/// First instant strictly after `now` whose wall-clock time is `at`.
///
/// Uses the earliest mapping when `at` is ambiguous (DST fall-back) and
/// skips days where `at` does not exist (DST spring-forward).
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..=2u64)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|day| tz.from_local_datetime(&day.and_time(at)).earliest())
        .find(|candidate| candidate > now)
        .unwrap_or_else(|| now.clone() + chrono::TimeDelta::days(1))
}

// ── Tasks ──────────────────────────────────────────────────────────────────

/// Spawn the decay loop and, if enabled, both greeting loops.
pub fn spawn(state: Arc<KaoriState>, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
    let mut handles = vec![tokio::spawn(run_decay_loop(state.clone(), shutdown.clone()))];

    let schedule = state.settings.schedule;
    if schedule.enabled {
        for (greeting, at) in [
            (Greeting::Morning, schedule.morning),
            (Greeting::Evening, schedule.evening),
        ] {
            handles.push(tokio::spawn(run_greeting_loop(
                state.clone(),
                greeting,
                at,
                shutdown.clone(),
            )));
        }
        info!(
            "[scheduler] Greetings at {} and {} local time",
            schedule.morning.format("%H:%M"),
            schedule.evening.format("%H:%M")
        );
    } else {
        info!("[scheduler] Greetings disabled");
    }
    handles
}

async fn run_decay_loop(state: Arc<KaoriState>, mut shutdown: watch::Receiver<bool>) {
    let mood = &state.settings.mood;
    let mut ticker = tokio::time::interval(mood.decay_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; nothing can be idle yet.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let DecayOutcome::Relaxed { moved: 1.. } = state.store().decay(&mood.decay, Utc::now()) {
                    info!("[scheduler] Mood relaxed to {}", state.store().read());
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    info!("[scheduler] Decay loop stopped");
}

async fn run_greeting_loop(
    state: Arc<KaoriState>,
    greeting: Greeting,
    at: NaiveTime,
    mut shutdown: watch::Receiver<bool>,
) {
    // Counting from the last target, not the wall clock, so an early wake-up
    // cannot fire the same greeting twice.
    let mut after = Local::now();
    loop {
        let next = next_occurrence(&after, at);
        let wait = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                if let Err(e) = send_greeting(&state, greeting, Utc::now()).await {
                    error!("[scheduler] {} greeting failed: {}", greeting, e);
                }
                after = next.max(Local::now());
            }
            _ = shutdown.changed() => break,
        }
    }
    info!("[scheduler] {} loop stopped", greeting);
}
