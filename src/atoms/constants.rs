// ── Kaori Atoms: Constants ─────────────────────────────────────────────────
// Named constants for the runtime: prompts, provider defaults, schedule
// defaults. Collected here so prompt wording is audited in one place.

// ── Sentiment instruction ──────────────────────────────────────────────────
// Sent as the system instruction for every sentiment call. The answer format
// must stay in sync with kaori_core::mood::parser.
pub const SENTIMENT_INSTRUCTION: &str = "You're Kaori, an introverted yet affectionate companion. \
Analyze the given sentence in relation to the previous response and determine its emotional tone. \
Strictly return all categories ('Affection', 'Amused', 'Inspired', 'Frustrated', 'Anxious', 'Curious') \
with intensity as floats from -1.0 (strong negative) to 1.0 (strong positive), formatted as \
'tone:strength', separated by commas. If no strong match exists, assign slight negative values to \
maintain mood shifts. No extra commentary.";

// ── Reply instructions ─────────────────────────────────────────────────────
pub const CHAT_INSTRUCTION: &str = "Your name is Kaori. Engage in natural, friendly conversation. \
Adjust your response length by mood: more positive means more detail, more negative means brevity.";

pub const MORNING_INSTRUCTION: &str = "Start the day with a warm and cheerful 'Good morning!' \
Wish the user a great day ahead in a friendly and uplifting way. Keep it short, positive, and under 50 words.";
pub const MORNING_OPENER: &str = "good morning!";

pub const EVENING_INSTRUCTION: &str = "Greet the user with a heartfelt 'Good evening!' and then ask \
them how their day went in a warm and caring way. Ensure your response feels personal, friendly, and \
under 60 words. Avoid generic or robotic phrasing.";
pub const EVENING_OPENER: &str = "good evening!";

/// Appended after the rendered mood so the model knows how to read it.
pub const MOOD_SCALE_NOTE: &str = "Here, 0.5 is neutral, 1 is positive, and 0 is negative.";

// ── Provider defaults ──────────────────────────────────────────────────────
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_SENTIMENT_TEMPERATURE: f64 = 0.6;
pub const DEFAULT_REPLY_TEMPERATURE: f64 = 0.7;
pub(crate) const PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Consecutive failures before the provider circuit opens, and for how long.
pub(crate) const PROVIDER_CIRCUIT_THRESHOLD: u32 = 5;
pub(crate) const PROVIDER_CIRCUIT_COOLDOWN_SECS: u64 = 60;
/// Provider retries: attempts after the first, doubling base, backoff cap,
/// and the longest `Retry-After` honoured.
pub(crate) const PROVIDER_MAX_RETRIES: u32 = 3;
pub(crate) const PROVIDER_RETRY_BASE_MS: u64 = 1_000;
pub(crate) const PROVIDER_RETRY_CAP_MS: u64 = 30_000;
pub(crate) const PROVIDER_RETRY_AFTER_CAP_SECS: u64 = 60;

// ── Schedule defaults ──────────────────────────────────────────────────────
pub const DEFAULT_MORNING_AT: &str = "08:00";
pub const DEFAULT_EVENING_AT: &str = "20:00";

// ── Config file ────────────────────────────────────────────────────────────
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "KAORI_CONFIG";
