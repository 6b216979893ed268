// Kaori Engine — runtime around the mood core.
// Model providers, the channel boundary, the conversation turn and the
// background scheduler. The mood itself lives in kaori-core.

pub mod channels;
pub mod chat;
pub mod http;
pub mod providers;
pub mod scheduler;
pub mod state;
