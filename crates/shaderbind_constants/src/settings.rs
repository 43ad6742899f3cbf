use serde::Deserialize;
use smart_default::SmartDefault;

/// What happens when a uniform is accessed past its element count.
#[derive(SmartDefault, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// The write is dropped and a warning is logged.
    #[default]
    Ignore,
    /// The write lands in the last element.
    Clamp,
    /// The write panics.
    Panic,
}

#[derive(SmartDefault, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Applies to writes only. Reads past the end always return `None`.
    pub index_policy: IndexPolicy,
}
