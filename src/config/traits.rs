use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One `[section]` of the TOML configuration file.
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
}
