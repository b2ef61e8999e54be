use serde::Deserialize;

use arithmetic::Limits;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
}
