use crate::error::{RecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "recast.json";

/// Table link and sort settings, stored in recast.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Query parameter naming the sorted column
    #[serde(default = "default_sort_param")]
    pub sort_param: String,

    /// Query parameter carrying the direction
    #[serde(default = "default_order_param")]
    pub order_param: String,

    #[serde(default = "default_asc")]
    pub asc: String,

    #[serde(default = "default_desc")]
    pub desc: String,

    /// Parameters added to every generated link
    #[serde(default)]
    pub link_params: BTreeMap<String, String>,
}

fn default_sort_param() -> String {
    "sort".to_string()
}

fn default_order_param() -> String {
    "order".to_string()
}

fn default_asc() -> String {
    "asc".to_string()
}

fn default_desc() -> String {
    "desc".to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            sort_param: default_sort_param(),
            order_param: default_order_param(),
            asc: default_asc(),
            desc: default_desc(),
            link_params: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: TableConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Sort links cannot toggle between identical tokens.
    pub fn validate(&self) -> Result<()> {
        if self.asc == self.desc {
            return Err(RecastError::InvalidConfiguration(format!(
                "asc and desc tokens must differ, both are '{}'",
                self.asc
            )));
        }
        if self.sort_param.is_empty() || self.order_param.is_empty() {
            return Err(RecastError::InvalidConfiguration(
                "sort and order parameter names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
