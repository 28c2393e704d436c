use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{required_text, FormError};

pub const TITLE_MAX: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorType {
    Email,
    Sql,
    Excel,
}

impl ConnectorType {
    pub fn all() -> &'static [ConnectorType] {
        &[ConnectorType::Email, ConnectorType::Sql, ConnectorType::Excel]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectorType::Email => "Email connector",
            ConnectorType::Sql => "SQL connector",
            ConnectorType::Excel => "Excel API connector",
        }
    }

    /// Config keys collected for this connector, in display order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ConnectorType::Email => &["emailServer", "emailPort", "emailUsername", "emailPassword"],
            ConnectorType::Sql => &["sqlHost", "sqlDatabase", "sqlUsername", "sqlPassword"],
            ConnectorType::Excel => &["excelApiKey", "excelClientId", "excelClientSecret"],
        }
    }

    pub fn field_label(key: &str) -> &'static str {
        match key {
            "emailServer" => "Email server",
            "emailPort" => "Port",
            "emailUsername" | "sqlUsername" => "Username",
            "emailPassword" => "Password/API key",
            "sqlHost" => "Database server",
            "sqlDatabase" => "Database name",
            "sqlPassword" => "Password",
            "excelApiKey" => "API key",
            "excelClientId" => "Client ID",
            "excelClientSecret" => "Client secret",
            _ => "",
        }
    }

    /// Whether the field should be masked when displayed.
    pub fn is_secret(key: &str) -> bool {
        matches!(
            key,
            "emailPassword" | "sqlPassword" | "excelApiKey" | "excelClientSecret"
        )
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorType::Email => write!(f, "email"),
            ConnectorType::Sql => write!(f, "sql"),
            ConnectorType::Excel => write!(f, "excel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApp {
    pub title: String,
    pub connector_type: ConnectorType,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct AppForm {
    pub title: String,
    connector: Option<ConnectorType>,
    fields: BTreeMap<&'static str, String>,
}

impl AppForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connector(&self) -> Option<ConnectorType> {
        self.connector
    }

    /// Selects a connector and clears every field that belongs to another one.
    pub fn set_connector(&mut self, connector: ConnectorType) {
        self.connector = Some(connector);
        let keep = connector.fields();
        self.fields.retain(|key, _| keep.contains(key));
    }

    /// Sets a field of the selected connector. Keys of other connectors are
    /// rejected.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(connector) = self.connector else {
            return false;
        };
        match connector.fields().iter().find(|k| **k == key) {
            Some(k) => {
                self.fields.insert(*k, value.into());
                true
            }
            None => false,
        }
    }

    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn can_save(&self) -> bool {
        self.submit().is_ok()
    }

    pub fn submit(&self) -> Result<NewApp, FormError> {
        let title = required_text("Title", &self.title, TITLE_MAX)?;
        let connector = self.connector.ok_or(FormError::Required("Connector type"))?;

        let config: serde_json::Map<String, serde_json::Value> = connector
            .fields()
            .iter()
            .map(|key| (key.to_string(), serde_json::Value::String(self.field(key).to_string())))
            .collect();

        Ok(NewApp {
            title,
            connector_type: connector,
            config: serde_json::Value::Object(config),
        })
    }
}
