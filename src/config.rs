use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Responsible parties with too few cases to get their own bar.
/// They are reported under `other_label`.
const DEFAULT_OTHER_RESPONSIBLES: &[&str] = &[
    "Alexsandro Fernandes Maffei",
    "Ana Caroline Mendes Carvalho",
    "Brenda Bertotti Ribeiro",
    "Bruno Macagnan Do Nascimento",
    "Cleiton Bitencourt De Souza",
    "Cristian Macagnan Reus",
    "Douglas Gonçalves E Barra",
    "Fabiana Bressan",
    "Filipe Dos Santos Batista",
    "Guilherme De Costa Sonego",
    "Guilherme Medeiros Rodrigues",
    "Henrique Da Rosa Josefino",
    "Inaiá Rovaris",
    "João Victor Dagostin Dos Santos",
    "João Vitor Ghellere",
    "Jose Victor Padilha Inacio",
    "Kenny Robert Rodrigues",
    "Lucas Demetrio De Abreu",
    "Lucas Demetrio Pizzoni",
    "Lucas Jacques Costa",
    "Luiz Gustavo Uggioni Savi",
    "Marlon De Bem",
    "Otomar Rocha Speck",
    "Outro",
    "Rafael Dias Rocha (Rafa)",
    "Ramiriz Leal",
    "Susan Carboni",
];

const DEFAULT_MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub other_responsibles: Vec<String>,
    pub top_accounts: usize,
    pub top_responsibles: usize,
    pub month_abbreviations: [String; 12],
    pub not_informed_label: String,
    pub other_label: String,
    pub others_bucket_label: String,
    pub csv_delimiter: char,
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            other_responsibles: DEFAULT_OTHER_RESPONSIBLES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            top_accounts: 10,
            top_responsibles: 5,
            month_abbreviations: DEFAULT_MONTH_ABBREVIATIONS.map(String::from),
            not_informed_label: "Not informed".into(),
            other_label: "Other".into(),
            others_bucket_label: "Others".into(),
            csv_delimiter: ';',
            cache_ttl_secs: 300,
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON document. Absent keys keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Configuration loaded from {}", path.as_ref().display());
        Ok(config)
    }

    /// Applies `(key, value)` overrides, e.g. from environment or a settings table.
    /// Unparseable values leave the current value untouched.
    pub fn apply_overrides<I, K, V>(&mut self, pairs: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "top_accounts" => self.top_accounts = value.parse().unwrap_or(self.top_accounts),
                "top_responsibles" => {
                    self.top_responsibles = value.parse().unwrap_or(self.top_responsibles)
                }
                "cache_ttl_secs" => {
                    self.cache_ttl_secs = value.parse().unwrap_or(self.cache_ttl_secs)
                }
                "csv_delimiter" => {
                    let mut chars = value.chars();
                    if let (Some(c), None) = (chars.next(), chars.next()) {
                        self.csv_delimiter = c;
                    }
                }
                "not_informed_label" => self.not_informed_label = value.to_string(),
                "other_label" => self.other_label = value.to_string(),
                "others_bucket_label" => self.others_bucket_label = value.to_string(),
                "other_responsibles" => {
                    if let Ok(v) = serde_json::from_str(value) {
                        self.other_responsibles = v;
                    }
                }
                "month_abbreviations" => {
                    if let Ok(v) = serde_json::from_str(value) {
                        self.month_abbreviations = v;
                    }
                }
                other => log::warn!("Ignoring unknown configuration key {:?}", other),
            }
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.top_accounts == 0 {
            return Err(AppError::InvalidConfig("topAccounts must be at least 1".into()));
        }
        if self.top_responsibles == 0 {
            return Err(AppError::InvalidConfig(
                "topResponsibles must be at least 1".into(),
            ));
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(AppError::InvalidConfig(format!(
                "csvDelimiter must be an ASCII character, got {:?}",
                self.csv_delimiter
            )));
        }

        // Labels must stay distinct so that period key -> label is a bijection.
        let mut seen = HashSet::new();
        for abbr in &self.month_abbreviations {
            let abbr = abbr.trim();
            if abbr.is_empty() {
                return Err(AppError::InvalidConfig(
                    "month abbreviations must not be empty".into(),
                ));
            }
            if !seen.insert(abbr.to_lowercase()) {
                return Err(AppError::InvalidConfig(format!(
                    "duplicate month abbreviation {:?}",
                    abbr
                )));
            }
        }
        Ok(())
    }

    /// Abbreviation for a month number in 1..=12.
    pub fn month_abbr(&self, month: u32) -> &str {
        match month {
            1..=12 => &self.month_abbreviations[(month - 1) as usize],
            _ => "?",
        }
    }

    pub fn is_other_responsible(&self, name: &str) -> bool {
        self.other_responsibles.iter().any(|n| n == name)
    }
}
