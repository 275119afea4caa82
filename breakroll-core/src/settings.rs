//! Operator settings and the field-preservation policy used by resets.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_BACKGROUND;

/// Which board the renderer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Primary,
    Summary,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "summary" => Ok(Self::Summary),
            other => Err(format!("unknown view mode `{other}`")),
        }
    }
}

/// Cosmetic configuration owned by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSettings {
    /// Display label shown in the banner.
    #[serde(default)]
    pub label: String,
    /// Embedded banner image (binary-as-text, usually a `data:` URL).
    #[serde(default)]
    pub image: Option<String>,
    /// Embedded icon image.
    #[serde(default)]
    pub icon: Option<String>,
    /// Color overrides keyed by custom-property name.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default = "OperatorSettings::default_background")]
    pub background: String,
    #[serde(default)]
    pub gradient: bool,
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl OperatorSettings {
    fn default_background() -> String {
        DEFAULT_BACKGROUND.to_string()
    }

    /// Apply a single field update, returning the field it touched.
    pub fn apply(&mut self, update: SettingUpdate) -> SettingField {
        match update {
            SettingUpdate::Label(label) => {
                self.label = label.trim().to_string();
                SettingField::Label
            }
            SettingUpdate::Image(image) => {
                self.image = image.filter(|payload| !payload.trim().is_empty());
                SettingField::Image
            }
            SettingUpdate::Icon(icon) => {
                self.icon = icon.filter(|payload| !payload.trim().is_empty());
                SettingField::Icon
            }
            SettingUpdate::Color { key, value } => {
                self.colors.insert(key, value);
                SettingField::Colors
            }
            SettingUpdate::ClearColor(key) => {
                self.colors.remove(&key);
                SettingField::Colors
            }
            SettingUpdate::Background(background) => {
                self.background = background;
                SettingField::Background
            }
            SettingUpdate::Gradient(gradient) => {
                self.gradient = gradient;
                SettingField::Gradient
            }
            SettingUpdate::ViewMode(mode) => {
                self.view_mode = mode;
                SettingField::ViewMode
            }
        }
    }

    /// Copy one field's value from `source`.
    fn copy_field(&mut self, source: &Self, field: SettingField) {
        match field {
            SettingField::Label => self.label.clone_from(&source.label),
            SettingField::Image => self.image.clone_from(&source.image),
            SettingField::Icon => self.icon.clone_from(&source.icon),
            SettingField::Colors => self.colors.clone_from(&source.colors),
            SettingField::Background => self.background.clone_from(&source.background),
            SettingField::Gradient => self.gradient = source.gradient,
            SettingField::ViewMode => self.view_mode = source.view_mode,
        }
    }

    /// Default settings carrying over exactly the `keep` fields from `self`.
    #[must_use]
    pub fn preserving(&self, keep: &[SettingField]) -> Self {
        let mut next = Self::default();
        for field in keep {
            next.copy_field(self, *field);
        }
        next
    }
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            label: String::new(),
            image: None,
            icon: None,
            colors: BTreeMap::new(),
            background: Self::default_background(),
            gradient: false,
            view_mode: ViewMode::default(),
        }
    }
}

/// Named settings fields, used for targeted updates and reset preservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingField {
    Label,
    Image,
    Icon,
    Colors,
    Background,
    Gradient,
    ViewMode,
}

impl SettingField {
    pub const ALL: [Self; 7] = [
        Self::Label,
        Self::Image,
        Self::Icon,
        Self::Colors,
        Self::Background,
        Self::Gradient,
        Self::ViewMode,
    ];
    pub const THEME: [Self; 3] = [Self::Colors, Self::Background, Self::Gradient];
    pub const BRANDING: [Self; 3] = [Self::Label, Self::Image, Self::Icon];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Image => "image",
            Self::Icon => "icon",
            Self::Colors => "colors",
            Self::Background => "background",
            Self::Gradient => "gradient",
            Self::ViewMode => "view",
        }
    }

    /// Fields kept by a plain reset: theme and branding.
    #[must_use]
    pub fn reset_default() -> Vec<Self> {
        Self::THEME.iter().chain(Self::BRANDING.iter()).copied().collect()
    }

    /// Expand a field name or group name (`theme`, `branding`, `all`).
    #[must_use]
    pub fn expand(name: &str) -> Option<Vec<Self>> {
        match name.trim().to_ascii_lowercase().as_str() {
            "theme" => Some(Self::THEME.to_vec()),
            "branding" => Some(Self::BRANDING.to_vec()),
            "all" => Some(Self::ALL.to_vec()),
            other => Self::ALL
                .iter()
                .find(|field| field.as_str() == other)
                .map(|field| vec![*field]),
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-scoped settings mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
    Label(String),
    Image(Option<String>),
    Icon(Option<String>),
    Color { key: String, value: String },
    ClearColor(String),
    Background(String),
    Gradient(bool),
    ViewMode(ViewMode),
}
