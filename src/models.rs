use serde::{Deserialize, Deserializer, Serialize};

/// JSON does not support NaN/Infinity; ensure f64 is finite before it reaches the view.
fn sanitize_f64(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// The backend sends `""` for missing text fields; treat those as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn finite_percent<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(sanitize_f64(raw))
}

/// Steam marks hidden achievements with `0`/`1`; some proxies send booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

/// A searchable game record returned by the catalog search endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CatalogEntry {
    #[serde(rename = "appid", alias = "id")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        alias = "image",
        alias = "imageUrl",
        alias = "tiny_image",
        deserialize_with = "empty_as_none"
    )]
    pub image_url: Option<String>,
}

/// A catalog entry enriched with the metadata returned alongside its achievements.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DetailEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub header_image_url: Option<String>,
}

impl DetailEntry {
    pub fn id(&self) -> u64 {
        self.entry.id
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Fold the supplemental fields of a detail response into this entry.
    /// Fields the response does not carry are left as they were.
    pub fn merge(&mut self, meta: &DetailMetadata) {
        if let Some(header) = &meta.header_image_url {
            self.header_image_url = Some(header.clone());
        }
        if self.entry.name.trim().is_empty() {
            if let Some(name) = &meta.game_name {
                self.entry.name = name.clone();
            }
        }
    }
}

impl From<CatalogEntry> for DetailEntry {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            entry,
            header_image_url: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Achievement {
    #[serde(rename = "name", alias = "internalName")]
    pub internal_name: String,
    #[serde(
        default,
        rename = "displayName",
        deserialize_with = "empty_as_none"
    )]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "icon",
        alias = "iconUrl",
        deserialize_with = "empty_as_none"
    )]
    pub icon_url: Option<String>,
    #[serde(
        default,
        rename = "percent",
        alias = "unlockPercent",
        deserialize_with = "finite_percent"
    )]
    pub unlock_percent: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub hidden: bool,
}

impl Achievement {
    /// Name shown to the user: the display name, or the internal name when there is none.
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.internal_name)
    }

    /// Fill ratio for a proportional unlock-rate indicator, clamped to `0.0..=1.0`.
    pub fn unlock_ratio(&self) -> Option<f64> {
        self.unlock_percent.map(|p| p.clamp(0.0, 100.0) / 100.0)
    }
}

/// Supplemental entry metadata carried by a detail response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailMetadata {
    pub header_image_url: Option<String>,
    pub game_name: Option<String>,
}

/// Body of `GET /api/games/{appid}/achievements`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DetailResponse {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(
        default,
        rename = "header_image",
        alias = "headerImageUrl",
        deserialize_with = "empty_as_none"
    )]
    pub header_image_url: Option<String>,
    #[serde(default, rename = "gameName", deserialize_with = "empty_as_none")]
    pub game_name: Option<String>,
}

impl DetailResponse {
    pub fn metadata(&self) -> DetailMetadata {
        DetailMetadata {
            header_image_url: self.header_image_url.clone(),
            game_name: self.game_name.clone(),
        }
    }
}
