use serde_json::Value;

pub(crate) const DEFAULT_API_BASE: &str = "https://rickandmortyapi.com/api";

pub(crate) const LOADING_CAPTION: &str = "Loading episode characters...";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Episode {
    pub(crate) name: String,
    pub(crate) character_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Character {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) image: String,
}

pub(crate) fn episode_url(base: &str, episode_id: u32) -> String {
    format!("{}/episode/{episode_id}", base.trim_end_matches('/'))
}

pub(crate) fn parse_episode(raw: &str) -> Result<Episode, String> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| format!("episode response is not valid JSON: {err}"))?;

    let name = parsed
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or("episode response is missing its name")?
        .to_string();

    let entries = parsed
        .get("characters")
        .and_then(Value::as_array)
        .ok_or("episode response is missing its character list")?;

    let mut character_urls = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = entry
            .as_str()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or("episode character list contains a non-URL entry")?;
        character_urls.push(url.to_string());
    }

    Ok(Episode {
        name,
        character_urls,
    })
}

pub(crate) fn parse_character(raw: &str) -> Result<Character, String> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| format!("character response is not valid JSON: {err}"))?;

    let id = parsed
        .get("id")
        .and_then(Value::as_u64)
        .ok_or("character response is missing its id")?;
    let name = parsed
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or("character response is missing its name")?
        .to_string();
    let image = parsed
        .get("image")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|image| !image.is_empty())
        .ok_or("character response is missing its image")?
        .to_string();

    Ok(Character { id, name, image })
}

pub(crate) fn format_cast_header(locator_count: usize, episode_name: &str) -> String {
    format!("{locator_count} Characters in episode \"{episode_name}\"")
}

pub(crate) fn format_cast_failure(message: &str) -> String {
    format!("Failed to load cast: {message}")
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
