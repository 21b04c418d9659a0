use crate::constants::{RAISE_MS_ATTR, RETURN_MS_ATTR, TRAVEL_MS_ATTR};
use stage_core::{ConfigError, StageConfig};
use web_sys as web;

/// Parse a millisecond attribute value into seconds.
pub fn parse_ms(raw: Option<&str>) -> Option<f32> {
    let ms = raw?.trim().parse::<f32>().ok()?;
    ms.is_finite().then_some(ms / 1000.0)
}

/// Apply optional duration overrides (seconds) and validate the result.
pub fn apply_overrides(
    mut config: StageConfig,
    raise: Option<f32>,
    travel: Option<f32>,
    ret: Option<f32>,
) -> Result<StageConfig, ConfigError> {
    let c = &mut config.choreography;
    if let Some(v) = raise {
        c.raise_sec = v;
    }
    if let Some(v) = travel {
        c.travel_sec = v;
    }
    if let Some(v) = ret {
        c.return_sec = v;
    }
    config.validate()?;
    Ok(config)
}

/// Stage configuration from the canvas' `data-*-ms` attributes; falls back to
/// defaults when an override is invalid.
pub fn from_element(el: &web::Element) -> StageConfig {
    let read = |name: &str| parse_ms(el.get_attribute(name).as_deref());
    match apply_overrides(
        StageConfig::default(),
        read(RAISE_MS_ATTR),
        read(TRAVEL_MS_ATTR),
        read(RETURN_MS_ATTR),
    ) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("[stage] ignoring duration overrides: {}", e);
            StageConfig::default()
        }
    }
}
