//! Runtime configuration.
//!
//! Defaults depend on the device profile (phones get a lower frame rate, a lower
//! pixel-ratio cap and a sparser noise grid). Any field can be overridden from JS
//! by passing a JSON object to `start_site_with_config`.

use serde::{Deserialize, Serialize};

use crate::background::BackgroundMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceProfile {
    Desktop,
    Mobile,
}

impl DeviceProfile {
    pub fn from_user_agent(ua: &str) -> Self {
        const MOBILE_MARKERS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];
        let ua = ua.to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            DeviceProfile::Mobile
        } else {
            DeviceProfile::Desktop
        }
    }

    pub fn detect() -> Self {
        web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .map(|ua| Self::from_user_agent(&ua))
            .unwrap_or(DeviceProfile::Desktop)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub background_mode: BackgroundMode,
    /// Minimum milliseconds between painted frames.
    pub frame_interval_ms: f64,
    pub dpr_cap: f64,
    /// Noise mode visits every Nth grid cell.
    pub noise_step: usize,
    pub font_size: f64,
    pub chat_endpoint: String,
    pub dice_endpoint: String,
    pub calendar_endpoint: String,
    pub calendar_subscribe_url: String,
    pub log_level: String,
}

impl SiteConfig {
    pub fn for_profile(profile: DeviceProfile) -> Self {
        let mobile = profile == DeviceProfile::Mobile;
        Self {
            background_mode: BackgroundMode::DigitalRain,
            frame_interval_ms: if mobile { 33.0 } else { 16.0 },
            dpr_cap: if mobile { 1.5 } else { 2.0 },
            noise_step: if mobile { 2 } else { 1 },
            font_size: 16.0,
            chat_endpoint: "/chat".into(),
            dice_endpoint: "/dice-comment".into(),
            calendar_endpoint: "/calendar/events".into(),
            calendar_subscribe_url: CALENDAR_SUBSCRIBE_URL.into(),
            log_level: "info".into(),
        }
    }

    /// Overlay a JSON object on top of the profile defaults.
    pub fn from_json(profile: DeviceProfile, json: &str) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(Self::for_profile(profile))?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), Some(patch)) = (base.as_object_mut(), patch.as_object()) {
            for (k, v) in patch {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::for_profile(DeviceProfile::Desktop)
    }
}

pub const CALENDAR_SUBSCRIBE_URL: &str = "webcal://p44-caldav.icloud.com/published/2/NDE4ODE1NjY2NDE4ODE1NqDjLwq8GMN_zupBHSe0DAmmz8VvM5LEnkcLBL298CvgpMqp9UnWVYdyl0KkEr3T51GFC-uIzKH_pnozZxt_HFc";
