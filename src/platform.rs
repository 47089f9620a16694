//! Supported social networks and their capabilities.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// A social network the upstream API can publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Facebook
    Facebook,
    /// Instagram
    Instagram,
    /// Twitter / X
    Twitter,
    /// LinkedIn
    Linkedin,
    /// TikTok
    Tiktok,
    /// YouTube
    Youtube,
    /// Pinterest
    Pinterest,
    /// Reddit
    Reddit,
    /// Snapchat
    Snapchat,
    /// Telegram
    Telegram,
    /// Threads
    Threads,
    /// Bluesky
    Bluesky,
    /// Google Business Profile
    Gmb,
}

/// Static capability row for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Display name
    pub name: &'static str,
    /// Image posts accepted
    pub supports_images: bool,
    /// Video posts accepted
    pub supports_videos: bool,
    /// Scheduled publishing supported
    pub supports_scheduling: bool,
    /// Post length limit in characters, if any
    pub max_chars: Option<usize>,
    /// Free-form note
    pub notes: Option<&'static str>,
    /// Accepted alternative names
    pub alternatives: &'static [&'static str],
}

impl Platform {
    /// All platforms, in catalogue order.
    pub const ALL: [Platform; 13] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Pinterest,
        Platform::Reddit,
        Platform::Snapchat,
        Platform::Telegram,
        Platform::Threads,
        Platform::Bluesky,
        Platform::Gmb,
    ];

    /// Identifier sent upstream.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Pinterest => "pinterest",
            Platform::Reddit => "reddit",
            Platform::Snapchat => "snapchat",
            Platform::Telegram => "telegram",
            Platform::Threads => "threads",
            Platform::Bluesky => "bluesky",
            Platform::Gmb => "gmb",
        }
    }

    /// Capability row.
    pub fn capabilities(self) -> Capabilities {
        let base = Capabilities {
            name: "",
            supports_images: true,
            supports_videos: true,
            supports_scheduling: true,
            max_chars: None,
            notes: None,
            alternatives: &[],
        };
        match self {
            Platform::Facebook => Capabilities {
                name: "Facebook",
                max_chars: Some(63206),
                ..base
            },
            Platform::Instagram => Capabilities {
                name: "Instagram",
                max_chars: Some(2200),
                notes: Some("Requires business account"),
                ..base
            },
            Platform::Twitter => Capabilities {
                name: "Twitter/X",
                max_chars: Some(280),
                alternatives: &["x"],
                ..base
            },
            Platform::Linkedin => Capabilities {
                name: "LinkedIn",
                max_chars: Some(3000),
                ..base
            },
            Platform::Tiktok => Capabilities {
                name: "TikTok",
                supports_images: false,
                notes: Some("Videos only"),
                ..base
            },
            Platform::Youtube => Capabilities {
                name: "YouTube",
                supports_images: false,
                notes: Some("Video uploads only"),
                ..base
            },
            Platform::Pinterest => Capabilities {
                name: "Pinterest",
                ..base
            },
            Platform::Reddit => Capabilities {
                name: "Reddit",
                ..base
            },
            Platform::Snapchat => Capabilities {
                name: "Snapchat",
                ..base
            },
            Platform::Telegram => Capabilities {
                name: "Telegram",
                ..base
            },
            Platform::Threads => Capabilities {
                name: "Threads",
                max_chars: Some(500),
                ..base
            },
            Platform::Bluesky => Capabilities {
                name: "Bluesky",
                supports_videos: false,
                max_chars: Some(300),
                ..base
            },
            Platform::Gmb => Capabilities {
                name: "Google Business Profile",
                notes: Some("Formerly Google My Business"),
                ..base
            },
        }
    }

    /// Capability row as the JSON object `list_platforms` returns.
    pub fn capabilities_json(self) -> JsonValue {
        let caps = self.capabilities();
        let mut obj = Map::new();
        obj.insert("name".into(), caps.name.into());
        obj.insert("supports_images".into(), caps.supports_images.into());
        obj.insert("supports_videos".into(), caps.supports_videos.into());
        obj.insert("supports_scheduling".into(), caps.supports_scheduling.into());
        if let Some(max) = caps.max_chars {
            obj.insert("max_chars".into(), max.into());
        }
        if let Some(notes) = caps.notes {
            obj.insert("notes".into(), notes.into());
        }
        if !caps.alternatives.is_empty() {
            obj.insert("alternatives".into(), caps.alternatives.to_vec().into());
        }
        JsonValue::Object(obj)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "x" {
            return Ok(Platform::Twitter);
        }
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| {
                McpError::invalid(
                    "platforms",
                    format!(
                        "unsupported platform '{}'; expected one of: {}",
                        s,
                        Platform::ALL
                            .iter()
                            .map(|p| p.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

/// Smallest character limit among `platforms`, with the platform imposing it.
pub fn tightest_limit(platforms: &[Platform]) -> Option<(Platform, usize)> {
    platforms
        .iter()
        .filter_map(|p| p.capabilities().max_chars.map(|max| (*p, max)))
        .min_by_key(|(_, max)| *max)
}

/// Reject `text` if it exceeds the tightest limit among `platforms`.
pub fn check_text_length(text: &str, platforms: &[Platform]) -> Result<()> {
    let len = text.chars().count();
    match tightest_limit(platforms) {
        Some((platform, max)) if len > max => Err(McpError::invalid(
            "post_text",
            format!(
                "{} characters exceeds the {} limit of {}",
                len,
                platform.capabilities().name,
                max
            ),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively_with_alias() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!(" gmb ".parse::<Platform>().unwrap(), Platform::Gmb);
        let err = "myspace".parse::<Platform>().unwrap_err();
        assert_eq!(err.error_type(), "validation");
    }

    #[test]
    fn every_platform_round_trips_through_its_name() {
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn tightest_limit_picks_smallest() {
        let limit = tightest_limit(&[Platform::Facebook, Platform::Twitter, Platform::Tiktok]);
        assert_eq!(limit, Some((Platform::Twitter, 280)));
        assert_eq!(tightest_limit(&[Platform::Tiktok, Platform::Youtube]), None);
    }

    #[test]
    fn text_length_counts_chars() {
        let text = "é".repeat(300);
        assert!(check_text_length(&text, &[Platform::Bluesky]).is_ok());
        let text = "é".repeat(301);
        assert!(check_text_length(&text, &[Platform::Bluesky]).is_err());
        assert!(check_text_length(&text, &[Platform::Reddit]).is_ok());
    }

    #[test]
    fn capabilities_json_omits_absent_fields() {
        let tiktok = Platform::Tiktok.capabilities_json();
        assert!(tiktok.get("max_chars").is_none());
        assert_eq!(tiktok["supports_images"], false);
        let twitter = Platform::Twitter.capabilities_json();
        assert_eq!(twitter["alternatives"][0], "x");
        assert_eq!(twitter["max_chars"], 280);
    }
}
