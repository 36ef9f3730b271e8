//! Content-type selection prompt
//!
//! The inline keyboard offered for every accepted link and the closed set of
//! choices it can produce.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Text of the message carrying the selection keyboard
pub const PROMPT_TEXT: &str = "Please select the type of content:";

/// What the user asked to receive for a pending link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChoice {
    /// Deliver every item as a video attachment with a caption
    Video,
    /// Deliver every item as a photo attachment with a caption
    Image,
    /// Deliver every item as a captionless video attachment, whatever the
    /// underlying media type is
    Both,
}

impl ContentChoice {
    /// Parses a callback-data tag. Unknown tags yield `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// The opaque tag carried in the callback data
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Both => "both",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Image => "Image",
            Self::Both => "Both",
        }
    }
}

/// Builds the three-button inline keyboard shown for a pending link.
#[must_use]
pub fn choice_keyboard() -> InlineKeyboardMarkup {
    let row = [ContentChoice::Video, ContentChoice::Image, ContentChoice::Both]
        .into_iter()
        .map(|choice| InlineKeyboardButton::callback(choice.label(), choice.tag()))
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row])
}
