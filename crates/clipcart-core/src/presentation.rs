//! Presentation rules applied when titling, captioning, and describing a
//! published video.
//!
//! A channel row carries the knobs (title prefix, hashtag template, tone,
//! subtitle style); these helpers turn them plus a product title into the
//! strings handed to the encoder and the publisher.

use crate::status::{SubtitleStyle, Tone};

/// Substitution token accepted inside a channel's hashtag template.
pub const TITLE_TOKEN: &str = "{title}";

/// Collapse whitespace (including literal `\n`/`\t` escape sequences that
/// survive scraping) into single spaces and trim the result.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let unescaped = text.replace("\\n", " ").replace("\\t", " ");
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the published title: cleaned channel prefix, a space, cleaned
/// product title. A missing or blank prefix yields just the cleaned title.
#[must_use]
pub fn build_title(prefix: Option<&str>, title: &str) -> String {
    let title = clean_text(title);
    match prefix.map(clean_text) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix} {title}"),
        _ => title,
    }
}

/// Render a hashtag template, substituting `{title}` with the cleaned title.
#[must_use]
pub fn render_hashtags(template: &str, title: &str) -> String {
    let template = clean_text(template);
    if template.contains(TITLE_TOKEN) {
        template.replace(TITLE_TOKEN, &clean_text(title))
    } else {
        template
    }
}

/// Build the publish description: the title, then the rendered hashtag
/// template on its own line when one is configured.
#[must_use]
pub fn build_description(title: &str, hashtag_template: Option<&str>) -> String {
    let title = clean_text(title);
    match hashtag_template {
        Some(template) if !clean_text(template).is_empty() => {
            format!("{title}\n{}", render_hashtags(template, &title))
        }
        _ => title,
    }
}

/// Pick a call-to-action line matching the channel's tone.
#[must_use]
pub fn cta_for_tone(tone: Tone) -> &'static str {
    let options: &[&'static str] = match tone {
        Tone::Formal => &[
            "Details at the link in our profile.",
            "See the link in our profile for more.",
            "Full details via the profile link.",
        ],
        Tone::Sales => &[
            "Today only — tap the profile link!",
            "Sale ends soon! Link in profile",
            "Buy now for the best price — link in profile",
        ],
        Tone::Informal => &[
            "Selling out fast — link in profile!",
            "Don't miss this one, link in profile",
            "Crazy value! Check the profile link",
        ],
    };
    options[rand::random_range(0..options.len())]
}

/// Apply a channel's subtitle style to a prepared caption pair, blanking the
/// side the style excludes.
#[must_use]
pub fn apply_subtitle_style(
    style: SubtitleStyle,
    top_text: String,
    bottom_text: String,
) -> (String, String) {
    match style {
        SubtitleStyle::Top => (top_text, String::new()),
        SubtitleStyle::Bottom => (String::new(), bottom_text),
        SubtitleStyle::Both => (top_text, bottom_text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Mini\t Blender \n  2000 "), "Mini Blender 2000");
    }

    #[test]
    fn clean_text_strips_literal_escapes() {
        assert_eq!(clean_text("Mini\\nBlender\\t2000"), "Mini Blender 2000");
    }

    #[test]
    fn build_title_prepends_prefix() {
        assert_eq!(
            build_title(Some("[Deal]"), "Mini Blender"),
            "[Deal] Mini Blender"
        );
    }

    #[test]
    fn build_title_without_prefix_is_just_the_title() {
        assert_eq!(build_title(None, " Mini  Blender "), "Mini Blender");
        assert_eq!(build_title(Some("   "), "Mini Blender"), "Mini Blender");
    }

    #[test]
    fn render_hashtags_substitutes_title_token() {
        assert_eq!(
            render_hashtags("#shorts #{title}", "Mini Blender"),
            "#shorts #Mini Blender"
        );
    }

    #[test]
    fn render_hashtags_without_token_is_verbatim() {
        assert_eq!(render_hashtags("#shorts #deals", "ignored"), "#shorts #deals");
    }

    #[test]
    fn build_description_appends_rendered_template() {
        let description = build_description("Mini Blender", Some("#shorts {title}"));
        assert_eq!(description, "Mini Blender\n#shorts Mini Blender");
    }

    #[test]
    fn build_description_without_template_is_the_title() {
        assert_eq!(build_description("Mini Blender", None), "Mini Blender");
        assert_eq!(build_description("Mini Blender", Some("  ")), "Mini Blender");
    }

    #[test]
    fn cta_matches_tone_register() {
        // Every tone must produce a non-empty line; exact choice is random.
        for tone in [Tone::Informal, Tone::Formal, Tone::Sales] {
            assert!(!cta_for_tone(tone).is_empty());
        }
    }

    #[test]
    fn subtitle_style_top_clears_bottom() {
        let (top, bottom) =
            apply_subtitle_style(SubtitleStyle::Top, "t".to_string(), "b".to_string());
        assert_eq!(top, "t");
        assert!(bottom.is_empty());
    }

    #[test]
    fn subtitle_style_bottom_clears_top() {
        let (top, bottom) =
            apply_subtitle_style(SubtitleStyle::Bottom, "t".to_string(), "b".to_string());
        assert!(top.is_empty());
        assert_eq!(bottom, "b");
    }

    #[test]
    fn subtitle_style_both_keeps_both() {
        let (top, bottom) =
            apply_subtitle_style(SubtitleStyle::Both, "t".to_string(), "b".to_string());
        assert_eq!((top.as_str(), bottom.as_str()), ("t", "b"));
    }
}
