// Domain rules - Presentation policies applied to normalized clips

use crate::domain::model::Clip;

/// Business rules for hashtag presentation
pub struct HashtagPolicy {
    /// Number of title words turned into tags
    pub title_words: usize,
    /// Maximum tags kept per clip
    pub max_tags: usize,
}

impl Default for HashtagPolicy {
    fn default() -> Self {
        Self {
            title_words: 3,
            max_tags: 6,
        }
    }
}

impl HashtagPolicy {
    /// Merge provider tags with tags derived from the title
    pub fn normalize(&self, raw: &[String], title: &str) -> Vec<String> {
        let lowered_title = title.to_lowercase();
        let title_tags = lowered_title
            .split(|c: char| !c.is_ascii_lowercase() && !c.is_ascii_digit())
            .filter(|word| !word.is_empty())
            .take(self.title_words)
            .map(|word| format!("#{}", word));

        let mut seen = Vec::new();
        for tag in raw.iter().cloned().chain(title_tags) {
            let tag = Self::canonical_tag(&tag);
            if tag.is_empty() || tag == "#" || seen.contains(&tag) {
                continue;
            }
            seen.push(tag);
            if seen.len() == self.max_tags {
                break;
            }
        }

        seen
    }

    /// Return a copy of the clip with normalized hashtags
    pub fn apply(&self, clip: Clip) -> Clip {
        let hashtags = self.normalize(clip.hashtags(), clip.title());
        clip.with_hashtags(hashtags)
    }

    fn canonical_tag(tag: &str) -> String {
        if tag.starts_with('#') {
            return tag.to_lowercase();
        }

        let stripped: String = tag
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        format!("#{}", stripped)
    }
}
