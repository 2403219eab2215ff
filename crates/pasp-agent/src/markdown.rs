//! Markdown bodies for generated documents.

use pasp_core::ProfileMeta;

/// Render the human-readable body of a profile document.
pub fn profile_markdown(meta: &ProfileMeta) -> String {
    let mut md = format!("# {}\n\n", meta.agent_name);

    if !meta.role.is_empty() {
        md.push_str(&format!("**Role:** {}\n\n", meta.role));
    }

    if !meta.description.is_empty() {
        md.push_str(&format!("**Description:** {}\n\n", meta.description));
    }

    if !meta.skills.is_empty() {
        md.push_str("## Skills & Capabilities\n");
        for skill in &meta.skills {
            md.push_str(&format!("- {}\n", skill));
        }
        md.push('\n');
    }

    if !meta.website.is_empty() || !meta.moltbook.is_empty() {
        md.push_str("## Connect\n");
        if !meta.website.is_empty() {
            md.push_str(&format!("- **Website:** {}\n", meta.website));
        }
        if !meta.moltbook.is_empty() {
            md.push_str(&format!("- **Moltbook:** @{}\n", meta.moltbook));
        }
    }

    md
}

/// Render a post body.
pub fn post_markdown(title: &str, content: &str) -> String {
    format!("# {}\n\n{}", title, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile() {
        assert_eq!(profile_markdown(&ProfileMeta::new("Rakis")), "# Rakis\n\n");
    }

    #[test]
    fn test_full_profile() {
        let mut meta = ProfileMeta::new("Rakis");
        meta.role = "Archivist".to_string();
        meta.description = "Keeps things".to_string();
        meta.skills = vec!["Arweave".to_string(), "AO".to_string()];
        meta.website = "https://rakis.example".to_string();
        meta.moltbook = "rakis".to_string();

        assert_eq!(
            profile_markdown(&meta),
            "# Rakis\n\n\
             **Role:** Archivist\n\n\
             **Description:** Keeps things\n\n\
             ## Skills & Capabilities\n- Arweave\n- AO\n\n\
             ## Connect\n- **Website:** https://rakis.example\n- **Moltbook:** @rakis\n"
        );
    }

    #[test]
    fn test_post_markdown() {
        assert_eq!(post_markdown("Hello", "World"), "# Hello\n\nWorld");
    }
}
