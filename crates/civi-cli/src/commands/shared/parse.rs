use civi_core::{EntityKind, PostType};

/// Parse an entity kind name; `-` and `_` are interchangeable.
pub fn parse_kind(raw: &str) -> anyhow::Result<EntityKind> {
    raw.parse::<EntityKind>().map_err(|_| {
        let known = EntityKind::ALL.map(EntityKind::as_str).join(", ");
        anyhow::anyhow!("invalid kind '{raw}': expected one of {known}")
    })
}

/// Parse and validate a post type name.
pub fn parse_post_type(raw: &str) -> anyhow::Result<PostType> {
    PostType::parse(raw).map_err(anyhow::Error::from)
}

#[cfg(test)]
mod tests {
    use civi_core::EntityKind;

    use super::{parse_kind, parse_post_type};

    #[test]
    fn parses_hyphenated_kind() {
        let kind = parse_kind("participant-role").expect("kind should parse");
        assert_eq!(kind, EntityKind::ParticipantRole);
    }

    #[test]
    fn lists_known_kinds_on_error() {
        let err = parse_kind("membership_type").expect_err("should fail");
        let message = err.to_string();
        assert!(message.contains("invalid kind 'membership_type'"));
        assert!(message.contains("contact_type"));
    }

    #[test]
    fn rejects_uppercase_post_type() {
        assert!(parse_post_type("Student").is_err());
        assert_eq!(parse_post_type("student").expect("valid").as_str(), "student");
    }
}
