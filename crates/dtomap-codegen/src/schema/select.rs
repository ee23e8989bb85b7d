use super::Error;

/// Parsed form of the property selection mini-language.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    All,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl Selection {
    pub(crate) fn parse(source: Option<&str>) -> Result<Selection, Error> {
        let Some(source) = source else {
            return Ok(Selection::All);
        };

        let tokens: Vec<String> = source
            .split(',')
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            return Ok(Selection::All);
        }

        let exclusions = tokens.iter().filter(|token| token.starts_with('-')).count();

        if exclusions == 0 {
            Ok(Selection::Include(tokens))
        } else if exclusions == tokens.len() {
            Ok(Selection::Exclude(
                tokens.iter().map(|token| token[1..].to_string()).collect(),
            ))
        } else {
            Err(Error::MixedSelection { tokens })
        }
    }

    pub(crate) fn selects(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Include(names) => names.iter().any(|n| n == name),
            Selection::Exclude(names) => !names.iter().any(|n| n == name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_selection_keeps_everything() {
        let selection = Selection::parse(None).unwrap();

        assert!(selection.selects("id"));
        assert!(selection.selects("name"));
    }

    #[test]
    fn inclusions_keep_only_the_named_properties() {
        let selection = Selection::parse(Some("id, name")).unwrap();

        assert!(selection.selects("id"));
        assert!(selection.selects("name"));
        assert!(!selection.selects("employer"));
    }

    #[test]
    fn exclusions_drop_only_the_named_properties() {
        let selection = Selection::parse(Some("-employer")).unwrap();

        assert!(selection.selects("id"));
        assert!(!selection.selects("employer"));
    }

    #[test]
    fn mixing_inclusions_and_exclusions_fails() {
        let err = Selection::parse(Some("a, -b")).unwrap_err();

        assert_eq!(
            err.to_string(),
            "can't mix inclusions and exclusions: [a, -b]"
        );
    }

    #[test]
    fn blank_selection_keeps_everything() {
        assert_eq!(Selection::parse(Some("  ")).unwrap(), Selection::All);
    }
}
