use crate::options::Options;

/// The element and fragment pragmas split at their first dot, so that the
/// base identifier can be rewritten like any other reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JsxPragmaInfo {
    pub base: String,
    pub suffix: String,
    pub fragment_base: String,
    pub fragment_suffix: String,
}

impl JsxPragmaInfo {
    pub(crate) fn new(options: &Options) -> Self {
        let (base, suffix) = split_pragma(options.jsx_pragma());
        let (fragment_base, fragment_suffix) = split_pragma(options.jsx_fragment_pragma());
        Self {
            base,
            suffix,
            fragment_base,
            fragment_suffix,
        }
    }
}

fn split_pragma(pragma: &str) -> (String, String) {
    let dot = pragma.find('.').unwrap_or(pragma.len());
    (pragma[..dot].to_string(), pragma[dot..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_pragmas() {
        let options = Options {
            jsx_pragma: Some("h".to_string()),
            ..Options::default()
        };
        assert_eq!(
            JsxPragmaInfo::new(&options),
            JsxPragmaInfo {
                base: "h".to_string(),
                suffix: String::new(),
                fragment_base: "React".to_string(),
                fragment_suffix: ".Fragment".to_string(),
            }
        );
    }
}
