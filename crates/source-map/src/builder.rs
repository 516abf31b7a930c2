//! Source map builder for recording position mappings during transformation.

use crate::vlq::encode_vlq;
use crate::LineCol;
use serde::Serialize;

/// A single mapping from a generated position to an original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The position in the generated output.
    pub generated: LineCol,
    /// The position in the original source.
    pub original: LineCol,
}

/// A serialisable v3 source map with a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl RawSourceMap {
    /// Renders the map as compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A builder collecting mappings for one generated file.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    /// Creates a new source map builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if nothing has been recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Records that `generated` corresponds to `original`.
    pub fn add_mapping(&mut self, generated: LineCol, original: LineCol) {
        self.mappings.push(Mapping {
            generated,
            original,
        });
    }

    /// Maps the start of every generated line to the start of the same source line.
    pub fn add_identity_lines(&mut self, line_count: u32) {
        for line in 0..line_count {
            self.add_mapping(LineCol::new(line, 0), LineCol::new(line, 0));
        }
    }

    /// Encodes the recorded mappings into a v3 source map.
    pub fn build(mut self, file: impl Into<String>, source: impl Into<String>) -> RawSourceMap {
        self.mappings.sort_by_key(|m| m.generated);

        let mut mappings = String::new();
        let mut generated_line = 0;
        let mut previous_generated_col: i64 = 0;
        let mut previous_original_line: i64 = 0;
        let mut previous_original_col: i64 = 0;
        let mut first_in_line = true;

        for mapping in &self.mappings {
            while generated_line < mapping.generated.line {
                mappings.push(';');
                generated_line += 1;
                previous_generated_col = 0;
                first_in_line = true;
            }
            if !first_in_line {
                mappings.push(',');
            }
            first_in_line = false;

            let generated_col = i64::from(mapping.generated.col);
            let original_line = i64::from(mapping.original.line);
            let original_col = i64::from(mapping.original.col);
            encode_vlq(&mut mappings, generated_col - previous_generated_col);
            // Single source: index delta is always zero.
            encode_vlq(&mut mappings, 0);
            encode_vlq(&mut mappings, original_line - previous_original_line);
            encode_vlq(&mut mappings, original_col - previous_original_col);

            previous_generated_col = generated_col;
            previous_original_line = original_line;
            previous_original_col = original_col;
        }

        RawSourceMap {
            version: 3,
            file: file.into(),
            sources: vec![source.into()],
            names: Vec::new(),
            mappings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_builder() {
        let builder = SourceMapBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build("out.js", "in.js").mappings, "");
    }

    #[test]
    fn test_identity_lines() {
        let mut builder = SourceMapBuilder::new();
        builder.add_identity_lines(4);
        assert_eq!(builder.len(), 4);
        let map = builder.build("out.js", "in.ts");
        assert_eq!(map.mappings, "AAAA;AACA;AACA;AACA");
        assert_eq!(map.sources, vec!["in.ts".to_string()]);
    }

    #[test]
    fn test_multiple_segments_on_one_line() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(LineCol::new(0, 4), LineCol::new(0, 8));
        builder.add_mapping(LineCol::new(0, 0), LineCol::new(0, 0));
        builder.add_mapping(LineCol::new(2, 1), LineCol::new(1, 0));
        let map = builder.build("a.js", "a.ts");
        assert_eq!(map.mappings, "AAAA,IAAQ;;CACR");
    }

    #[test]
    fn test_json_shape() {
        let mut builder = SourceMapBuilder::new();
        builder.add_identity_lines(1);
        let json = builder.build("a.js", "a.ts").to_json();
        assert_eq!(
            json,
            r#"{"version":3,"file":"a.js","sources":["a.ts"],"names":[],"mappings":"AAAA"}"#
        );
    }
}
