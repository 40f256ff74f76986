use crate::linter::{Diagnostic, Fix, Location};

/// Byte offsets of line starts, for turning row/column locations into offsets.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        // A leading byte order mark takes no column.
        let first = if source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        let mut starts = vec![first];
        starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(offset, _)| offset + 1),
        );
        Self { source, starts }
    }

    /// Byte offset of a 1-based location. Columns count characters; a
    /// column past the end of its line clamps to the line end.
    fn offset(&self, location: Location) -> Option<usize> {
        let start = *self.starts.get(location.row.checked_sub(1)?)?;
        let line_end = self
            .starts
            .get(location.row)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let line = &self.source[start..line_end];
        let column = location.column.checked_sub(1)?;
        let within = line
            .char_indices()
            .nth(column)
            .map(|(offset, _)| offset)
            .unwrap_or(line.len());
        Some(start + within)
    }
}

/// Apply the fixes attached to `diagnostics`.
///
/// Fixes are applied in source order. A fix overlapping one already applied
/// is skipped and left for a later pass. Returns the new source and the
/// number of fixes applied.
pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> (String, usize) {
    let index = LineIndex::new(source);
    let mut edits: Vec<(usize, usize, &Fix)> = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.fix())
        .filter_map(|fix| {
            let start = index.offset(fix.location)?;
            let end = index.offset(fix.end_location)?;
            (start <= end).then_some((start, end, fix))
        })
        .collect();
    edits.sort_by_key(|&(start, end, _)| (start, end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut applied = 0;
    let mut last_insertion = None;
    for (start, end, fix) in edits {
        if start < cursor {
            continue;
        }
        // Two insertions at one point would depend on their order.
        if start == end && last_insertion == Some(start) {
            continue;
        }
        output.push_str(&source[cursor..start]);
        output.push_str(&fix.content);
        cursor = end;
        applied += 1;
        if start == end {
            last_insertion = Some(start);
        }
    }
    output.push_str(&source[cursor..]);
    (output, applied)
}
