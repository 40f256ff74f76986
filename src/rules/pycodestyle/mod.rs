mod ambiguous_names;
mod bare_except;
mod invalid_escape_sequence;
mod lambda_assignment;
mod line_too_long;
mod literal_comparisons;
mod missing_newline_at_end;
mod module_import_not_at_top;
mod multiple_imports_on_one_line;
mod not_tests;
mod trailing_whitespace;
mod type_comparison;

pub use ambiguous_names::{AmbiguousClassName, AmbiguousFunctionName, AmbiguousVariableName};
pub use bare_except::BareExcept;
pub use invalid_escape_sequence::InvalidEscapeSequence;
pub use lambda_assignment::LambdaAssignment;
pub use line_too_long::LineTooLong;
pub use literal_comparisons::{NoneComparison, TrueFalseComparison};
pub use missing_newline_at_end::MissingNewlineAtEnd;
pub use module_import_not_at_top::ModuleImportNotAtTop;
pub use multiple_imports_on_one_line::MultipleImportsOnOneLine;
pub use not_tests::{NotInTest, NotIsTest};
pub use trailing_whitespace::{BlankLineWithWhitespace, TrailingWhitespace};
pub use type_comparison::TypeComparison;

use crate::linter::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MultipleImportsOnOneLine),
        Box::new(ModuleImportNotAtTop),
        Box::new(LineTooLong),
        Box::new(NoneComparison),
        Box::new(TrueFalseComparison),
        Box::new(NotInTest),
        Box::new(NotIsTest),
        Box::new(TypeComparison),
        Box::new(BareExcept),
        Box::new(LambdaAssignment),
        Box::new(AmbiguousVariableName),
        Box::new(AmbiguousClassName),
        Box::new(AmbiguousFunctionName),
        Box::new(TrailingWhitespace),
        Box::new(MissingNewlineAtEnd),
        Box::new(BlankLineWithWhitespace),
        Box::new(InvalidEscapeSequence),
    ]
}
