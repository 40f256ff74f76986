mod assert_tuple;
mod fstring_missing_placeholders;
mod if_tuple;
mod import_star;
mod is_literal;
mod loop_control;
mod raise_not_implemented;
mod redefined_while_unused;
mod repeated_key_literal;
mod return_outside_function;
mod undefined_name;
mod unused_import;
mod unused_variable;

pub use assert_tuple::AssertTuple;
pub use fstring_missing_placeholders::FStringMissingPlaceholders;
pub use if_tuple::IfTuple;
pub use import_star::ImportStar;
pub use is_literal::IsLiteral;
pub use loop_control::{BreakOutsideLoop, ContinueOutsideLoop};
pub use raise_not_implemented::RaiseNotImplemented;
pub use redefined_while_unused::RedefinedWhileUnused;
pub use repeated_key_literal::RepeatedKeyLiteral;
pub use return_outside_function::ReturnOutsideFunction;
pub use undefined_name::UndefinedName;
pub use unused_import::UnusedImport;
pub use unused_variable::UnusedVariable;

use crate::linter::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(UnusedImport),
        Box::new(ImportStar),
        Box::new(FStringMissingPlaceholders),
        Box::new(RepeatedKeyLiteral),
        Box::new(AssertTuple),
        Box::new(IsLiteral),
        Box::new(IfTuple),
        Box::new(BreakOutsideLoop),
        Box::new(ContinueOutsideLoop),
        Box::new(ReturnOutsideFunction),
        Box::new(RedefinedWhileUnused),
        Box::new(UndefinedName),
        Box::new(UnusedVariable),
        Box::new(RaiseNotImplemented),
    ]
}
