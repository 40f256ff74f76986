mod complex_structure;

pub use complex_structure::ComplexStructure;

use crate::linter::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(ComplexStructure)]
}
