mod relative_imports;

pub use relative_imports::RelativeImports;

use crate::linter::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(RelativeImports)]
}
