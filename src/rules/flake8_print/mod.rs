mod print_call;

pub use print_call::{PPrint, Print};

use crate::linter::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(Print), Box::new(PPrint)]
}
