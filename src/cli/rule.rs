use colored::Colorize;
use pyflint::docs::{RuleDoc, all_rule_docs, get_rule_doc};
use std::process::ExitCode;

pub fn run_rule(code: Option<&str>, list: bool) -> ExitCode {
    if list {
        print_rule_list();
        return ExitCode::SUCCESS;
    }

    let Some(code) = code else {
        eprintln!("Usage: pyflint rule <CODE>");
        eprintln!("       pyflint rule --list");
        eprintln!();
        eprintln!("Use {} to see all available rules.", "--list".cyan());
        return ExitCode::from(2);
    };

    match get_rule_doc(code) {
        Some(doc) => {
            print_rule_doc(doc);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{} Unknown rule: {}", "Error:".red().bold(), code);
            eprintln!();
            eprintln!(
                "Use {} to see all available rules.",
                "pyflint rule --list".cyan()
            );
            ExitCode::from(2)
        }
    }
}

fn print_rule_list() {
    println!("{}", "Available rules:".bold());
    let docs = all_rule_docs();
    let mut linters: Vec<&str> = docs.iter().map(|doc| doc.linter).collect();
    linters.sort_unstable();
    linters.dedup();

    for linter in linters {
        println!();
        println!("  {} {}", "▸".cyan(), linter.bold());
        for doc in docs.iter().filter(|doc| doc.linter == linter) {
            let fixable = if doc.fixable { " [*]" } else { "" };
            println!(
                "    {} {} - {}{}",
                doc.code.yellow(),
                doc.name,
                doc.description,
                fixable.dimmed()
            );
        }
    }
    println!();
    println!(
        "Use {} to see detailed documentation.",
        "pyflint rule <CODE>".cyan()
    );
}

fn print_rule_doc(doc: &RuleDoc) {
    println!();
    println!("{} {} ({})", "Rule:".bold(), doc.code.yellow(), doc.name);
    println!("{} {}", "Linter:".bold(), doc.linter);
    println!("{} {}", "Fixable:".bold(), if doc.fixable { "yes" } else { "no" });
    println!();
    println!("{}", doc.description);
    println!();
    println!("{}", "Why:".bold());
    for line in doc.why.lines() {
        println!("  {line}");
    }
    println!();
    println!("{}", "Bad Example:".bold().red());
    println!("{}", "─".repeat(60).dimmed());
    for line in doc.bad_example.lines() {
        println!("  {line}");
    }
    println!("{}", "─".repeat(60).dimmed());
    println!();
    println!("{}", "Good Example:".bold().green());
    println!("{}", "─".repeat(60).dimmed());
    for line in doc.good_example.lines() {
        println!("  {line}");
    }
    println!("{}", "─".repeat(60).dimmed());
    println!();
}
