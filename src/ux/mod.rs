use colored::Colorize;
use std::io::{self, Write};

use crate::wire::ImprovementResult;

fn card(title: &str, body: &str) {
    println!("{}", format!("── {} ", title).bold());
    println!("{}\n", indent(body.trim(), 2));
}

pub fn show_result(result: &ImprovementResult) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━ dePrompt Results ━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());

    card(&"Improved Prompt".green().to_string(), &result.improved_prompt);

    let a = &result.analysis;
    let mut analysis_body = format!(
        "Domain: {}\nFormat type: {}\nComplexity: {}\nCritical requirements:\n{}",
        a.domain,
        a.format_type.as_str(),
        a.complexity_level.as_str(),
        bullets(&a.critical_requirements),
    );
    for (label, list) in [
        ("Constraints", &a.constraints),
        ("Success criteria", &a.success_criteria),
        ("Risk factors", &a.risk_factors),
        ("Format requirements", &a.format_requirements),
    ] {
        if !list.is_empty() {
            analysis_body.push_str(&format!("\n{label}:\n{}", bullets(list)));
        }
    }
    card(&"Context Analysis".cyan().to_string(), &analysis_body);

    card(&"Explanation of Changes".yellow().to_string(), &result.explanation);
    card(&"Additional Considerations".yellow().to_string(), &result.considerations);
    card(&"Validation Results".magenta().to_string(), &result.validation_report);
}

pub fn ask(question: &str) -> String {
    println!("{} {}", "?".cyan().bold(), question.bold());
    print!("> ");
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        s.trim().to_string()
    } else {
        String::new()
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("  • {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}
