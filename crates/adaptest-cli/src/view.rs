//! Terminal rendering of controller state.
//!
//! The view only reads state; every change goes through the controller.

use std::time::Duration;

use comfy_table::{Cell, Table};

use adaptest_core::driver::SessionObserver;
use adaptest_core::error::GatewayError;
use adaptest_core::mastery::starting_difficulty_for;
use adaptest_core::model::{Question, StudentProfile};
use adaptest_core::report::SessionReport;
use adaptest_core::traits::FetchRequest;

/// Console progress observer for question fetches.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_fetch_start(&self, request: &FetchRequest) {
        match request {
            FetchRequest::Start => eprintln!("  Preparing your first question..."),
            FetchRequest::Submit(_) => eprintln!("  Choosing your next question..."),
        }
    }

    fn on_retry(&self, attempt: u32, delay: Duration, error: &GatewayError) {
        eprintln!(
            "  Attempt {attempt} failed ({error}), retrying in {:.1}s",
            delay.as_secs_f64()
        );
    }

    fn on_fetch_failed(&self, error: &GatewayError, attempts: u32) {
        eprintln!("  Giving up after {attempts} attempt(s): {error}");
    }

    fn on_question_ready(&self, _: &Question) {}
}

pub fn print_profile(profile: &StudentProfile) {
    println!("{} ({})", profile.name, profile.level);
    println!("  Tests completed: {}", profile.total_tests);
    println!("  Avg. accuracy:   {:.0}%", profile.avg_accuracy);
    println!("  Current streak:  {} days", profile.streak);
    if profile.total_tests > 0 {
        println!(
            "  Suggested level: {}",
            starting_difficulty_for(profile.avg_accuracy)
        );
    }

    if profile.skills.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Skill", "Mastery"]);
    for skill in &profile.skills {
        table.add_row(vec![
            Cell::new(&skill.name),
            Cell::new(format!("{:>3}% {}", skill.mastery, bar(skill.mastery))),
        ]);
    }
    println!("{table}");
}

fn bar(mastery: u8) -> String {
    let filled = usize::from(mastery) / 10;
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

pub fn print_question(question: &Question, position: u32, total: u32) {
    println!();
    println!(
        "Question {position}/{total}  TOPIC: {}  LVL: {}",
        question.topic, question.difficulty
    );
    println!();
    println!("{}", question.text);
    println!();
    for (label, text) in question.options.iter() {
        println!("  {label}) {text}");
    }
}

pub fn print_report(report: &SessionReport) {
    println!();
    println!("Assessment complete!");
    println!(
        "Score: {}/{} ({:.0}%)",
        report.score, report.session_length, report.outcome.test_accuracy
    );
    println!(
        "Lifetime accuracy: {:.0}% over {} test(s)",
        report.outcome.avg_accuracy, report.outcome.total_tests
    );
    let verb = if report.outcome.passed { "+" } else { "" };
    println!("Mastery change: {verb}{}", report.outcome.mastery_delta);

    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Your answer", "Correct", "Result"]);
    for item in &report.review {
        table.add_row(vec![
            Cell::new(item.position),
            Cell::new(&item.topic),
            Cell::new(item.selected),
            Cell::new(item.correct),
            Cell::new(if item.is_correct { "OK" } else { "WRONG" }),
        ]);
    }
    println!("{table}");

    for item in report.mistakes() {
        if let Some(explanation) = &item.explanation {
            println!("  Q{}: {}", item.position, explanation);
        }
    }
}
